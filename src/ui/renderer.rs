/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws — important
/// here because confetti touches a handful of cells per frame while the
/// decorative backdrop stays put.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::CardText;
use crate::sim::card::{CardState, Screen, CANDLE_COUNT};

// ── Palette ──

const PINK: Color = Color::Rgb { r: 236, g: 72, b: 153 };
const ROSE: Color = Color::Rgb { r: 244, g: 114, b: 182 };
const FUCHSIA: Color = Color::Rgb { r: 232, g: 121, b: 249 };
const LILAC: Color = Color::Rgb { r: 192, g: 132, b: 252 };
const GOLD: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const CREAM: Color = Color::Rgb { r: 255, g: 240, b: 220 };
const INK: Color = Color::Rgb { r: 225, g: 205, b: 215 };
const DIM: Color = Color::Rgb { r: 150, g: 130, b: 145 };
const FLAME_HI: Color = Color::Rgb { r: 255, g: 200, b: 80 };
const FLAME_LO: Color = Color::Rgb { r: 255, g: 140, b: 40 };
const SMOKE: Color = Color::Rgb { r: 140, g: 140, b: 150 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 8],   // UTF-8 bytes (covers every glyph we draw, incl. emoji)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark plum background for all "empty" terminal cells.
    /// The same RGB is used for `Clear(ClearType::All)` and every blank
    /// cell so inter-row gap pixels match and no horizontal lines show.
    const BASE_BG: Color = Color::Rgb { r: 28, g: 18, b: 30 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 8],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        if self.ch_len == 0 { return ""; }
        unsafe { std::str::from_utf8_unchecked(&self.ch[..self.ch_len as usize]) }
    }
}

/// Scale an RGB triple toward the backdrop; used to fade confetti out
/// as its life counter runs down.
fn faded(rgb: (u8, u8, u8), k: f32) -> Color {
    let k = k.clamp(0.0, 1.0);
    let (br, bg_, bb) = (28.0_f32, 18.0, 30.0);
    Color::Rgb {
        r: (br + (rgb.0 as f32 - br) * k) as u8,
        g: (bg_ + (rgb.1 as f32 - bg_) * k) as u8,
        b: (bb + (rgb.2 as f32 - bb) * k) as u8,
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }

    /// Write a string centered on row `y`.
    fn put_str_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    /// Place a wide glyph (emoji) at (x, y), claiming two columns.
    fn put_wide(&mut self, x: usize, y: usize, c: char, fg: Color) {
        if x + 1 >= self.width { return; }
        self.set(x, y, Cell::from_char_wide(c, fg, Color::Reset));
        self.set(x + 1, y, Cell::WIDE_CONT);
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
    text: CardText,
}

impl Renderer {
    pub fn new(text: CardText) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
            text,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, card: &mut CardState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // The confetti field spans the whole terminal; publish the size
        // so the simulation spawns bursts along the real bottom edge.
        card.view_w = self.term_w;
        card.view_h = self.term_h;

        // Detect screen change → clear for clean transition
        if self.last_screen != Some(card.screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(card.screen);
        }

        // Build front buffer
        self.front.clear();
        self.compose_backdrop(card);

        match card.screen {
            Screen::Cake => self.compose_cake(card),
            Screen::Surprise => self.compose_surprise(card),
            Screen::Letter => self.compose_letter(card),
            Screen::Finale => self.compose_finale(card),
        }

        // Confetti floats above everything
        self.compose_confetti(card);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame. Not ResetColor:
        // that would fall back to the terminal's native default and can
        // leave line artifacts against BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide glyph)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    // Wide char printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2; // skip the continuation cell
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Shared decoration: banner, balloons, swans ──

    fn compose_backdrop(&mut self, card: &CardState) {
        let w = self.front.width;
        let tick = card.anim_tick;

        // Pennant banner across the top
        let pennant_colors = [PINK, ROSE, FUCHSIA, LILAC];
        let mut i = 0;
        let mut x = 2;
        while x + 1 < w {
            // One pennant "breathes" at a time, cycling along the row
            let lit = (tick / 4) as usize % pennant_colors.len() == i % pennant_colors.len();
            let fg = if lit { pennant_colors[i % 4] } else { faded(rgb_of(pennant_colors[i % 4]), 0.55) };
            self.front.set(x, 0, Cell::from_char('▽', fg, Color::Reset));
            x += 4;
            i += 1;
        }

        // Balloons drift up and down on a slow clock
        let bob_l = ((tick / 10) % 2) as usize;
        let bob_r = (((tick + 10) / 10) % 2) as usize;
        if w > 20 {
            self.compose_balloon(2, 2 + bob_l, ROSE);
            self.compose_balloon(7, 4 + bob_r, LILAC);
            self.compose_balloon(w - 6, 2 + bob_r, FUCHSIA);
            self.compose_balloon(w - 11, 4 + bob_l, PINK);
        }

        // Bottom accent dots
        let h = self.front.height;
        if h > 2 {
            let cx = w / 2;
            for (j, off) in [-4_i32, 0, 4].iter().enumerate() {
                let lit = (tick / 8) as usize % 3 == j;
                let fg = if lit { ROSE } else { faded(rgb_of(ROSE), 0.4) };
                let px = (cx as i32 + off).max(0) as usize;
                self.front.set(px, h - 1, Cell::from_char('∙', fg, Color::Reset));
            }
        }
    }

    /// A small tethered balloon, top-left corner at (x, y).
    fn compose_balloon(&mut self, x: usize, y: usize, fg: Color) {
        self.front.put_str(x, y, ".-.", fg, Color::Reset);
        self.front.put_str(x.saturating_sub(1), y + 1, "(   )", fg, Color::Reset);
        self.front.put_str(x, y + 2, "`-'", fg, Color::Reset);
        self.front.set(x + 1, y + 3, Cell::from_char('╵', DIM, Color::Reset));
    }

    // ── Cake screen ──

    fn compose_cake(&mut self, card: &CardState) {
        let h = self.front.height;
        let tick = card.anim_tick;
        let top = h / 6 + 1;

        self.front.put_str_centered(top, "H a p p y   B i r t h d a y", CREAM, Color::Reset);
        let w = self.front.width;
        let cx = w / 2;
        self.front.put_wide(cx.saturating_sub(10), top + 1, '🦢', Color::White);
        self.front.put_wide(cx + 9, top + 1, '🦢', Color::White);
        self.front.put_str_centered(top + 2, "━━━━━━━━━━━━", ROSE, Color::Reset);
        self.front.put_str_centered(top + 3, "A graceful celebration awaits", DIM, Color::Reset);

        // ── Cake with 5 candles ──
        let cake_top = top + 6;
        let cake = [
            ("   ╭──────────────────╮   ", ROSE),
            ("   │ ∙  ∙  ∙  ∙  ∙  ∙ │   ", ROSE),
            (" ╭─┴──────────────────┴─╮ ", PINK),
            (" │  ∙   ∙   ∙   ∙   ∙   │ ", PINK),
            (" ╰──────────────────────╯ ", PINK),
        ]; // 26 columns wide
        let cake_w = 26;
        let cake_x = w.saturating_sub(cake_w) / 2;

        // Candles sit above the top layer, evenly spaced
        for i in 0..CANDLE_COUNT {
            let col = cake_x + 5 + i * 4;
            if card.candles[i] {
                // A wisp of smoke where the flame was
                let wisp = if (tick / 6 + i as u32) % 2 == 0 { '~' } else { '∽' };
                self.front.set(col, cake_top, Cell::from_char(wisp, SMOKE, Color::Reset));
            } else {
                // Flickering flame
                let hot = (tick / 3 + i as u32) % 2 == 0;
                let (fl, fg) = if hot { ('▲', FLAME_HI) } else { ('△', FLAME_LO) };
                self.front.set(col, cake_top, Cell::from_char(fl, fg, Color::Reset));
            }
            self.front.set(col, cake_top + 1, Cell::from_char('│', CREAM, Color::Reset));
            // Key hint under each candle, dimmed once blown
            let hint_fg = if card.candles[i] { faded((150, 130, 145), 0.5) } else { DIM };
            let digit = char::from(b'1' + i as u8);
            self.front.set(col, cake_top + 2 + cake.len() + 1, Cell::from_char(digit, hint_fg, Color::Reset));
        }

        for (row, (art, fg)) in cake.iter().enumerate() {
            self.front.put_str(cake_x, cake_top + 2 + row, art, *fg, Color::Reset);
        }

        // ── Status / prompt ──
        let status_row = cake_top + 2 + cake.len() + 3;
        if card.wish_granted {
            self.front.put_str_centered(status_row, "✦ Wish granted ✦", GOLD, Color::Reset);
            if (tick / 6) % 2 == 0 {
                self.front.put_str_centered(
                    status_row + 1,
                    "Something magical is coming...",
                    INK,
                    Color::Reset,
                );
            }
        } else {
            let counter = format!("{} / {} candles blown", card.blown_count(), CANDLE_COUNT);
            self.front.put_str_centered(status_row, &counter, INK, Color::Reset);
            self.front.put_str_centered(
                status_row + 1,
                "Make a wish, then blow out every candle",
                DIM,
                Color::Reset,
            );
        }

        self.compose_help(" 1-5/Space: blow a candle   R: restart   Q: quit");
    }

    // ── Surprise screen ──

    fn compose_surprise(&mut self, card: &CardState) {
        let h = self.front.height;
        let w = self.front.width;
        let tick = card.anim_tick;
        let top = h / 4;
        let cx = w / 2;

        // Rotating sparkle cluster
        let frames = ['✦', '✧', '✶', '✧'];
        let spark = frames[(tick / 4) as usize % frames.len()];
        self.front.set(cx, top, Cell::from_char(spark, GOLD, Color::Reset));
        self.front.set(cx.saturating_sub(3), top + 1, Cell::from_char('✧', ROSE, Color::Reset));
        self.front.set(cx + 3, top + 1, Cell::from_char('✧', FUCHSIA, Color::Reset));
        self.front.put_wide(cx.saturating_sub(8), top + 1, '🦢', Color::White);
        self.front.put_wide(cx + 6, top + 1, '🦢', Color::White);

        self.front.put_str_centered(top + 4, "Something Graceful & Special", CREAM, Color::Reset);
        self.front.put_str_centered(top + 5, "━━━━━━━━━━", ROSE, Color::Reset);

        let blink = (tick / 8) % 2 == 0;
        if blink {
            self.front.put_str_centered(top + 8, "╭──────────────────────────╮", PINK, Color::Reset);
            self.front.put_str_centered(top + 9, "│   ⊹ Reveal Surprise ⊹    │", CREAM, Color::Reset);
            self.front.put_str_centered(top + 10, "╰──────────────────────────╯", PINK, Color::Reset);
        } else {
            self.front.put_str_centered(top + 9, "⊹ Reveal Surprise ⊹", INK, Color::Reset);
        }
        self.front.put_str_centered(top + 12, "press Enter", DIM, Color::Reset);

        self.compose_help(" Enter: reveal   R: restart   Q: quit");
    }

    // ── Letter screen ──

    fn compose_letter(&mut self, card: &mut CardState) {
        let w = self.front.width;
        let h = self.front.height;

        let dear = if self.text.recipient.is_empty() {
            "Dear you,".to_string()
        } else {
            format!("Dear {},", self.text.recipient)
        };
        let signed = if self.text.sender.is_empty() {
            "With warmest wishes and the grace of swans".to_string()
        } else {
            format!("With warmest wishes,  {}", self.text.sender)
        };

        let body: Vec<(String, Color)> = vec![
            ("♡  A message for someone as graceful as swans  ♡".into(), ROSE),
            (String::new(), INK),
            (dear, CREAM),
            (String::new(), INK),
            ("Today marks another beautiful chapter in your".into(), INK),
            ("journey. Your presence brings light to those around".into(), INK),
            ("you, and your kindness creates ripples of joy, as".into(), INK),
            ("graceful as swans gliding across still waters.".into(), INK),
            (String::new(), INK),
            ("May this new year bring you the grace of swans and:".into(), CREAM),
            (String::new(), INK),
            ("  ◦ Endless possibilities    ◦ Cherished memories".into(), FUCHSIA),
            ("  ◦ Fulfilled aspirations    ◦ Abundant joy".into(), FUCHSIA),
            (String::new(), INK),
            ("Happy Birthday!".into(), GOLD),
            (String::new(), INK),
            (signed, DIM),
        ];

        // Bordered card, centered; body scrolls when the terminal is short
        let inner_w = body.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0).max(40) + 4;
        let box_w = (inner_w + 2).min(w.saturating_sub(2));
        let box_x = w.saturating_sub(box_w) / 2;
        let avail = h.saturating_sub(8); // top margin + border + prompt + help
        let visible = body.len().min(avail.max(1));
        let max_scroll = body.len() - visible;
        let scroll = card.letter_scroll.min(max_scroll);
        card.letter_scroll = scroll; // clamp runaway scroll input
        let box_y = 2;

        let horiz: String = "─".repeat(box_w.saturating_sub(2));
        self.front.put_str(box_x, box_y, &format!("╭{}╮", horiz), ROSE, Color::Reset);
        for (row, (line, fg)) in body[scroll..scroll + visible].iter().enumerate() {
            let y = box_y + 1 + row;
            self.front.put_str(box_x, y, "│", ROSE, Color::Reset);
            self.front.put_str(box_x + box_w - 1, y, "│", ROSE, Color::Reset);
            let tx = box_x + (box_w.saturating_sub(line.chars().count())) / 2;
            self.front.put_str(tx, y, line, *fg, Color::Reset);
        }
        self.front.put_str(box_x, box_y + visible + 1, &format!("╰{}╯", horiz), ROSE, Color::Reset);

        // Scroll markers
        if scroll > 0 {
            self.front.put_str(box_x + box_w - 3, box_y, "▲", DIM, Color::Reset);
        }
        if scroll < max_scroll {
            self.front.put_str(box_x + box_w - 3, box_y + visible + 1, "▼", DIM, Color::Reset);
        }

        let prompt_row = box_y + visible + 3;
        let blink = (card.anim_tick / 8) % 2 == 0;
        let fg = if blink { GOLD } else { INK };
        self.front.put_str_centered(prompt_row, "❯ Accept This Gift ❮  (Enter)", fg, Color::Reset);

        self.compose_help(" Enter: accept   Up/Down: scroll   R: restart   Q: quit");
    }

    // ── Finale screen ──

    fn compose_finale(&mut self, card: &CardState) {
        let h = self.front.height;
        let tick = card.anim_tick;
        let top = h / 6;

        let banner = [
            r" _  _                       ",
            r"| || | __ _  _ __  _ __  _  _ ",
            r"| __ |/ _` || '_ \| '_ \| || |",
            r"|_||_|\__,_|| .__/| .__/ \_, |",
            r"            |_|   |_|    |__/ ",
        ];
        let banner2 = [
            r" ___  _       _    _         _             _ ",
            r"| _ )(_) _ _ | |_ | |_   __| | __ _  _  _ | |",
            r"| _ \| || '_||  _|| ' \ / _` |/ _` || || ||_|",
            r"|___/|_||_|   \__||_||_|\__,_|\__,_| \_, |(_)",
            r"                                     |__/    ",
        ];

        // Rows pulse through the palette
        let cycle = [FUCHSIA, PINK, ROSE, LILAC];
        for (i, line) in banner.iter().enumerate() {
            let fg = cycle[(i + (tick / 6) as usize) % cycle.len()];
            self.front.put_str_centered(top + i, line, fg, Color::Reset);
        }
        for (i, line) in banner2.iter().enumerate() {
            let fg = cycle[(i + 2 + (tick / 6) as usize) % cycle.len()];
            self.front.put_str_centered(top + banner.len() + i, line, fg, Color::Reset);
        }

        let msg_row = top + banner.len() + banner2.len() + 2;
        let w = self.front.width;
        let cx = w / 2;
        self.front.put_wide(cx.saturating_sub(4), msg_row, '🦢', Color::White);
        self.front.put_wide(cx + 2, msg_row, '🦢', Color::White);
        self.front.put_str_centered(
            msg_row + 2,
            "Your special day, celebrated with grace, joy, and light.",
            INK,
            Color::Reset,
        );
        self.front.put_str_centered(
            msg_row + 3,
            "May it bring endless happiness and wonderful memories.",
            INK,
            Color::Reset,
        );

        let blink = (tick / 8) % 2 == 0;
        if blink {
            self.front.put_str_centered(msg_row + 5, "Celebrate Again?  press R", GOLD, Color::Reset);
        }

        self.compose_help(" R: celebrate again   Q: quit");
    }

    // ── Confetti overlay ──

    fn compose_confetti(&mut self, card: &CardState) {
        for p in card.confetti.particles() {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x as usize, p.y as usize);
            if x >= self.front.width || y >= self.front.height {
                continue;
            }
            let k = p.brightness();
            let ch = if k > 0.5 { '●' } else { '∙' };
            self.front.set(x, y, Cell::from_char(ch, faded(p.color, k), Color::Reset));
        }
    }

    // ── Help bar ──

    fn compose_help(&mut self, help: &str) {
        let h = self.front.height;
        if h > 1 {
            self.front.put_str(0, h - 2, help, DIM, Color::Reset);
        }
    }
}

/// Recover the raw RGB of a palette constant (all palette entries are Rgb).
fn rgb_of(c: Color) -> (u8, u8, u8) {
    match c {
        Color::Rgb { r, g, b } => (r, g, b),
        _ => (255, 255, 255),
    }
}
