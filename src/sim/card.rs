/// CardState: the complete snapshot of the running card.
///
/// The card is a linear sequence of four screens. All progress lives in
/// this one struct and every mutation goes through `sim::step`, so there
/// is no ambient global state and `restart()` can rebuild everything
/// from initial values.
///
/// Timed transitions are explicit `PendingAdvance` records counted down
/// on the simulation tick, never detached timers. Cancelling one is just
/// dropping it.

use crate::sim::confetti::Confetti;

pub const CANDLE_COUNT: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Cake,
    Surprise,
    Letter,
    Finale,
}

/// A scheduled screen change with a cancellation handle: the record
/// itself. Dropped by `restart()`, fired by `step::tick()` when the
/// countdown reaches zero.
#[derive(Clone, Copy, Debug)]
pub struct PendingAdvance {
    pub remaining: u32,
    pub to: Screen,
}

pub struct CardState {
    // ── Screen sequencing ──
    pub screen: Screen,
    pub candles: [bool; CANDLE_COUNT],
    pub wish_granted: bool,
    pub pending: Option<PendingAdvance>,

    // ── Decoration ──
    pub confetti: Confetti,

    // ── Clocks ──
    pub tick: u64,
    pub anim_tick: u32,

    // ── UI ──
    pub letter_scroll: usize,

    // ── Viewport (set by the renderer each frame) ──
    pub view_w: usize,
    pub view_h: usize,
}

impl CardState {
    pub fn new(seed: u64) -> Self {
        CardState {
            screen: Screen::Cake,
            candles: [false; CANDLE_COUNT],
            wish_granted: false,
            pending: None,
            confetti: Confetti::new(seed),
            tick: 0,
            anim_tick: 0,
            letter_scroll: 0,
            view_w: 0,
            view_h: 0,
        }
    }

    pub fn blown_count(&self) -> usize {
        self.candles.iter().filter(|&&b| b).count()
    }

    pub fn all_blown(&self) -> bool {
        self.candles.iter().all(|&b| b)
    }
}
