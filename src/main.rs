/// Entry point and card loop.

mod config;
mod sim;
mod ui;

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::KeyCode;

use config::CardConfig;
use sim::card::{CardState, Screen, CANDLE_COUNT};
use sim::confetti::BurstKind;
use sim::event::CardEvent;
use sim::step;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = CardConfig::load();

    // Confetti seed: wall clock, so every run scatters differently.
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xC0FFEE);
    let mut card = CardState::new(seed);

    let mut renderer = Renderer::new(config.card.clone());

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = card_loop(&mut card, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Card error: {e}");
    }

    println!();
    println!("Thanks for celebrating!");
}

fn card_loop(
    card: &mut CardState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &CardConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_keys(card, sound, &kb, config) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::tick(card, config);
            process_sound_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(card)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

/// Handle this frame's key presses. Returns true to quit.
fn handle_keys(
    card: &mut CardState,
    sound: Option<&SoundEngine>,
    kb: &InputState,
    config: &CardConfig,
) -> bool {
    if kb.any_pressed(KEYS_QUIT) {
        return true;
    }

    // Restart works from anywhere
    if kb.any_pressed(KEYS_RESTART) {
        let events = step::restart(card);
        process_sound_events(sound, &events);
        return false;
    }

    match card.screen {
        // ── Cake: digits (or Space) blow candles ──
        Screen::Cake => {
            for i in 0..CANDLE_COUNT {
                let key = KeyCode::Char(char::from(b'1' + i as u8));
                if kb.was_pressed(key) {
                    let events = step::blow_candle(card, i, config);
                    process_sound_events(sound, &events);
                }
            }
            // Space blows the leftmost still-lit candle
            if kb.was_pressed(KeyCode::Char(' ')) {
                if let Some(i) = card.candles.iter().position(|b| !b) {
                    let events = step::blow_candle(card, i, config);
                    process_sound_events(sound, &events);
                }
            }
        }

        // ── Surprise: confirm reveals the letter ──
        Screen::Surprise => {
            if kb.any_pressed(KEYS_CONFIRM) {
                let events = step::reveal_letter(card);
                process_sound_events(sound, &events);
            }
        }

        // ── Letter: scroll, confirm accepts the gift ──
        Screen::Letter => {
            if kb.was_pressed(KeyCode::Up) {
                card.letter_scroll = card.letter_scroll.saturating_sub(1);
            } else if kb.was_pressed(KeyCode::Down) {
                // Renderer clamps against the letter length
                card.letter_scroll += 1;
            } else if kb.any_pressed(KEYS_CONFIRM) {
                let events = step::accept_gift(card, config);
                process_sound_events(sound, &events);
            }
        }

        // ── Finale: confirm celebrates again ──
        Screen::Finale => {
            if kb.any_pressed(KEYS_CONFIRM) {
                let events = step::restart(card);
                process_sound_events(sound, &events);
            }
        }
    }

    false
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[CardEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            CardEvent::CandleBlown { .. } => sfx.play_puff(),
            CardEvent::AllCandlesBlown => sfx.play_chime(),
            CardEvent::ConfettiBurst { kind: BurstKind::Gift } => sfx.play_fanfare(),
            CardEvent::ScreenAdvanced { to: Screen::Letter } => sfx.play_page(),
            CardEvent::ScreenAdvanced { to: Screen::Finale } => sfx.play_chime(),
            CardEvent::Restarted => sfx.play_blip(),
            _ => {}
        }
    }
}
