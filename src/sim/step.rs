/// Card transitions: every mutation of `CardState` lives here.
///
/// Key-triggered operations (`blow_candle`, `reveal_letter`,
/// `accept_gift`, `restart`) and the fixed-interval `tick` all return
/// the events they produced, so the caller can drive sound without the
/// simulation knowing about audio.

use crate::config::CardConfig;
use crate::sim::card::{CardState, PendingAdvance, Screen, CANDLE_COUNT};
use crate::sim::confetti::BurstKind;
use crate::sim::event::CardEvent;

/// Extinguish candle `index`. Only meaningful on the cake screen;
/// blowing an already-blown candle does nothing. When the last flame
/// goes out: grant the wish, launch the wish burst, and schedule the
/// advance to the surprise screen.
pub fn blow_candle(card: &mut CardState, index: usize, cfg: &CardConfig) -> Vec<CardEvent> {
    let mut events = Vec::new();

    if card.screen != Screen::Cake || index >= CANDLE_COUNT || card.candles[index] {
        return events;
    }

    card.candles[index] = true;
    events.push(CardEvent::CandleBlown { index });

    if card.all_blown() && !card.wish_granted {
        card.wish_granted = true;
        card.confetti.spawn_burst(
            BurstKind::Wish,
            &cfg.confetti,
            card.view_w as f32,
            card.view_h as f32,
        );
        card.pending = Some(PendingAdvance {
            remaining: cfg.timing.wish_delay_ticks,
            to: Screen::Surprise,
        });
        events.push(CardEvent::AllCandlesBlown);
        events.push(CardEvent::ConfettiBurst { kind: BurstKind::Wish });
    }

    events
}

/// Surprise → Letter, immediately.
pub fn reveal_letter(card: &mut CardState) -> Vec<CardEvent> {
    if card.screen != Screen::Surprise {
        return vec![];
    }
    card.screen = Screen::Letter;
    card.letter_scroll = 0;
    vec![CardEvent::ScreenAdvanced { to: Screen::Letter }]
}

/// Letter → Finale after the gift delay, with the big burst. A second
/// press while the advance is already scheduled does nothing.
pub fn accept_gift(card: &mut CardState, cfg: &CardConfig) -> Vec<CardEvent> {
    if card.screen != Screen::Letter || card.pending.is_some() {
        return vec![];
    }
    card.confetti.spawn_burst(
        BurstKind::Gift,
        &cfg.confetti,
        card.view_w as f32,
        card.view_h as f32,
    );
    card.pending = Some(PendingAdvance {
        remaining: cfg.timing.gift_delay_ticks,
        to: Screen::Finale,
    });
    vec![CardEvent::ConfettiBurst { kind: BurstKind::Gift }]
}

/// Back to the initial state: cake screen, all flames lit, no confetti,
/// and any scheduled advance cancelled.
pub fn restart(card: &mut CardState) -> Vec<CardEvent> {
    card.screen = Screen::Cake;
    card.candles = [false; CANDLE_COUNT];
    card.wish_granted = false;
    card.pending = None;
    card.confetti.clear();
    card.letter_scroll = 0;
    card.anim_tick = 0;
    vec![CardEvent::Restarted]
}

/// One fixed-interval simulation step: advance the decoration clocks,
/// the confetti batch, and any scheduled screen change.
pub fn tick(card: &mut CardState, cfg: &CardConfig) -> Vec<CardEvent> {
    let mut events = Vec::new();

    card.tick += 1;
    card.anim_tick = card.anim_tick.wrapping_add(1);

    if card.confetti.is_active() {
        card.confetti.tick(&cfg.confetti);
    }

    if let Some(mut pending) = card.pending.take() {
        pending.remaining = pending.remaining.saturating_sub(1);
        if pending.remaining == 0 {
            card.screen = pending.to;
            card.anim_tick = 0;
            events.push(CardEvent::ScreenAdvanced { to: pending.to });
        } else {
            card.pending = Some(pending);
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> CardConfig {
        CardConfig::default()
    }

    fn fresh() -> CardState {
        let mut card = CardState::new(1);
        card.view_w = 80;
        card.view_h = 24;
        card
    }

    /// Run `n` simulation ticks, collecting events.
    fn run_ticks(card: &mut CardState, cfg: &CardConfig, n: u32) -> Vec<CardEvent> {
        let mut all = Vec::new();
        for _ in 0..n {
            all.extend(tick(card, cfg));
        }
        all
    }

    #[test]
    fn four_candles_do_not_advance() {
        let cfg = cfg();
        let mut card = fresh();
        for i in 0..4 {
            blow_candle(&mut card, i, &cfg);
        }
        assert_eq!(card.screen, Screen::Cake);
        assert_eq!(card.blown_count(), 4);
        assert!(!card.wish_granted);
        assert!(card.pending.is_none());
    }

    #[test]
    fn fifth_candle_grants_wish_and_schedules_surprise() {
        let cfg = cfg();
        let mut card = fresh();
        for i in 0..4 {
            blow_candle(&mut card, i, &cfg);
        }
        let events = blow_candle(&mut card, 4, &cfg);
        assert_eq!(card.blown_count(), 5);
        assert!(card.wish_granted);
        assert!(events.contains(&CardEvent::AllCandlesBlown));
        assert!(events.contains(&CardEvent::ConfettiBurst { kind: BurstKind::Wish }));
        assert_eq!(card.confetti.particles().len(), cfg.confetti.wish_count);

        // Still on the cake until the wish delay elapses.
        assert_eq!(card.screen, Screen::Cake);
        run_ticks(&mut card, &cfg, cfg.timing.wish_delay_ticks - 1);
        assert_eq!(card.screen, Screen::Cake);
        let events = run_ticks(&mut card, &cfg, 1);
        assert_eq!(card.screen, Screen::Surprise);
        assert!(events.contains(&CardEvent::ScreenAdvanced { to: Screen::Surprise }));
    }

    #[test]
    fn any_blow_order_advances_exactly_once() {
        let cfg = cfg();
        for order in [[4, 2, 0, 3, 1], [0, 1, 2, 3, 4], [3, 4, 1, 0, 2]] {
            let mut card = fresh();
            let mut all_blown_events = 0;
            for i in order {
                let events = blow_candle(&mut card, i, &cfg);
                all_blown_events += events
                    .iter()
                    .filter(|e| **e == CardEvent::AllCandlesBlown)
                    .count();
            }
            assert_eq!(all_blown_events, 1);
            let mut advances = 0;
            for _ in 0..(cfg.timing.wish_delay_ticks * 2) {
                advances += tick(&mut card, &cfg)
                    .iter()
                    .filter(|e| matches!(e, CardEvent::ScreenAdvanced { .. }))
                    .count();
            }
            assert_eq!(advances, 1);
            assert_eq!(card.screen, Screen::Surprise);
        }
    }

    #[test]
    fn blowing_same_candle_twice_is_idempotent() {
        let cfg = cfg();
        let mut card = fresh();
        assert_eq!(blow_candle(&mut card, 2, &cfg).len(), 1);
        assert!(blow_candle(&mut card, 2, &cfg).is_empty());
        assert_eq!(card.blown_count(), 1);
    }

    #[test]
    fn out_of_range_candle_is_ignored() {
        let cfg = cfg();
        let mut card = fresh();
        assert!(blow_candle(&mut card, 5, &cfg).is_empty());
        assert!(blow_candle(&mut card, usize::MAX, &cfg).is_empty());
        assert_eq!(card.blown_count(), 0);
    }

    #[test]
    fn candles_only_respond_on_cake_screen() {
        let cfg = cfg();
        let mut card = fresh();
        card.screen = Screen::Letter;
        assert!(blow_candle(&mut card, 0, &cfg).is_empty());
        assert_eq!(card.blown_count(), 0);
    }

    #[test]
    fn reveal_letter_is_immediate_and_surprise_only() {
        let mut card = fresh();
        assert!(reveal_letter(&mut card).is_empty());
        assert_eq!(card.screen, Screen::Cake);

        card.screen = Screen::Surprise;
        let events = reveal_letter(&mut card);
        assert_eq!(card.screen, Screen::Letter);
        assert!(events.contains(&CardEvent::ScreenAdvanced { to: Screen::Letter }));
    }

    #[test]
    fn accept_gift_bursts_and_advances_after_delay() {
        let cfg = cfg();
        let mut card = fresh();
        card.screen = Screen::Letter;

        let events = accept_gift(&mut card, &cfg);
        assert!(events.contains(&CardEvent::ConfettiBurst { kind: BurstKind::Gift }));
        assert_eq!(card.confetti.particles().len(), cfg.confetti.gift_count);
        assert_eq!(card.screen, Screen::Letter);

        run_ticks(&mut card, &cfg, cfg.timing.gift_delay_ticks);
        assert_eq!(card.screen, Screen::Finale);
    }

    #[test]
    fn double_accept_does_not_reschedule() {
        let cfg = cfg();
        let mut card = fresh();
        card.screen = Screen::Letter;
        accept_gift(&mut card, &cfg);
        let remaining = card.pending.unwrap().remaining;
        run_ticks(&mut card, &cfg, 5);
        assert!(accept_gift(&mut card, &cfg).is_empty());
        assert_eq!(card.pending.unwrap().remaining, remaining - 5);
    }

    #[test]
    fn restart_resets_everything() {
        let cfg = cfg();
        let mut card = fresh();
        for i in 0..CANDLE_COUNT {
            blow_candle(&mut card, i, &cfg);
        }
        run_ticks(&mut card, &cfg, 3);

        restart(&mut card);
        assert_eq!(card.screen, Screen::Cake);
        assert_eq!(card.candles, [false; CANDLE_COUNT]);
        assert!(!card.wish_granted);
        assert!(card.pending.is_none());
        assert!(!card.confetti.is_active());
    }

    #[test]
    fn restart_cancels_a_scheduled_advance() {
        let cfg = cfg();
        let mut card = fresh();
        card.screen = Screen::Letter;
        accept_gift(&mut card, &cfg);
        restart(&mut card);

        // The cancelled advance must never fire.
        let events = run_ticks(&mut card, &cfg, cfg.timing.gift_delay_ticks * 2);
        assert!(events
            .iter()
            .all(|e| !matches!(e, CardEvent::ScreenAdvanced { .. })));
        assert_eq!(card.screen, Screen::Cake);
    }

    #[test]
    fn wish_confetti_drains_on_the_cake_screen_clock() {
        let cfg = cfg();
        let mut card = fresh();
        for i in 0..CANDLE_COUNT {
            blow_candle(&mut card, i, &cfg);
        }
        // wish_life (80) ticks after the burst, no particles remain.
        run_ticks(&mut card, &cfg, cfg.confetti.wish_life);
        assert!(!card.confetti.is_active());
    }
}
