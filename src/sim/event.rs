/// Events emitted by card transitions.
/// The presentation layer consumes these for sound effects.

use crate::sim::card::Screen;
use crate::sim::confetti::BurstKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardEvent {
    CandleBlown { index: usize },
    AllCandlesBlown,
    ConfettiBurst { kind: BurstKind },
    ScreenAdvanced { to: Screen },
    Restarted,
}
