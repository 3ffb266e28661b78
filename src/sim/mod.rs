pub mod card;
pub mod confetti;
pub mod event;
pub mod step;
