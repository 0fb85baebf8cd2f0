mod game;

pub use game::{period_label, ColorRule, GameSummary};
