//! Hand definitions and round rules.

mod hand;

pub use hand::{Hand, RoundResult};
