//! Common types used throughout pegfall.

pub mod round;

pub use round::{Direction, PathStep, PegMap, RoundResult, RoundStatus};

/// Number of peg rows on the board.
pub const ROWS: u8 = 12;

/// Number of terminal bins, one more than the row count.
pub const BINS: usize = ROWS as usize + 1;

/// Lower bound of a peg's left-move bias.
pub const BIAS_MIN: f64 = 0.4;

/// Upper bound of a peg's left-move bias.
pub const BIAS_MAX: f64 = 0.6;

/// Spread applied around 0.5 when deriving a bias from a raw draw.
pub const BIAS_SPREAD: f64 = 0.2;

/// Per-column bias shift applied for off-center drop columns.
pub const DROP_COLUMN_ADJUSTMENT: f64 = 0.01;

/// Decimal places a bias is rounded to before serialization and hashing.
pub const BIAS_DECIMALS: u32 = 6;
