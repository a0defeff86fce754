//! Bin multipliers and payout math.

use pegfall_types::BINS;

/// Multiplier per landing bin, mirrored about the center: the center bin
/// pays least, the outermost bins pay most.
pub const PAYOUT_TABLE: [f64; BINS] = [
    16.0, 9.0, 2.0, 1.4, 1.4, 1.2, 1.1, 1.2, 1.4, 1.4, 2.0, 9.0, 16.0,
];

/// Multiplier for a landing bin.
///
/// An out-of-range bin falls back to 1; a correct descent never produces
/// one, so the fallback exists only to keep money math total.
pub fn multiplier_for_bin(bin: u8) -> f64 {
    PAYOUT_TABLE.get(bin as usize).copied().unwrap_or(1.0)
}

/// Payout in cents, rounded half up.
///
/// Amounts stay in integer minor units; this single rounding step is the
/// only place float math touches money.
pub fn payout_cents(bet_cents: u64, multiplier: f64) -> u64 {
    (bet_cents as f64 * multiplier).round() as u64
}
