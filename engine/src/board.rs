//! Peg board derivation and its tamper-evident hash.
//!
//! The board is a triangular matrix of left-move biases derived entirely
//! from the round's RNG. Its canonical serialization (and therefore its
//! hash) is a cross-implementation contract: every verifier must produce
//! the same bytes for the same board.

use pegfall_types::{PegMap, BIAS_SPREAD};
use sha2::{Digest, Sha256};

use crate::rng::RoundRng;

const MICROS_PER_UNIT: f64 = 1e6;

/// Derive the triangular bias matrix for a board of `rows` rows.
///
/// Row `r` holds `r + 1` biases, one RNG draw each, consumed row-major
/// and left-to-right. Descent draws continue the same sequence, so the
/// draw count here (`rows * (rows + 1) / 2`) is itself part of the
/// protocol.
pub fn generate_peg_map(rng: &mut RoundRng, rows: u8) -> PegMap {
    let mut peg_map = Vec::with_capacity(rows as usize);
    for row in 0..rows {
        let mut pegs = Vec::with_capacity(row as usize + 1);
        for _ in 0..=row {
            let draw = rng.next();
            let left_bias = 0.5 + (draw - 0.5) * BIAS_SPREAD;
            pegs.push(round_bias(left_bias));
        }
        peg_map.push(pegs);
    }
    peg_map
}

/// Round a bias to 6 decimal places, half up.
fn round_bias(bias: f64) -> f64 {
    (bias * MICROS_PER_UNIT).round() / MICROS_PER_UNIT
}

/// Hash of the canonical serialization; commits the bias field before the
/// descent is simulated.
pub fn hash_peg_map(peg_map: &PegMap) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_peg_map(peg_map).as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonical text form of a peg map.
///
/// Nested arrays, comma separators, no whitespace; each bias rendered as
/// its integer part, then up to 6 fractional digits with trailing zeros
/// stripped (`0.5`, never `0.500000`). The digits are reconstructed from
/// the bias's rounded micro-units so the rendering cannot drift with
/// float formatting.
pub fn canonical_peg_map(peg_map: &PegMap) -> String {
    let mut out = String::new();
    out.push('[');
    for (r, row) in peg_map.iter().enumerate() {
        if r > 0 {
            out.push(',');
        }
        out.push('[');
        for (p, bias) in row.iter().enumerate() {
            if p > 0 {
                out.push(',');
            }
            push_canonical_bias(&mut out, *bias);
        }
        out.push(']');
    }
    out.push(']');
    out
}

fn push_canonical_bias(out: &mut String, bias: f64) {
    use std::fmt::Write;

    let micros = (bias * MICROS_PER_UNIT).round() as u64;
    let whole = micros / 1_000_000;
    let mut frac = micros % 1_000_000;
    if frac == 0 {
        let _ = write!(out, "{whole}");
        return;
    }
    let mut digits: usize = 6;
    while frac % 10 == 0 {
        frac /= 10;
        digits -= 1;
    }
    let _ = write!(out, "{whole}.{frac:0digits$}");
}
