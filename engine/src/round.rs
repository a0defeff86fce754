//! Round orchestration: inputs to full result, deterministically.

use pegfall_types::{RoundResult, ROWS};

use crate::rng::RoundRng;
use crate::{board, payout, seeds, sim, EngineError};

/// Play a complete round.
///
/// Pure: no I/O, no clock, no shared state. Identical inputs yield an
/// identical result, field for field; that property is the product.
///
/// Out-of-range inputs fail with a typed error rather than being
/// clamped. A silent correction would let the executed round diverge
/// from the published protocol, which is exactly what the commitment is
/// supposed to rule out. Bet amounts are unsigned minor units, so
/// non-negativity is enforced by the type.
pub fn play_round(
    server_seed: &str,
    client_seed: &str,
    nonce: &str,
    drop_column: u8,
    bet_cents: u64,
) -> Result<RoundResult, EngineError> {
    if drop_column > ROWS {
        return Err(EngineError::InvalidParameter(format!(
            "drop column {drop_column} outside 0..={ROWS}"
        )));
    }

    let combined_seed = seeds::combined_seed(server_seed, client_seed, nonce);
    let mut rng = RoundRng::from_combined_seed(&combined_seed)?;

    // Board draws first, then descent draws, all from one sequence.
    let peg_map = board::generate_peg_map(&mut rng, ROWS);
    let peg_map_hash = board::hash_peg_map(&peg_map);
    let path = sim::simulate_drop(&mut rng, &peg_map, drop_column);

    let bin_index = path.last().map(|step| step.column).unwrap_or(0);
    let multiplier = payout::multiplier_for_bin(bin_index);
    let payout_cents = payout::payout_cents(bet_cents, multiplier);

    Ok(RoundResult {
        combined_seed,
        peg_map,
        peg_map_hash,
        path,
        bin_index,
        multiplier,
        bet_cents,
        payout_cents,
        rows: ROWS,
    })
}
