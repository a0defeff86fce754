//! Round data model shared by the engine and the service.
//!
//! The serde field names here are a wire contract: the verification
//! surface serializes these types for third parties who replay rounds
//! against the published protocol, so renames are breaking changes.

use serde::{Deserialize, Serialize};

/// Triangular matrix of left-move biases; row `r` has `r + 1` entries.
pub type PegMap = Vec<Vec<f64>>;

/// Lifecycle of a persisted round.
///
/// `Created` holds a published commitment and a hidden server seed;
/// `Started` additionally holds the computed result; `Revealed` exposes
/// the server seed and is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    Created,
    Started,
    Revealed,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundStatus::Created => "CREATED",
            RoundStatus::Started => "STARTED",
            RoundStatus::Revealed => "REVEALED",
        }
    }
}

impl std::fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction the ball took at a peg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// One row of the ball's descent.
///
/// `column` is the count of rightward moves after this row's decision,
/// i.e. the position the ball leaves the row in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub row: u8,
    pub column: u8,
    pub direction: Direction,
    /// Bias as stored in the peg map, before the drop-column shift.
    #[serde(rename = "pegBias")]
    pub peg_bias: f64,
    /// Bias actually compared against the draw.
    #[serde(rename = "adjustedBias")]
    pub adjusted_bias: f64,
    #[serde(rename = "randomValue")]
    pub random_value: f64,
}

/// Complete outcome of one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    #[serde(rename = "combinedSeed")]
    pub combined_seed: String,
    #[serde(rename = "pegMap")]
    pub peg_map: PegMap,
    #[serde(rename = "pegMapHash")]
    pub peg_map_hash: String,
    pub path: Vec<PathStep>,
    #[serde(rename = "binIndex")]
    pub bin_index: u8,
    pub multiplier: f64,
    #[serde(rename = "betCents")]
    pub bet_cents: u64,
    #[serde(rename = "payoutCents")]
    pub payout_cents: u64,
    pub rows: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&RoundStatus::Created).unwrap(),
            "\"CREATED\""
        );
        assert_eq!(
            serde_json::from_str::<RoundStatus>("\"REVEALED\"").unwrap(),
            RoundStatus::Revealed
        );
        for status in [
            RoundStatus::Created,
            RoundStatus::Started,
            RoundStatus::Revealed,
        ] {
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status.as_str())
            );
        }
    }

    #[test]
    fn test_path_step_wire_names() {
        let step = PathStep {
            row: 3,
            column: 2,
            direction: Direction::Right,
            peg_bias: 0.512345,
            adjusted_bias: 0.522345,
            random_value: 0.75,
        };

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["direction"], "right");
        assert_eq!(json["pegBias"], 0.512345);
        assert_eq!(json["adjustedBias"], 0.522345);
        assert_eq!(json["randomValue"], 0.75);

        let back: PathStep = serde_json::from_value(json).unwrap();
        assert_eq!(back, step);
    }
}
