//! In-memory round store and lifecycle state machine.
//!
//! A round moves `CREATED -> STARTED -> REVEALED` and never backwards.
//! The store is the only shared resource in the service; every
//! transition takes the single lock and checks the current status before
//! writing, so a round cannot be started twice or re-opened after
//! reveal regardless of request interleaving. The engine itself holds no
//! state across calls.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use pegfall_engine::{play_round, seeds, EngineError};
use pegfall_types::{RoundResult, RoundStatus};
use thiserror::Error;
use uuid::Uuid;

/// Errors from store lookups and lifecycle transitions.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StoreError {
    #[error("round {0} not found")]
    RoundNotFound(String),
    #[error("round {id} is {actual}, expected {expected}")]
    StateViolation {
        id: String,
        expected: &'static str,
        actual: RoundStatus,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A persisted round record.
///
/// `server_seed` stays in the record from creation on; whether it is
/// exposed is decided by the API layer based on `status`.
#[derive(Clone, Debug)]
pub struct RoundRecord {
    pub id: String,
    pub status: RoundStatus,
    pub server_seed: String,
    pub nonce: String,
    pub commitment: String,
    pub client_seed: Option<String>,
    pub drop_column: Option<u8>,
    pub result: Option<RoundResult>,
    pub revealed_at_ms: Option<u64>,
}

#[derive(Default)]
pub struct RoundStore {
    rounds: Mutex<HashMap<String, RoundRecord>>,
}

impl RoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a round: fresh secret seed, nonce, and published
    /// commitment. The caller must not leak `server_seed` from the
    /// returned record until reveal.
    pub fn commit(&self) -> RoundRecord {
        let server_seed = seeds::generate_server_seed();
        let nonce = seeds::generate_nonce();
        let commitment = seeds::create_commitment(&server_seed, &nonce);

        let record = RoundRecord {
            id: Uuid::new_v4().to_string(),
            status: RoundStatus::Created,
            server_seed,
            nonce,
            commitment,
            client_seed: None,
            drop_column: None,
            result: None,
            revealed_at_ms: None,
        };

        let mut rounds = self.rounds.lock().unwrap();
        rounds.insert(record.id.clone(), record.clone());
        record
    }

    /// Start a round: run the engine against the stored seed material and
    /// persist the outcome. Requires `CREATED`.
    pub fn start(
        &self,
        id: &str,
        client_seed: &str,
        bet_cents: u64,
        drop_column: u8,
    ) -> Result<RoundRecord, StoreError> {
        let mut rounds = self.rounds.lock().unwrap();
        let record = rounds
            .get_mut(id)
            .ok_or_else(|| StoreError::RoundNotFound(id.to_string()))?;

        if record.status != RoundStatus::Created {
            return Err(StoreError::StateViolation {
                id: id.to_string(),
                expected: RoundStatus::Created.as_str(),
                actual: record.status,
            });
        }

        let result = play_round(
            &record.server_seed,
            client_seed,
            &record.nonce,
            drop_column,
            bet_cents,
        )?;

        record.status = RoundStatus::Started;
        record.client_seed = Some(client_seed.to_string());
        record.drop_column = Some(drop_column);
        record.result = Some(result);
        Ok(record.clone())
    }

    /// Disclose the server seed. Requires the round to have started;
    /// idempotent once revealed.
    pub fn reveal(&self, id: &str) -> Result<RoundRecord, StoreError> {
        let mut rounds = self.rounds.lock().unwrap();
        let record = rounds
            .get_mut(id)
            .ok_or_else(|| StoreError::RoundNotFound(id.to_string()))?;

        match record.status {
            RoundStatus::Created => Err(StoreError::StateViolation {
                id: id.to_string(),
                expected: RoundStatus::Started.as_str(),
                actual: record.status,
            }),
            RoundStatus::Started => {
                record.status = RoundStatus::Revealed;
                record.revealed_at_ms = Some(now_ms());
                Ok(record.clone())
            }
            RoundStatus::Revealed => Ok(record.clone()),
        }
    }

    pub fn get(&self, id: &str) -> Result<RoundRecord, StoreError> {
        let rounds = self.rounds.lock().unwrap();
        rounds
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::RoundNotFound(id.to_string()))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_creates_verifiable_round() {
        let store = RoundStore::new();
        let record = store.commit();

        assert_eq!(record.status, RoundStatus::Created);
        assert!(record.result.is_none());
        assert!(seeds::verify_commitment(
            &record.server_seed,
            &record.nonce,
            &record.commitment
        ));
    }

    #[test]
    fn test_full_lifecycle() {
        let store = RoundStore::new();
        let committed = store.commit();

        let started = store.start(&committed.id, "player-seed", 100, 6).unwrap();
        assert_eq!(started.status, RoundStatus::Started);
        let result = started.result.expect("started round has a result");
        assert_eq!(result.bet_cents, 100);
        assert_eq!(
            result.combined_seed,
            seeds::combined_seed(&committed.server_seed, "player-seed", &committed.nonce)
        );

        let revealed = store.reveal(&committed.id).unwrap();
        assert_eq!(revealed.status, RoundStatus::Revealed);
        assert!(revealed.revealed_at_ms.is_some());
    }

    #[test]
    fn test_double_start_rejected() {
        let store = RoundStore::new();
        let committed = store.commit();

        store.start(&committed.id, "seed", 100, 6).unwrap();
        let second = store.start(&committed.id, "seed", 100, 6);
        assert!(matches!(
            second,
            Err(StoreError::StateViolation {
                actual: RoundStatus::Started,
                ..
            })
        ));
    }

    #[test]
    fn test_reveal_requires_start() {
        let store = RoundStore::new();
        let committed = store.commit();

        let result = store.reveal(&committed.id);
        assert!(matches!(
            result,
            Err(StoreError::StateViolation {
                actual: RoundStatus::Created,
                ..
            })
        ));
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let store = RoundStore::new();
        let committed = store.commit();
        store.start(&committed.id, "seed", 100, 6).unwrap();

        let first = store.reveal(&committed.id).unwrap();
        let second = store.reveal(&committed.id).unwrap();
        assert_eq!(second.status, RoundStatus::Revealed);
        assert_eq!(first.revealed_at_ms, second.revealed_at_ms);
    }

    #[test]
    fn test_start_propagates_engine_validation() {
        let store = RoundStore::new();
        let committed = store.commit();

        let result = store.start(&committed.id, "seed", 100, 13);
        assert!(matches!(
            result,
            Err(StoreError::Engine(EngineError::InvalidParameter(_)))
        ));

        // A rejected start leaves the round startable.
        assert!(store.start(&committed.id, "seed", 100, 12).is_ok());
    }

    #[test]
    fn test_unknown_round() {
        let store = RoundStore::new();
        assert!(matches!(
            store.get("missing"),
            Err(StoreError::RoundNotFound(_))
        ));
        assert!(matches!(
            store.start("missing", "seed", 100, 6),
            Err(StoreError::RoundNotFound(_))
        ));
        assert!(matches!(
            store.reveal("missing"),
            Err(StoreError::RoundNotFound(_))
        ));
    }
}
