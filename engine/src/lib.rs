//! Pegfall round engine.
//!
//! This crate turns round inputs (server seed, client seed, nonce, drop
//! column, bet) into a reproducible board, ball path, landing bin, and
//! payout. The point of the design is that every independent party can
//! recompute byte-identical results from the same inputs.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside round computation.
//! - Do not use non-deterministic randomness; all draws derive from the
//!   combined seed through one [`RoundRng`] per round.
//! - Draw ordering is fixed: every board draw is consumed, row-major and
//!   left-to-right, before any descent draw. Reordering changes every
//!   downstream outcome.
//! - Arithmetic that feeds the protocol (32-bit state updates, IEEE-754
//!   double division, half-up rounding) is pinned; do not substitute
//!   "equivalent" operations.
//!
//! ## Minimal round (example)
//! ```rust,ignore
//! use pegfall_engine::{play_round, seeds};
//!
//! let server_seed = seeds::generate_server_seed();
//! let nonce = seeds::generate_nonce();
//! let commitment = seeds::create_commitment(&server_seed, &nonce);
//! // ... publish `commitment`, receive the client seed ...
//! let result = play_round(&server_seed, "client-seed", &nonce, 6, 100)?;
//! assert!(result.bin_index <= 12);
//! # Ok::<(), pegfall_engine::EngineError>(())
//! ```

pub mod board;
pub mod payout;
pub mod rng;
pub mod round;
pub mod seeds;
pub mod sim;

mod error;


pub use error::EngineError;
pub use rng::{RoundRng, XorShift32};
pub use round::play_round;
