//! Commit-reveal seed protocol.
//!
//! ## Flow
//!
//! 1. **Commit** - the server fixes a secret seed and a nonce and
//!    publishes `sha256(server_seed + ":" + nonce)` before the player
//!    has chosen anything
//! 2. **Start** - the player supplies a seed; all round randomness
//!    derives from `sha256(server_seed + ":" + client_seed + ":" + nonce)`
//! 3. **Reveal** - the server discloses the secret after the round
//! 4. **Verify** - anyone recomputes the commitment and replays the round
//!
//! Hash inputs are UTF-8 with literal `:` separators; digests are
//! lowercase hex. The framing is a protocol contract shared with every
//! verifier, not an implementation choice.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::EngineError;

/// Hex characters consumed from the combined seed when seeding the PRNG.
const PRNG_SEED_HEX_CHARS: usize = 8;

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a fresh 64-hex-character server secret.
///
/// Entropy comes from the operating system CSPRNG. The client must not be
/// able to predict this value; the commit-reveal protocol is worthless
/// otherwise.
pub fn generate_server_seed() -> String {
    let mut entropy = [0u8; 32];
    OsRng.fill_bytes(&mut entropy);
    hex::encode(entropy)
}

/// Generate a unique per-round nonce.
pub fn generate_nonce() -> String {
    Uuid::new_v4().to_string()
}

/// Commitment published before the client seed is known.
///
/// Binds the server to `server_seed` for this nonce: any later change is
/// detectable by recomputation.
pub fn create_commitment(server_seed: &str, nonce: &str) -> String {
    sha256_hex(&format!("{server_seed}:{nonce}"))
}

/// Seed every round draw derives from.
///
/// Pure function of its inputs; recomputable by anyone once the server
/// seed is revealed.
pub fn combined_seed(server_seed: &str, client_seed: &str, nonce: &str) -> String {
    sha256_hex(&format!("{server_seed}:{client_seed}:{nonce}"))
}

/// Check a revealed seed against a previously published commitment.
///
/// A `false` return is a meaningful negative (possible tampering), not a
/// fault, so this returns a boolean and never fails.
pub fn verify_commitment(server_seed: &str, nonce: &str, commitment: &str) -> bool {
    create_commitment(server_seed, nonce) == commitment
}

/// Parse the first 8 hex characters of a seed as a big-endian u32.
///
/// Fails when fewer than 8 hex characters are available; a partial parse
/// would silently seed the generator differently than other
/// implementations of the protocol.
pub fn extract_prng_seed(hex_seed: &str) -> Result<u32, EngineError> {
    let prefix = hex_seed.get(..PRNG_SEED_HEX_CHARS).ok_or_else(|| {
        EngineError::InvalidSeedFormat(format!(
            "expected at least {PRNG_SEED_HEX_CHARS} hex characters, got {}",
            hex_seed.len()
        ))
    })?;
    if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EngineError::InvalidSeedFormat(format!(
            "non-hex character in seed prefix {prefix:?}"
        )));
    }
    u32::from_str_radix(prefix, 16).map_err(|_| {
        EngineError::InvalidSeedFormat(format!("unparseable seed prefix {prefix:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_seed_shape() {
        let seed = generate_server_seed();
        assert_eq!(seed.len(), 64);
        assert!(seed.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        // Two seeds from the CSPRNG colliding means something is very wrong.
        assert_ne!(seed, generate_server_seed());
    }

    #[test]
    fn test_nonce_unique() {
        assert_ne!(generate_nonce(), generate_nonce());
    }

    #[test]
    fn test_commitment_framing() {
        // The commitment is the hash of the exact framed string.
        assert_eq!(create_commitment("seed", "nonce"), sha256_hex("seed:nonce"));
        assert_eq!(
            combined_seed("server", "client", "n1"),
            sha256_hex("server:client:n1")
        );

        // Field order matters: swapping fields changes the digest.
        assert_ne!(
            combined_seed("server", "client", "n1"),
            combined_seed("client", "server", "n1")
        );
    }

    #[test]
    fn test_verify_commitment_roundtrip() {
        let server_seed = generate_server_seed();
        let nonce = generate_nonce();
        let commitment = create_commitment(&server_seed, &nonce);

        assert!(verify_commitment(&server_seed, &nonce, &commitment));
        assert!(!verify_commitment(&server_seed, "other-nonce", &commitment));
        assert!(!verify_commitment("other-seed", &nonce, &commitment));
        assert!(!verify_commitment(&server_seed, &nonce, "deadbeef"));
    }

    #[test]
    fn test_extract_prng_seed_big_endian() {
        assert_eq!(extract_prng_seed("deadbeef").unwrap(), 0xdeadbeef);
        assert_eq!(extract_prng_seed("00000001ffff").unwrap(), 1);
        assert_eq!(
            extract_prng_seed("e1dddf77de27d395").unwrap(),
            0xe1dddf77
        );
    }

    #[test]
    fn test_extract_prng_seed_rejects_short_input() {
        assert!(matches!(
            extract_prng_seed("abc"),
            Err(EngineError::InvalidSeedFormat(_))
        ));
        assert!(matches!(
            extract_prng_seed(""),
            Err(EngineError::InvalidSeedFormat(_))
        ));
    }

    #[test]
    fn test_extract_prng_seed_rejects_non_hex() {
        // Eight characters, but not eight hex characters. A lenient parser
        // would accept the valid prefix and diverge from other verifiers.
        assert!(matches!(
            extract_prng_seed("12zzzzzz"),
            Err(EngineError::InvalidSeedFormat(_))
        ));
        assert!(matches!(
            extract_prng_seed("+1234567"),
            Err(EngineError::InvalidSeedFormat(_))
        ));
    }
}
