//! Random token generation.

use rand::Rng;

/// Characters used for nonces and session tokens.
pub const RANDOM_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the per-request nonce.
pub const NONCE_LENGTH: usize = 32;

/// Length of a generated guest session token.
pub const SESSION_LENGTH: usize = 40;

/// Generate `len` characters from [`RANDOM_CHARSET`] using the given source.
///
/// Pass a seeded `StdRng` for reproducible output.
pub fn random_string<R: Rng>(len: usize, rng: &mut R) -> String {
    (0..len)
        .map(|_| RANDOM_CHARSET[rng.gen_range(0..RANDOM_CHARSET.len())] as char)
        .collect()
}
