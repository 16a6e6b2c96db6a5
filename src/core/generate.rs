//! VF-003: Random value generation for `alnum`, `alpha`, `digit`, and `b64`.
//!
//! Callers supply the RNG; it must be a `CryptoRng`. Production code uses
//! `rand::rngs::OsRng`, tests use a seeded `StdRng`.

use super::types::MAX_GENERATED_LEN;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};

/// Parse a length/byte-count argument: ASCII digits only, bounded.
///
/// Lengths above `MAX_GENERATED_LEN` are refused rather than honoured, so
/// `{{alnum:n}}` and `{{b64:n}}` only produce exactly `n` characters or bytes
/// up to that limit. Larger placeholders stay as written, with a warning.
pub fn parse_length(argument: &str) -> Result<usize, String> {
    if argument.is_empty() || !argument.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a non-negative integer", argument));
    }
    let n: usize = argument
        .parse()
        .map_err(|_| format!("'{}' is too large", argument))?;
    if n > MAX_GENERATED_LEN {
        return Err(format!("{} exceeds the maximum of {}", n, MAX_GENERATED_LEN));
    }
    Ok(n)
}

/// `len` characters drawn uniformly, with replacement, from `charset`.
pub fn random_string<R>(rng: &mut R, charset: &[u8], len: usize) -> String
where
    R: RngCore + CryptoRng + ?Sized,
{
    (0..len)
        .filter_map(|_| charset.choose(rng).map(|&b| b as char))
        .collect()
}

/// `len` random bytes, standard base64 with padding.
pub fn random_base64<R>(rng: &mut R, len: usize) -> String
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    STANDARD.encode(&bytes)
}
