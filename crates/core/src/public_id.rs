//! Public identifier generation and validation.
//!
//! A public id is the only thing standing between an anonymous caller and a
//! published script, so it is drawn from a cryptographically secure source.
//! Uniqueness is enforced by the store (`uq_scripts_public_id`); callers
//! retry with a fresh candidate on the rare collision.

use rand::{CryptoRng, Rng};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Characters a public id may contain.
///
/// Digits 2-9 and mixed-case letters, minus the look-alikes `0 1 i I l L o O`.
pub const PUBLIC_ID_ALPHABET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyzABCDEFGHJKMNPQRSTUVWXYZ";

/// Length of every generated public id.
pub const PUBLIC_ID_LENGTH: usize = 10;

/// How many fresh candidates a publish attempt may try before giving up.
pub const MAX_PUBLIC_ID_ATTEMPTS: usize = 5;

/// Extension accepted (and stripped) on public script URLs.
pub const PUBLIC_SCRIPT_EXTENSION: &str = ".js";

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a new public id from the thread-local CSPRNG.
pub fn generate_public_id() -> String {
    generate_public_id_with(&mut rand::rng())
}

/// Generate a public id from the given generator.
///
/// Each character is sampled uniformly from [`PUBLIC_ID_ALPHABET`].
pub fn generate_public_id_with<R: Rng + CryptoRng>(rng: &mut R) -> String {
    (0..PUBLIC_ID_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..PUBLIC_ID_ALPHABET.len());
            char::from(PUBLIC_ID_ALPHABET[idx])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Whether `candidate` could have been produced by [`generate_public_id`].
pub fn is_well_formed(candidate: &str) -> bool {
    candidate.len() == PUBLIC_ID_LENGTH
        && candidate.bytes().all(|b| PUBLIC_ID_ALPHABET.contains(&b))
}

/// Strip the optional [`PUBLIC_SCRIPT_EXTENSION`] from a URL path segment.
///
/// ```
/// use abinject_core::public_id::strip_public_extension;
/// assert_eq!(strip_public_extension("abcDEF2345.js"), "abcDEF2345");
/// assert_eq!(strip_public_extension("abcDEF2345"), "abcDEF2345");
/// ```
pub fn strip_public_extension(segment: &str) -> &str {
    segment
        .strip_suffix(PUBLIC_SCRIPT_EXTENSION)
        .unwrap_or(segment)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
