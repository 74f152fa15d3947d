//! Random token generation

use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::OsRng;

/// An alphanumeric string of `len` characters drawn from the OS RNG.
#[must_use]
pub fn generate_secure_token(len: usize) -> String {
    Alphanumeric.sample_string(&mut OsRng, len)
}
