//! Core OTP primitives: RFC 4226 (HOTP) truncation over HMAC-SHA1 and the
//! RFC 6238 time-counter helpers the engine builds on.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for the given raw key bytes and counter.
pub fn hotp_raw(key: &[u8], counter: u64, digits: u32) -> String {
    let hmac_result = hmac_sha1(key, &counter.to_be_bytes());
    truncate(&hmac_result, digits)
}

fn hmac_sha1(key: &[u8], data: &[u8]) -> [u8; 20] {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(hmac_result: &[u8; 20], digits: u32) -> String {
    let offset = (hmac_result[19] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        hmac_result[offset],
        hmac_result[offset + 1],
        hmac_result[offset + 2],
        hmac_result[offset + 3],
    ]) & 0x7fff_ffff;
    // Past 10 digits the modulus exceeds the 31-bit value; it is only padded.
    let code = u64::from(binary) % 10u64.checked_pow(digits).unwrap_or(u64::MAX);
    format!("{:0>width$}", code, width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time steps (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Unix seconds of `at`, clamped to zero for instants before the epoch.
pub fn unix_seconds(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp()).unwrap_or(0)
}

/// Compute the time-step counter for a given instant.
pub fn counter_at(at: DateTime<Utc>, step: u32) -> u64 {
    unix_seconds(at) / step as u64
}

/// Seconds remaining until the step containing `at` expires.
pub fn seconds_remaining_at(at: DateTime<Utc>, step: u32) -> u32 {
    let p = step as u64;
    (p - (unix_seconds(at) % p)) as u32
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Comparison
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Constant-time comparison (to prevent timing attacks on code verification).
///
/// Only the length is allowed to leak; equal-length inputs are always
/// compared byte-for-byte to the end.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
