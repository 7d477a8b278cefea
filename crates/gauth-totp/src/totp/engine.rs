//! The TOTP engine: secret generation, code derivation and windowed
//! verification over an immutable [`EngineConfig`].

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::totp::base32;
use crate::totp::core;
use crate::totp::types::*;

/// Default number of extra time steps accepted on either side of a code.
pub const DEFAULT_DISCREPANCY: u32 = 1;

/// Google Authenticator compatible TOTP engine.
///
/// Holds no mutable state, so a single instance can be shared across
/// threads (e.g. behind an `Arc`) without locking.
#[derive(Debug, Clone)]
pub struct TotpEngine {
    config: EngineConfig,
    reference_time: DateTime<Utc>,
}

impl Default for TotpEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            reference_time: Utc::now(),
        }
    }
}

impl TotpEngine {
    /// Create an engine, rejecting an invalid configuration.
    pub fn new(config: EngineConfig) -> Result<Self, TotpError> {
        config.validate()?;
        log::debug!(
            "TOTP engine: {} digits, period {}s, step {}s",
            config.code_length,
            config.code_period,
            config.time_step()
        );
        let reference_time = config.reference_time.unwrap_or_else(Utc::now);
        Ok(Self {
            config,
            reference_time,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Instant used by the calls that take no explicit time.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// Effective time step in seconds.
    pub fn time_step(&self) -> u32 {
        self.config.time_step()
    }

    /// Time-step counter for `at`.
    pub fn counter_at(&self, at: DateTime<Utc>) -> u64 {
        core::counter_at(at, self.time_step())
    }

    /// Seconds until the step containing `at` rolls over.
    pub fn seconds_remaining_at(&self, at: DateTime<Utc>) -> u32 {
        core::seconds_remaining_at(at, self.time_step())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Secrets
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Generate a cryptographically-random base-32 secret of
    /// `secret_length` bytes.
    pub fn generate_secret(&self) -> String {
        let mut buf = vec![0u8; self.config.secret_length];
        rand::rngs::OsRng.fill_bytes(&mut buf);
        base32::encode(&buf)
    }

    fn decode_secret(&self, secret: &str) -> Result<Vec<u8>, TotpError> {
        let key = base32::decode(secret).map_err(|e| {
            log::debug!("rejected secret: {}", e);
            TotpError::invalid_secret(e.to_string())
        })?;
        if key.is_empty() {
            log::debug!("rejected secret: empty");
            return Err(TotpError::invalid_secret("the secret may not be empty"));
        }
        Ok(key)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Code generation
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Code for `secret` at the configured reference time.
    pub fn get_code(&self, secret: &str) -> Result<String, TotpError> {
        self.get_code_at(secret, self.reference_time)
    }

    /// Code for `secret` at an explicit instant.
    pub fn get_code_at(&self, secret: &str, at: DateTime<Utc>) -> Result<String, TotpError> {
        let key = self.decode_secret(secret)?;
        Ok(core::hotp_raw(&key, self.counter_at(at), self.config.code_length))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Verification
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Check `code` at the reference time with the default discrepancy.
    pub fn check_code(&self, secret: &str, code: &str) -> Result<bool, TotpError> {
        self.check_code_at(secret, code, DEFAULT_DISCREPANCY, self.reference_time)
    }

    /// Check `code` at the reference time with an explicit discrepancy.
    pub fn check_code_with_discrepancy(
        &self,
        secret: &str,
        code: &str,
        discrepancy: u32,
    ) -> Result<bool, TotpError> {
        self.check_code_at(secret, code, discrepancy, self.reference_time)
    }

    /// Check `code` against the window around `at`.
    pub fn check_code_at(
        &self,
        secret: &str,
        code: &str,
        discrepancy: u32,
        at: DateTime<Utc>,
    ) -> Result<bool, TotpError> {
        Ok(self.verify_code_at(secret, code, discrepancy, at)?.valid)
    }

    /// Verify `code` against the window around `at`.
    ///
    /// The window covers `discrepancy` steps after `at` and
    /// `periods + discrepancy - 1` steps before it, where `periods` is the
    /// number of steps one code period spans. Every candidate in the window
    /// is computed and compared; the loop never exits early. Candidates that
    /// fall outside the representable time range are skipped.
    pub fn verify_code_at(
        &self,
        secret: &str,
        code: &str,
        discrepancy: u32,
        at: DateTime<Utc>,
    ) -> Result<VerifyResult, TotpError> {
        let key = self.decode_secret(secret)?;
        let step = self.time_step();
        let base_counter = self.counter_at(at);
        let start = -i64::from(discrepancy);
        let end = i64::from(self.config.periods()) + i64::from(discrepancy);

        let mut result = VerifyResult::rejected();
        for i in start..end {
            let offset = Duration::seconds(i * i64::from(step));
            let Some(candidate_at) = at.checked_sub_signed(offset) else {
                continue;
            };
            let counter = self.counter_at(candidate_at);
            let candidate = core::hotp_raw(&key, counter, self.config.code_length);
            if core::constant_time_eq(candidate.as_bytes(), code.as_bytes()) {
                result = VerifyResult {
                    valid: true,
                    drift: counter as i64 - base_counter as i64,
                    matched_counter: Some(counter),
                };
            }
        }

        log::trace!(
            "verified code over {} steps, matched: {}",
            end - start,
            result.valid
        );
        Ok(result)
    }
}
