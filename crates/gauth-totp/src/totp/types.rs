//! Core types for the TOTP engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the effective time step, in seconds.
pub const DEFAULT_TIME_STEP: u32 = 30;
/// Default number of digits in a generated code.
pub const DEFAULT_CODE_LENGTH: u32 = 6;
/// Default number of random bytes drawn for a new secret.
pub const DEFAULT_SECRET_LENGTH: usize = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash algorithm advertised in provisioning URIs.
///
/// Codes are always computed with HMAC-SHA1; this value only annotates the
/// `otpauth://` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_name())
    }
}

impl Algorithm {
    /// Parse from a case-insensitive string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SHA1" | "SHA-1" | "HMACSHA1" | "HMAC-SHA1" => Some(Self::Sha1),
            "SHA256" | "SHA-256" | "HMACSHA256" | "HMAC-SHA256" => Some(Self::Sha256),
            "SHA512" | "SHA-512" | "HMACSHA512" | "HMAC-SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Like [`Algorithm::parse`], falling back to SHA-1 on unrecognised input.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// URI-safe name for `otpauth://` parameters.
    pub fn uri_name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Engine configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Immutable configuration of a [`TotpEngine`](crate::totp::TotpEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Number of digits in a generated code.
    pub code_length: u32,
    /// Number of random bytes drawn by `generate_secret`.
    pub secret_length: usize,
    /// Nominal validity of one code, in seconds.
    pub code_period: u32,
    /// Instant used when the caller does not pass one. Unset means the time
    /// the engine is built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<DateTime<Utc>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            secret_length: DEFAULT_SECRET_LENGTH,
            code_period: DEFAULT_TIME_STEP,
            reference_time: None,
        }
    }
}

impl EngineConfig {
    /// Load a (possibly partial) configuration from JSON. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, TotpError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TotpError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: set code length.
    pub fn with_code_length(mut self, code_length: u32) -> Self {
        self.code_length = code_length;
        self
    }

    /// Builder: set secret length in bytes.
    pub fn with_secret_length(mut self, secret_length: usize) -> Self {
        self.secret_length = secret_length;
        self
    }

    /// Builder: set code period in seconds.
    pub fn with_code_period(mut self, code_period: u32) -> Self {
        self.code_period = code_period;
        self
    }

    /// Builder: set the reference instant.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    /// Effective time step: the default step, shrunk to the code period when
    /// the period is shorter.
    pub fn time_step(&self) -> u32 {
        self.code_period.min(DEFAULT_TIME_STEP)
    }

    /// Number of whole time steps a single code spans.
    pub fn periods(&self) -> u32 {
        self.code_period / self.time_step()
    }

    pub fn validate(&self) -> Result<(), TotpError> {
        if self.code_length == 0 {
            return Err(TotpError::InvalidConfig(
                "code length must be greater than zero".into(),
            ));
        }
        if self.secret_length == 0 {
            return Err(TotpError::InvalidConfig(
                "secret length must be greater than zero".into(),
            ));
        }
        if self.code_period == 0 {
            return Err(TotpError::InvalidConfig(
                "code period must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TotpError {
    #[error("invalid base-32 character {character:?} at position {position}")]
    InvalidEncoding { character: char, position: usize },

    #[error("invalid secret: {reason}")]
    InvalidSecret { reason: String },

    #[error("the account name may not contain a colon (:) and may not be empty, given {0:?}")]
    InvalidAccountName(String),

    #[error("the issuer may not contain a colon (:) and may not be empty, given {0:?}")]
    InvalidIssuer(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TotpError {
    pub(crate) fn invalid_secret(reason: impl Into<String>) -> Self {
        Self::InvalidSecret {
            reason: reason.into(),
        }
    }
}

impl From<TotpError> for String {
    fn from(e: TotpError) -> String {
        e.to_string()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of verifying a submitted code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    pub valid: bool,
    /// Steps between the matched counter and the counter of the checked
    /// instant (0 = same step, negative = earlier).
    pub drift: i64,
    /// The counter value that matched (if any).
    pub matched_counter: Option<u64>,
}

impl VerifyResult {
    pub(crate) fn rejected() -> Self {
        Self {
            valid: false,
            drift: 0,
            matched_counter: None,
        }
    }
}
