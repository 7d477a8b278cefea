//! # gauth-totp: Google Authenticator compatible TOTP
//!
//! Time-based one-time passwords compatible with Google Authenticator and
//! other apps following its key-URI convention:
//!
//! - **RFC 4226 / 6238** – HMAC-SHA1 code derivation with dynamic truncation
//! - **Windowed verification** – constant-time comparison across a tolerance
//!   window of time steps
//! - **Base-32 secrets** – generation from the OS CSPRNG, case-insensitive decoding
//! - **Provisioning URLs** – `otpauth://totp/` URIs wrapped in a QR image link
//!
//! ```no_run
//! use gauth_totp::totp::{EngineConfig, TotpEngine};
//!
//! let engine = TotpEngine::new(EngineConfig::default())?;
//! let secret = engine.generate_secret();
//! let code = engine.get_code(&secret)?;
//! assert!(engine.check_code(&secret, &code)?);
//! # Ok::<(), gauth_totp::totp::TotpError>(())
//! ```

pub mod totp;
