//! TOTP crate: sub-modules.

pub mod types;
pub mod base32;
pub mod core;
pub mod engine;
pub mod qr_url;

// Re-export top-level items for convenience.
pub use types::*;
pub use engine::{TotpEngine, DEFAULT_DISCREPANCY};
pub use qr_url::{build_otpauth_uri, google_qr_url, qr_url_for_host, ProvisioningUri};
