//! Provisioning URLs: `otpauth://totp/...` key URIs per the Google
//! Authenticator key-URI format, wrapped in a QR image-service link.
//!
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//! <http://goqr.me/api/doc/>
//!
//! Format: `otpauth://totp/ISSUER:LABEL?secret=BASE32&issuer=ISSUER&algorithm=SHA1&digits=6&period=30`

use crate::totp::types::*;

const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
/// Default QR image edge length in pixels.
pub const DEFAULT_QR_SIZE: u32 = 200;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Provisioning parameters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Everything an authenticator app needs to import a secret.
///
/// `digits`, `period` and `algorithm` are display hints; they are only
/// written to the URI when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningUri {
    pub account_name: String,
    pub secret: String,
    pub issuer: Option<String>,
    pub digits: Option<u32>,
    pub period: Option<u32>,
    pub algorithm: Option<Algorithm>,
}

impl ProvisioningUri {
    pub fn new(account_name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            secret: secret.into(),
            issuer: None,
            digits: None,
            period: None,
            algorithm: None,
        }
    }

    /// Builder: set issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Builder: set digit count hint.
    pub fn with_digits(mut self, digits: u32) -> Self {
        self.digits = Some(digits);
        self
    }

    /// Builder: set period hint.
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    /// Builder: set algorithm hint.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Builder: copy digit and period hints from an engine configuration.
    pub fn with_config_hints(self, config: &EngineConfig) -> Self {
        self.with_digits(config.code_length)
            .with_period(config.code_period)
    }

    fn validate(&self) -> Result<(), TotpError> {
        if self.account_name.is_empty() || self.account_name.contains(':') {
            return Err(TotpError::InvalidAccountName(self.account_name.clone()));
        }
        if self.secret.is_empty() {
            return Err(TotpError::invalid_secret("the secret may not be empty"));
        }
        if let Some(issuer) = &self.issuer {
            if issuer.is_empty() || issuer.contains(':') {
                return Err(TotpError::InvalidIssuer(issuer.clone()));
            }
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate the `otpauth://totp/` key URI.
///
/// With an issuer, the label is prefixed `issuer:` and the `issuer`
/// parameter is set as well.
pub fn build_otpauth_uri(p: &ProvisioningUri) -> Result<String, TotpError> {
    p.validate()?;

    let label = match &p.issuer {
        Some(iss) => format!("{}:{}", iss, p.account_name),
        None => p.account_name.clone(),
    };

    let mut params = vec![format!("secret={}", p.secret)];

    if let Some(iss) = &p.issuer {
        params.push(format!("issuer={}", iss));
    }
    if let Some(algo) = p.algorithm {
        params.push(format!("algorithm={}", algo.uri_name()));
    }
    if let Some(digits) = p.digits {
        params.push(format!("digits={}", digits));
    }
    if let Some(period) = p.period {
        params.push(format!("period={}", period));
    }

    Ok(format!("otpauth://totp/{}?{}", label, params.join("&")))
}

/// Link to a QR image (`size`×`size` px) encoding the key URI.
pub fn google_qr_url(p: &ProvisioningUri, size: u32) -> Result<String, TotpError> {
    let otpauth = build_otpauth_uri(p)?;
    Ok(format!(
        "{}?size={}x{}&data={}&ecc=M",
        QR_SERVICE_URL,
        size,
        size,
        raw_url_encode(&otpauth)
    ))
}

/// QR link for `user@hostname`.
///
/// The issuer is not placed in the key URI; it is appended verbatim as an
/// already-encoded `&issuer=` suffix after the query, which is the shape
/// existing callers depend on.
pub fn qr_url_for_host(
    user: &str,
    hostname: &str,
    secret: &str,
    issuer: Option<&str>,
) -> Result<String, TotpError> {
    let account = format!("{}@{}", user, hostname);
    let mut url = google_qr_url(&ProvisioningUri::new(account, secret), DEFAULT_QR_SIZE)?;
    if let Some(iss) = issuer.filter(|i| !i.is_empty()) {
        url.push_str("%26issuer%3D");
        url.push_str(iss);
    }
    Ok(url)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  URL encoding helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// RFC 3986 percent-encoding: everything but unreserved characters.
fn raw_url_encode(s: &str) -> String {
    let mut output = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            _ => output.push_str(&format!("%{:02X}", byte)),
        }
    }
    output
}
