//! Window vectors for secret `3DHTQX4GCRKHGS55CJ` with the engine pinned to
//! 2012-03-17 22:17:00 UTC. Each case generates a code at the given instant
//! and checks it against the reference time.

use chrono::{DateTime, TimeZone, Utc};
use gauth_totp::totp::{qr_url_for_host, EngineConfig, TotpEngine, TotpError};

const SECRET: &str = "3DHTQX4GCRKHGS55CJ";

fn time(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2012, 3, 17, h, m, s).unwrap()
}

fn engine(code_length: u32, code_period: u32) -> TotpEngine {
    TotpEngine::new(
        EngineConfig::default()
            .with_code_length(code_length)
            .with_code_period(code_period)
            .with_reference_time(time(22, 17, 0)),
    )
    .unwrap()
}

fn assert_window(engine: &TotpEngine, discrepancy: u32, cases: &[(bool, DateTime<Utc>, &str)]) {
    for (expected, at, name) in cases {
        let code = engine.get_code_at(SECRET, *at).unwrap();
        let valid = engine
            .check_code_with_discrepancy(SECRET, &code, discrepancy)
            .unwrap();
        assert_eq!(valid, *expected, "{} ({})", name, at);
    }
}

#[test]
fn check_code() {
    assert_window(
        &engine(6, 30),
        1,
        &[
            (false, time(22, 16, 29), "1 second before valid interval"),
            (true, time(22, 16, 30), "beginning of interval"),
            (true, time(22, 17, 0), "same as code create time"),
            (true, time(22, 17, 59), "end of interval"),
            (false, time(22, 18, 0), "1 second after valid interval"),
        ],
    );
}

#[test]
fn check_code_default_discrepancy() {
    let e = engine(6, 30);
    let inside = e.get_code_at(SECRET, time(22, 16, 30)).unwrap();
    let outside = e.get_code_at(SECRET, time(22, 16, 29)).unwrap();
    assert!(e.check_code(SECRET, &inside).unwrap());
    assert!(!e.check_code(SECRET, &outside).unwrap());
}

#[test]
fn check_code_discrepancy() {
    assert_window(
        &engine(6, 30),
        0,
        &[
            (false, time(22, 16, 59), "1 second before valid interval"),
            (true, time(22, 17, 0), "beginning of interval"),
            (true, time(22, 17, 29), "end of interval"),
            (false, time(22, 17, 30), "1 second after valid interval"),
        ],
    );
}

#[test]
fn check_code_custom_period() {
    assert_window(
        &engine(6, 300),
        1,
        &[
            (false, time(22, 11, 59), "1 second before valid interval"),
            (true, time(22, 12, 0), "beginning of interval"),
            (true, time(22, 17, 0), "same as code create time"),
            (true, time(22, 17, 59), "end of interval"),
            (false, time(22, 18, 0), "1 second after valid interval"),
        ],
    );
}

#[test]
fn check_code_custom_period_discrepancy() {
    assert_window(
        &engine(6, 300),
        0,
        &[
            (false, time(22, 12, 29), "1 second before valid interval"),
            (true, time(22, 12, 30), "beginning of interval"),
            (true, time(22, 17, 29), "end of interval"),
            (false, time(22, 17, 30), "1 second after valid interval"),
        ],
    );
}

#[test]
fn generate_secret_length() {
    assert_eq!(TotpEngine::default().generate_secret().len(), 16);
}

#[test]
fn get_code_returns_defined_length() {
    let e = engine(8, 30);
    for _ in 0..1000 {
        assert_eq!(e.get_code(&e.generate_secret()).unwrap().len(), 8);
    }
}

#[test]
fn get_code_rejects_empty_secret() {
    assert!(matches!(
        TotpEngine::default().get_code(""),
        Err(TotpError::InvalidSecret { .. })
    ));
}

#[test]
fn url_for_host() {
    assert_eq!(
        qr_url_for_host("foo", "foobar.org", SECRET, Some("FooBar")).unwrap(),
        "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=otpauth%3A%2F%2Ftotp%2Ffoo%40foobar.org%3Fsecret%3D3DHTQX4GCRKHGS55CJ&ecc=M%26issuer%3DFooBar"
    );
    assert_eq!(
        qr_url_for_host("foo", "foobar.org", SECRET, None).unwrap(),
        "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=otpauth%3A%2F%2Ftotp%2Ffoo%40foobar.org%3Fsecret%3D3DHTQX4GCRKHGS55CJ&ecc=M"
    );
}
