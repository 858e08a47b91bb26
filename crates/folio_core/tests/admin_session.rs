use folio_core::{AdminCredentials, AdminSession, FolioConfig, SessionError};

const NOW: i64 = 1_700_000_000_000;
const TTL: i64 = 60_000;

#[test]
fn new_session_is_signed_out() {
    let session = AdminSession::new();
    assert!(!session.is_authenticated(NOW));
    assert_eq!(
        session.require_authenticated(NOW),
        Err(SessionError::NotAuthenticated)
    );
    assert_eq!(session.expires_at(), None);
}

#[test]
fn sign_in_with_configured_credentials_until_expiry() {
    let credentials = AdminCredentials::default();
    let mut session = AdminSession::new();
    session
        .sign_in(&credentials, "admin@example.com", "password", NOW, TTL)
        .unwrap();

    assert!(session.is_authenticated(NOW));
    assert!(session.is_authenticated(NOW + TTL - 1));
    assert!(!session.is_authenticated(NOW + TTL));
    assert_eq!(
        session.require_authenticated(NOW + TTL),
        Err(SessionError::Expired {
            expired_at: NOW + TTL
        })
    );
}

#[test]
fn wrong_credentials_are_rejected_without_signing_in() {
    let credentials = AdminCredentials::new("owner@folio.dev", "s3cret");
    let mut session = AdminSession::new();

    let err = session
        .sign_in(&credentials, "owner@folio.dev", "S3CRET", NOW, TTL)
        .unwrap_err();
    assert_eq!(err, SessionError::InvalidCredentials);
    assert!(!session.is_authenticated(NOW));
}

#[test]
fn email_must_match_exactly() {
    let credentials = AdminCredentials::default();
    let mut session = AdminSession::new();

    for email in [" admin@example.com ", "admin@example.com\n", "Admin@example.com"] {
        let err = session
            .sign_in(&credentials, email, "password", NOW, TTL)
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidCredentials);
    }
    assert!(!session.is_authenticated(NOW));
}

#[test]
fn failed_attempt_keeps_existing_session() {
    let credentials = AdminCredentials::default();
    let mut session = AdminSession::new();
    session
        .sign_in(&credentials, "admin@example.com", "password", NOW, TTL)
        .unwrap();
    session
        .sign_in(&credentials, "admin@example.com", "nope", NOW + 1, TTL)
        .unwrap_err();
    assert_eq!(session.expires_at(), Some(NOW + TTL));
}

#[test]
fn sign_out_clears_state() {
    let credentials = AdminCredentials::default();
    let mut session = AdminSession::new();
    session
        .sign_in(&credentials, "admin@example.com", "password", NOW, TTL)
        .unwrap();
    session.sign_out();
    assert_eq!(session, AdminSession::new());
}

#[test]
fn non_positive_ttl_is_rejected() {
    let mut session = AdminSession::new();
    let err = session
        .sign_in(&AdminCredentials::default(), "admin@example.com", "password", NOW, 0)
        .unwrap_err();
    assert_eq!(err, SessionError::InvalidTtl(0));
}

#[test]
fn config_supplies_credentials_and_ttl() {
    let config = FolioConfig::from_json_str(
        r#"{
            "session_ttl_ms": 1000,
            "admin": { "email": "me@folio.dev", "password": "pw" }
        }"#,
    )
    .unwrap();

    let mut session = AdminSession::new();
    session
        .sign_in(&config.admin, "me@folio.dev", "pw", NOW, config.session_ttl_ms)
        .unwrap();
    assert_eq!(session.expires_at(), Some(NOW + 1000));
}
