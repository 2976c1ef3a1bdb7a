use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_uses_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.endpoint, DEFAULT_GRAPHQL_URL);
    assert_eq!(cfg.auth_email, None);
    assert_eq!(cfg.timeouts, Timeouts::default());
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("NIMBUS_GRAPHQL_URL", "https://experimenter.example.test/api/v5/graphql/"),
        ("NIMBUS_AUTH_EMAIL", "dev@example.com"),
        ("NIMBUS_REQUEST_TIMEOUT_SECS", "42"),
        ("NIMBUS_CONNECT_TIMEOUT_SECS", " 7 "),
    ]))
    .unwrap();

    assert_eq!(cfg.endpoint, "https://experimenter.example.test/api/v5/graphql");
    assert_eq!(cfg.auth_email.as_deref(), Some("dev@example.com"));
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_ignores_blank_auth_email() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("NIMBUS_AUTH_EMAIL", "  ")])).unwrap();
    assert_eq!(cfg.auth_email, None);
}

#[test]
fn from_lookup_rejects_non_numeric_timeout() {
    let err = ClientConfig::from_lookup(lookup_from(&[("NIMBUS_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { var: "NIMBUS_REQUEST_TIMEOUT_SECS", .. }));
    assert!(err.to_string().contains("soon"));
}

#[test]
fn from_lookup_rejects_relative_url() {
    let err = ClientConfig::from_lookup(lookup_from(&[("NIMBUS_GRAPHQL_URL", "/api/v5/graphql")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUrl { .. }));
}

#[test]
fn with_endpoint_rejects_non_http_scheme() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    let err = cfg.with_endpoint("ftp://example.test/graphql").unwrap_err();
    assert!(err.to_string().contains("unsupported scheme 'ftp'"));
}

#[test]
fn builder_overrides_apply() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[]))
        .unwrap()
        .with_endpoint("http://127.0.0.1:9000/graphql/")
        .unwrap()
        .with_auth_email("qa@example.com")
        .with_request_timeout(5);

    assert_eq!(cfg.endpoint, "http://127.0.0.1:9000/graphql");
    assert_eq!(cfg.auth_email.as_deref(), Some("qa@example.com"));
    assert_eq!(cfg.timeouts.request_secs, 5);
    assert_eq!(cfg.timeouts.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
}
