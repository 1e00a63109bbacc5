//! Tests for the auth module

use super::*;

#[test]
fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[test]
fn test_bearer_token() {
    let auth = Authenticator::bearer("my-token");
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://api-ssl.bitly.com/v4/groups"));

    let built = req.build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-token"
    );
}

#[test]
fn test_debug_redacts_token() {
    let auth = Authenticator::bearer("secret-token");
    let debug = format!("{auth:?}");
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("<redacted>"));
}
