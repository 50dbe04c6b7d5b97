#![allow(dead_code)]

use std::sync::{Arc, Once};

use parasut_domain::{Credentials, ParasutConfig};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FIRM_ID: &str = "42";

/// Route test logs through `RUST_LOG` once per binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn config_for(server: &MockServer) -> ParasutConfig {
    ParasutConfig {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        redirect_uri: "urn:ietf:wg:oauth:2.0:oob".into(),
        email: "owner@example.com".into(),
        password: "s3cret".into(),
        base_url: Some(server.uri()),
        firm_id: FIRM_ID.into(),
    }
}

pub fn credentials_for(server: &MockServer) -> Arc<Credentials> {
    Arc::new(Credentials::from_config(config_for(server)).expect("test config is valid"))
}

pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "token_type": "bearer",
        "expires_in": 7200,
        "refresh_token": refresh,
        "created_at": 1_700_000_000
    })
}

/// `/v4/{firm}{suffix}`
pub fn api_path(suffix: &str) -> String {
    format!("/v4/{FIRM_ID}{suffix}")
}

/// Password grant answered with `access`/`refresh`, expected `times` times.
pub async fn mount_password_grant(server: &MockServer, access: &str, refresh: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({
            "grant_type": "password",
            "username": "owner@example.com",
            "password": "s3cret",
            "client_id": "client-id",
            "client_secret": "client-secret",
            "redirect_uri": "urn:ietf:wg:oauth:2.0:oob"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access, refresh)))
        .expect(times)
        .mount(server)
        .await;
}

/// Refresh grant for `refresh_token` answered with a new pair.
pub async fn mount_refresh_grant(
    server: &MockServer,
    refresh_token: &str,
    access: &str,
    refresh: &str,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
            "client_id": "client-id",
            "client_secret": "client-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access, refresh)))
        .expect(times)
        .mount(server)
        .await;
}
