//! End-to-end tests for the authenticated request path
//!
//! Token endpoint and resource endpoints are both served by wiremock; the
//! client under test is the real `Parasut` facade.

mod support;

use std::sync::Arc;
use std::time::Duration;

use parasut_common::auth::OAuthClient;
use parasut_common::testing::MockClock;
use parasut_infra::{ApiAuthService, ListParams, Parasut};
use serde_json::json;
use support::{
    api_path, config_for, credentials_for, init_tracing, mount_password_grant, mount_refresh_grant,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fresh client, one call: one password grant, then the list request with the
/// serialized query, and the body handed back untouched.
#[tokio::test]
async fn test_sales_invoices_walkthrough() {
    init_tracing();
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;

    let body = json!({
        "data": [{"id": "1", "type": "sales_invoices", "attributes": {"net_total": "100.0"}}],
        "meta": {"current_page": 1, "total_pages": 1}
    });
    Mock::given(method("GET"))
        .and(path(api_path("/sales_invoices")))
        .and(query_param("filter[invoice_status]", "paid"))
        .and(query_param("sort", "-issue_date"))
        .and(query_param("page[number]", "1"))
        .and(query_param("page[size]", "25"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();
    let params =
        ListParams::new().filter("invoice_status", "paid").sort("-issue_date").page(1, 25);

    assert_eq!(client.sales().get_sales_invoices(&params).await, body);
}

/// A fresh token is reused across calls.
#[tokio::test]
async fn test_token_reused_across_calls() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("/products")))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(3)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();
    for _ in 0..3 {
        client.stock().get_products(&ListParams::new()).await;
    }
}

/// Past the safety margin the next call refreshes before hitting the API.
#[tokio::test]
async fn test_stale_token_refreshed_before_call() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    mount_refresh_grant(&server, "R1", "A2", "R2", 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("/accounts")))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["first"]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/accounts")))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["second"]})))
        .expect(1)
        .mount(&server)
        .await;

    let clock = MockClock::at_epoch(1_000_000);
    let auth = ApiAuthService::with_endpoint(
        credentials_for(&server),
        OAuthClient::new().unwrap(),
        clock.clone(),
    );
    let client = Parasut::builder(config_for(&server)).auth(Arc::new(auth)).build().unwrap();

    assert_eq!(client.cash().get_bank_accounts(&ListParams::new()).await["data"][0], "first");
    clock.advance(Duration::from_secs(7_001));
    assert_eq!(client.cash().get_bank_accounts(&ListParams::new()).await["data"][0], "second");
}

/// A failing refresh grant falls back to a new password grant.
#[tokio::test]
async fn test_refresh_failure_reauthenticates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({"grant_type": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::token_body("A1", "R1")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({"grant_type": "refresh_token"})))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    mount_password_grant(&server, "A3", "R3", 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("/trackable_jobs/job-1")))
        .and(header("authorization", "Bearer A3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "job-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let clock = MockClock::at_epoch(0);
    let auth = ApiAuthService::with_endpoint(
        credentials_for(&server),
        OAuthClient::new().unwrap(),
        clock.clone(),
    );
    auth.token_manager().get_valid_token().await;
    clock.advance(Duration::from_secs(10_000));

    let client = Parasut::builder(config_for(&server)).auth(Arc::new(auth)).build().unwrap();
    let job = client.trackable_jobs().show_trackable_job("job-1").await;
    assert_eq!(job["data"]["id"], "job-1");
}

/// Rejected credentials: the request is never sent.
#[tokio::test]
async fn test_no_token_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "The provided authorization grant is invalid"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/contacts/1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();
    assert_eq!(
        client.sales().show_contact("1").await,
        json!({"errors": [{"title": "Access token not found", "detail": "Access token not found"}]})
    );
}

/// The API keeps answering 401: four attempts, then `Max depth reached`.
#[tokio::test]
async fn test_unauthorized_loop_is_bounded() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({"grant_type": "refresh_token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::token_body("A2", "R2")))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/purchase_bills")))
        .respond_with(ResponseTemplate::new(401))
        .expect(4)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();
    assert_eq!(
        client.expenses().get_purchase_bills(&ListParams::new()).await,
        json!({"errors": [{"title": "Max depth reached", "detail": "Max depth reached"}]})
    );
}

/// One 401, then success: two attempts with a refreshed token in between.
#[tokio::test]
async fn test_single_unauthorized_then_success() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    mount_refresh_grant(&server, "R1", "A2", "R2", 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("/e_archives/5/pdf")))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/e_archives/5/pdf")))
        .and(header("authorization", "Bearer A2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"attributes": {"url": "u"}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();
    let pdf = client.legalize().show_e_archive_pdf("5").await;
    assert_eq!(pdf["data"]["attributes"]["url"], "u");
}

/// A slow API yields `Request timed out` and no second attempt.
#[tokio::test]
async fn test_timeout_is_not_retried() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("/e_invoice_inboxes")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client =
        Parasut::builder(config_for(&server)).timeout(Duration::from_millis(200)).build().unwrap();

    assert_eq!(
        client.legalize().get_e_invoice_inboxes(&ListParams::new()).await,
        json!({"errors": [{"title": "Request timed out", "detail": "Request timed out"}]})
    );
}

/// DELETE answered with 204 becomes `{}`; with a body, the body.
#[tokio::test]
async fn test_delete_semantics() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/contacts/1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let cancelled = json!({"data": {"id": "2", "attributes": {"status": "cancelled"}}});
    Mock::given(method("DELETE"))
        .and(path(api_path("/sales_invoices/2/cancel")))
        .and(query_param("include", "contact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cancelled.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();
    assert_eq!(client.sales().delete_contact("1").await, json!({}));
    assert_eq!(client.sales().cancel_sales_invoice("2", Some("contact")).await, cancelled);
}

/// Writes carry the `data` document; update embeds the id.
#[tokio::test]
async fn test_create_and_update_bodies() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    Mock::given(method("POST"))
        .and(path(api_path("/contacts")))
        .and(body_partial_json(json!({
            "data": {"type": "contacts", "attributes": {"name": "Acme", "account_type": "customer"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "10"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/sales_invoices/10")))
        .and(body_partial_json(json!({
            "data": {
                "id": "10",
                "type": "sales_invoices",
                "attributes": {"description": "Updated"},
                "relationships": {"contact": {"data": {"id": "10", "type": "contacts"}}}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "10"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();

    let created = client
        .sales()
        .create_contact(&json!({"name": "Acme", "account_type": "customer"}), None)
        .await
        .unwrap();
    assert_eq!(created["data"]["id"], "10");

    let updated = client
        .sales()
        .update_sales_invoice(
            "10",
            &json!({"description": "Updated"}),
            Some(json!({"contact": {"data": {"id": "10", "type": "contacts"}}})),
        )
        .await
        .unwrap();
    assert_eq!(updated["data"]["id"], "10");
}

/// Remote validation errors come back verbatim.
#[tokio::test]
async fn test_remote_errors_pass_through() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    let remote = json!({"errors": [{"title": "Unprocessable", "detail": "Name can't be blank"}]});
    Mock::given(method("POST"))
        .and(path(api_path("/products")))
        .respond_with(ResponseTemplate::new(422).set_body_json(remote.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Parasut::new(config_for(&server)).unwrap();
    let result = client.stock().create_product(&json!({"name": ""}), None).await.unwrap();
    assert_eq!(result, remote);
}

/// Concurrent callers on a cold client trigger one password grant.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_token_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(support::token_body("A1", "R1"))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/sales_invoices/3")))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "3"}})))
        .expect(6)
        .mount(&server)
        .await;

    let client = Arc::new(Parasut::new(config_for(&server)).unwrap());
    let calls = (0..6).map(|_| {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.sales().show_sales_invoice("3", None).await })
    });

    for result in futures::future::join_all(calls).await {
        assert_eq!(result.unwrap()["data"]["id"], "3");
    }
}

/// PATCH actions reach their sub-paths.
#[tokio::test]
async fn test_invoice_state_transitions() {
    let server = MockServer::start().await;
    mount_password_grant(&server, "A1", "R1", 1).await;
    for action in ["archive", "unarchive", "recover"] {
        Mock::given(method("PATCH"))
            .and(path(api_path(&format!("/sales_invoices/8/{action}"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"action": action})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = Parasut::new(config_for(&server)).unwrap();
    let sales = client.sales();
    assert_eq!(sales.archive_sales_invoice("8").await["action"], "archive");
    assert_eq!(sales.unarchive_sales_invoice("8").await["action"], "unarchive");
    assert_eq!(sales.recover_sales_invoice("8").await["action"], "recover");
}
