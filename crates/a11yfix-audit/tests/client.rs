//! Integration tests for `AuditClient` using wiremock HTTP mocks.

use a11yfix_audit::{normalize_suggestions, AuditClient, Auth};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_client(base_url: &str) -> AuditClient {
    AuditClient::new(
        base_url,
        "org-id@AdobeOrg",
        Auth::Session("session-token".to_string()),
        30,
    )
    .expect("client construction should not fail")
}

#[tokio::test]
async fn list_sites_sends_org_and_bearer_headers() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "id": "site-1", "baseURL": "https://www.sunstargum.com" },
        { "id": "site-2", "baseURL": "https://krisshop.com" }
    ]);

    Mock::given(method("GET"))
        .and(path("/sites"))
        .and(header("x-gw-ims-org-id", "org-id@AdobeOrg"))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = session_client(&server.uri());
    let sites = client.list_sites().await.expect("should parse sites");

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id, "site-1");
    assert_eq!(sites[0].base_url, "https://www.sunstargum.com");
}

#[tokio::test]
async fn legacy_api_key_uses_the_x_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites"))
        .and(header("x-api-key", "legacy-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = AuditClient::new(
        &server.uri(),
        "org-id@AdobeOrg",
        Auth::ApiKey("legacy-key".to_string()),
        30,
    )
    .expect("client construction should not fail");

    let sites = client.list_sites().await.expect("should parse sites");
    assert!(sites.is_empty());
}

#[tokio::test]
async fn list_opportunities_hits_the_nested_path() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "id": "opp-1", "type": "a11y-accessibility" },
        { "id": "opp-2", "type": "broken-backlinks" },
        { "id": "opp-3" }
    ]);

    Mock::given(method("GET"))
        .and(path("/sites/site-1/opportunities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = session_client(&server.uri());
    let opportunities = client
        .list_opportunities("site-1")
        .await
        .expect("should parse opportunities");

    assert_eq!(opportunities.len(), 3);
    assert_eq!(opportunities[0].kind, "a11y-accessibility");
    // `type` may be missing on legacy records.
    assert_eq!(opportunities[2].kind, "");
}

#[tokio::test]
async fn list_suggestions_parses_heterogeneous_records() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "id": "sug-1",
            "type": "CODE_CHANGE",
            "status": "NEW",
            "data": {
                "aggregationKey": "https://x.com|alt-text|img.hero",
                "url": "https://x.com"
            }
        },
        { "id": "sug-2" },
        { "id": "sug-3", "data": { "somethingElse": true } }
    ]);

    Mock::given(method("GET"))
        .and(path("/sites/site-1/opportunities/opp-1/suggestions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = session_client(&server.uri());
    let raw = client
        .list_suggestions("site-1", "opp-1")
        .await
        .expect("should parse suggestions");
    assert_eq!(raw.len(), 3);

    // Only the record with an aggregation key survives normalization.
    let issues = normalize_suggestions(&raw);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].id, "sug-1");
    assert_eq!(issues[0].issue_type, "alt-text");
}

#[tokio::test]
async fn non_2xx_status_surfaces_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = session_client(&server.uri());
    let result = client.list_sites().await;
    assert!(matches!(result, Err(a11yfix_audit::AuditError::Http(_))));
}

#[tokio::test]
async fn malformed_body_surfaces_as_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not-json"))
        .mount(&server)
        .await;

    let client = session_client(&server.uri());
    let result = client.list_sites().await;
    assert!(matches!(
        result,
        Err(a11yfix_audit::AuditError::Deserialize { .. })
    ));
}
