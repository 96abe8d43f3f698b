//! HTTP-level tests for `CloudflareClient` against a wiremock server.

use serde_json::json;
use tf_cloudflare_api::{
    ApiError, ClientOptions, CloudflareApi, CloudflareClient, Credentials, ZoneCacheVariantsValues,
};
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONE: &str = "023e105f4ecef8ad9ca31a8372d0c353";

fn envelope(result: serde_json::Value) -> serde_json::Value {
    json!({ "success": true, "errors": [], "messages": [], "result": result })
}

fn failure(code: i64, message: &str) -> serde_json::Value {
    json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null
    })
}

fn token_client(server: &MockServer) -> CloudflareClient {
    CloudflareClient::with_options(
        Credentials::ApiToken {
            api_token: "test-token".to_string(),
        },
        ClientOptions {
            base_url: server.uri(),
            max_retries: 1,
            ..ClientOptions::default()
        },
    )
    .expect("client should build")
}

#[tokio::test]
async fn list_waf_packages_walks_every_page() {
    let server = MockServer::start().await;
    let packages_path = format!("/zones/{ZONE}/firewall/waf/packages");

    Mock::given(method("GET"))
        .and(path(packages_path.as_str()))
        .and(query_param("page", "1"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": [{ "id": "p1", "name": "OWASP ModSecurity Core Rule Set" }],
            "result_info": { "page": 1, "per_page": 100, "total_pages": 2, "count": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(packages_path.as_str()))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": [{ "id": "p2", "name": "CloudFlare" }],
            "result_info": { "page": 2, "per_page": 100, "total_pages": 2, "count": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let packages = token_client(&server)
        .list_waf_packages(ZONE)
        .await
        .expect("list should succeed");

    let ids: Vec<_> = packages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p2"]);
}

#[tokio::test]
async fn list_waf_groups_fills_package_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE}/firewall/waf/packages/p1/groups")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": [
                { "id": "g1", "name": "bot-detect", "mode": "on", "rules_count": 12 },
                { "id": "g2", "name": "sql-inject", "mode": "off", "package_id": "p1" }
            ],
            "result_info": { "page": 1, "per_page": 100, "total_pages": 1 }
        })))
        .mount(&server)
        .await;

    let groups = token_client(&server)
        .list_waf_groups(ZONE, "p1")
        .await
        .expect("list should succeed");

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.package_id == "p1"));
    assert_eq!(groups[0].rules_count, 12);
}

#[tokio::test]
async fn missing_cache_variants_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE}/cache/variants")))
        .respond_with(ResponseTemplate::new(404).set_body_json(failure(1142, "Unable to retrieve")))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .zone_cache_variants(ZONE)
        .await
        .expect_err("should fail");

    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn update_cache_variants_sends_only_set_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("/zones/{ZONE}/cache/variants")))
        .and(body_json(json!({ "value": { "webp": ["image/webp", "image/jpeg"] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "variants",
            "editable": true,
            "modified_on": "2023-03-01T10:00:00Z",
            "value": { "webp": ["image/webp", "image/jpeg"] }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let values = ZoneCacheVariantsValues {
        webp: Some(vec!["image/webp".to_string(), "image/jpeg".to_string()]),
        ..Default::default()
    };
    let variants = token_client(&server)
        .update_zone_cache_variants(ZONE, &values)
        .await
        .expect("update should succeed");

    assert_eq!(variants.value, values);
}

#[tokio::test]
async fn api_key_credentials_send_auth_headers() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/zones/{ZONE}/cache/variants")))
        .and(header("X-Auth-Email", "ops@example.com"))
        .and(header("X-Auth-Key", "global-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "variants",
            "modified_on": "2023-03-01T10:00:00Z"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = CloudflareClient::with_options(
        Credentials::ApiKey {
            email: "ops@example.com".to_string(),
            api_key: "global-key".to_string(),
        },
        ClientOptions {
            base_url: server.uri(),
            ..ClientOptions::default()
        },
    )
    .expect("client should build");

    client
        .delete_zone_cache_variants(ZONE)
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/acc/pages/projects/site/domains/example.com"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/accounts/acc/pages/projects/site/domains/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "d1",
            "name": "example.com",
            "status": "active"
        }))))
        .mount(&server)
        .await;

    let domain = token_client(&server)
        .pages_domain("acc", "site", "example.com")
        .await
        .expect("second attempt should succeed");

    assert_eq!(domain.status, "active");
}

#[tokio::test]
async fn add_pages_domain_posts_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/acc/pages/projects/site/domains"))
        .and(body_json(json!({ "name": "example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "d1",
            "name": "example.com",
            "status": "initializing"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let domain = token_client(&server)
        .add_pages_domain("acc", "site", "example.com")
        .await
        .expect("add should succeed");

    assert_eq!(domain.name, "example.com");
    assert_eq!(domain.status, "initializing");
}

#[tokio::test]
async fn rejected_token_verifies_false() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/tokens/verify"))
        .respond_with(ResponseTemplate::new(401).set_body_json(failure(1000, "Invalid API Token")))
        .mount(&server)
        .await;

    let valid = token_client(&server)
        .verify_token()
        .await
        .expect("verification should not error");

    assert!(!valid);
}

#[tokio::test]
async fn server_error_surfaces_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE}/cache/variants")))
        .respond_with(ResponseTemplate::new(500).set_body_json(failure(10001, "internal")))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .zone_cache_variants(ZONE)
        .await
        .expect_err("should fail");

    assert!(
        matches!(err, ApiError::Unknown { status: 500, .. }),
        "unexpected error: {err:?}"
    );
}
