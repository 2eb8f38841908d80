use super::*;
use crate::types::StoreQuery;

fn test_client(base_url: &str) -> StoreMapClient {
    StoreMapClient::with_base_url(base_url, 30, RetryPolicy::default())
        .expect("client construction should not fail")
}

#[test]
fn endpoint_appends_api_prefix() {
    let client = test_client("http://localhost:5000");
    let url = client.endpoint("districts", &[]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:5000/api/districts");
}

#[test]
fn endpoint_keeps_base_path_and_strips_trailing_slash() {
    let client = test_client("https://maps.example.com/locator/");
    let url = client.endpoint("stats", &[]).unwrap();
    assert_eq!(url.as_str(), "https://maps.example.com/locator/api/stats");
}

#[test]
fn endpoint_encodes_query_values() {
    let client = test_client("http://localhost:5000");
    let url = client
        .endpoint("stores", &[("name", "Cửa hàng & Co")])
        .unwrap();
    assert!(
        url.as_str().contains("name=C%E1%BB%ADa+h%C3%A0ng+%26+Co"),
        "query value should be percent-encoded: {url}"
    );
}

#[test]
fn store_query_omits_empty_filters() {
    let client = test_client("http://localhost:5000");
    let empty = StoreQuery::default();
    let url = client.endpoint("stores", &empty.params()).unwrap();
    assert_eq!(url.as_str(), "http://localhost:5000/api/stores");

    let district_only = StoreQuery::new("  ", "Ba Dinh");
    let url = client.endpoint("stores", &district_only.params()).unwrap();
    assert_eq!(url.query(), Some("district=Ba+Dinh"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = StoreMapClient::with_base_url("not a url", 30, RetryPolicy::default()).unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}

#[test]
fn zero_attempts_is_clamped_to_one() {
    let client = StoreMapClient::with_base_url(
        "http://localhost:5000",
        30,
        RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        },
    )
    .unwrap();
    assert_eq!(client.retry.max_attempts, 1);
}

#[test]
fn check_api_error_reads_error_field() {
    let body = serde_json::json!({ "error": "Store not found" });
    let err = StoreMapClient::check_api_error(&body).unwrap_err();
    assert_eq!(err.api_message(), Some("Store not found"));
}

#[test]
fn check_api_error_reads_success_false() {
    let body = serde_json::json!({ "success": false, "message": "Old password is incorrect" });
    let err = StoreMapClient::check_api_error(&body).unwrap_err();
    assert_eq!(err.to_string(), "Old password is incorrect");
}

#[test]
fn check_api_error_passes_lists_and_messages() {
    assert!(StoreMapClient::check_api_error(&serde_json::json!([])).is_ok());
    assert!(StoreMapClient::check_api_error(&serde_json::json!({ "message": "ok" })).is_ok());
    assert!(StoreMapClient::check_api_error(&serde_json::json!({ "success": true })).is_ok());
}
