//! Circuit breaker behaviour observed through the running service.

use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;

use account_lookup::config::ResilienceConfig;

mod common;

use common::*;

fn tight_breaker() -> ResilienceConfig {
    ResilienceConfig {
        window_size: 4,
        minimum_calls: 2,
        failure_rate_threshold: 50.0,
        open_duration_ms: 60_000,
        half_open_trial_calls: 1,
        call_timeout_ms: 2_000,
    }
}

async fn breakers(service: &TestService) -> Value {
    client()
        .get(service.url("/admin/circuit-breakers"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_open_breaker_stops_calling_primary() {
    let bank_one = start_failing_provider(BANK_ONE_PATH, 503).await;
    let bank_two = start_bank(BANK_TWO_PATH, "BANK TWO", "2222222222").await;
    let config = with_resilience(service_config(&bank_one, &bank_two), tight_breaker());
    let service = start_service(config).await;
    let client = client();

    for _ in 0..5 {
        let res = client
            .get(service.lookup_url(IBAN, COUNTRY, CURRENCY))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["bankName"], "BANK TWO");
    }

    assert_eq!(bank_one.calls(), 2, "primary should only see calls until the breaker opens");
    assert_eq!(bank_two.calls(), 5);

    let snapshot = breakers(&service).await;
    assert_eq!(snapshot[0]["name"], "lookupAccount");
    assert_eq!(snapshot[0]["state"], "open");
}

#[tokio::test]
async fn test_not_found_does_not_open_breaker() {
    let bank_one = start_failing_provider(BANK_ONE_PATH, 404).await;
    let bank_two = start_bank(BANK_TWO_PATH, "BANK TWO", "2222222222").await;
    let config = with_resilience(service_config(&bank_one, &bank_two), tight_breaker());
    let service = start_service(config).await;
    let client = client();

    for _ in 0..6 {
        let res = client
            .get(service.lookup_url(IBAN, COUNTRY, CURRENCY))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    assert_eq!(bank_one.calls(), 6);
    assert_eq!(bank_two.calls(), 0);
    assert_eq!(breakers(&service).await[0]["state"], "closed");
}

#[tokio::test]
async fn test_primary_timeout_fails_over() {
    let bank_one = start_programmable_provider(BANK_ONE_PATH, |_, _| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, bank_body("BANK ONE", IBAN, "1111111111"))
    })
    .await;
    let bank_two = start_bank(BANK_TWO_PATH, "BANK TWO", "2222222222").await;
    let config = with_resilience(
        service_config(&bank_one, &bank_two),
        ResilienceConfig {
            call_timeout_ms: 200,
            ..tight_breaker()
        },
    );
    let service = start_service(config).await;

    let res = client()
        .get(service.lookup_url(IBAN, COUNTRY, CURRENCY))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["bankName"], "BANK TWO");
    assert_eq!(breakers(&service).await[0]["failed_calls"], 1);
}

#[tokio::test]
async fn test_admin_reset_closes_breaker() {
    let bank_one = start_failing_provider(BANK_ONE_PATH, 503).await;
    let bank_two = start_bank(BANK_TWO_PATH, "BANK TWO", "2222222222").await;
    let config = with_resilience(service_config(&bank_one, &bank_two), tight_breaker());
    let service = start_service(config).await;
    let client = client();

    for _ in 0..3 {
        client
            .get(service.lookup_url(IBAN, COUNTRY, CURRENCY))
            .send()
            .await
            .unwrap();
    }
    assert_eq!(bank_one.calls(), 2);

    let res = client
        .post(service.url("/admin/circuit-breakers/lookupAccount/reset"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(service.url("/admin/circuit-breakers/unknownOperation/reset"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(service.url("/admin/circuit-breakers/lookupAccount/reset"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["state"], "closed");
    assert_eq!(body["buffered_calls"], 0);

    client
        .get(service.lookup_url(IBAN, COUNTRY, CURRENCY))
        .send()
        .await
        .unwrap();
    assert_eq!(bank_one.calls(), 3, "primary is tried again after reset");
}
