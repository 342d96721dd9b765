//! Integration tests for the Discord webhook publisher

use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use qotd_engine::calendar::RunDate;
use qotd_engine::notify::{Delivery, DiscordWebhook, PublishError, Publisher};
use qotd_engine::secrets::SecretString;

const HOOK_PATH: &str = "/api/webhooks/1234/s3cr3t-token";

fn run_date() -> RunDate {
    RunDate::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
}

fn webhook_for(server: &MockServer) -> DiscordWebhook {
    DiscordWebhook::new(
        Some(SecretString::new(format!("{}{}", server.uri(), HOOK_PATH))),
        0x3498db,
        "Reply in this thread to join the conversation!".to_string(),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_publish_posts_embed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .and(body_partial_json(json!({
            "embeds": [{
                "title": "❓ ?OTD — October 18, 2026",
                "description": "### What's the best pie?",
                "color": 3447003,
                "footer": {"text": "Reply in this thread to join the conversation!"}
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let delivery = webhook_for(&server)
        .publish("What's the best pie?", &run_date())
        .await
        .unwrap();

    assert_eq!(delivery, Delivery::Delivered);
}

#[tokio::test]
async fn test_rejected_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Unknown Webhook",
            "code": 10015
        })))
        .mount(&server)
        .await;

    let err = webhook_for(&server)
        .publish("Q?", &run_date())
        .await
        .unwrap_err();

    match err {
        PublishError::Rejected { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Unknown Webhook"));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_network_error_without_token() {
    // Nothing listens on port 1
    let webhook = DiscordWebhook::new(
        Some(SecretString::new(format!("http://127.0.0.1:1{}", HOOK_PATH))),
        0x3498db,
        String::new(),
        Duration::from_secs(2),
    );

    let err = webhook.publish("Q?", &run_date()).await.unwrap_err();

    assert!(matches!(err, PublishError::Network(_)));
    assert!(!err.to_string().contains("s3cr3t-token"));
}

#[tokio::test]
async fn test_no_webhook_skips_without_network() {
    let webhook = DiscordWebhook::new(None, 0x3498db, String::new(), Duration::from_secs(1));

    let delivery = webhook.publish("Q?", &run_date()).await.unwrap();
    assert_eq!(delivery, Delivery::Skipped);
}

#[tokio::test]
async fn test_slow_channel_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let webhook = DiscordWebhook::new(
        Some(SecretString::new(format!("{}{}", server.uri(), HOOK_PATH))),
        0x3498db,
        String::new(),
        Duration::from_millis(200),
    );

    let started = std::time::Instant::now();
    let err = webhook.publish("Q?", &run_date()).await.unwrap_err();

    assert!(matches!(err, PublishError::Network(_)));
    assert!(started.elapsed() < Duration::from_secs(4));
}
