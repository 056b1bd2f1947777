use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, body_json, header, method, path},
};

use crate::helpers::{API_KEY, PUBLICATION_ID, json_body, spawn_app, spawn_app_with_secrets};
use notify_relay::secrets::StaticSecrets;

fn subscriptions_path() -> String {
    format!("/v2/publications/{PUBLICATION_ID}/subscriptions")
}

#[tokio::test]
async fn subscribe_returns_status_for_a_created_subscription() {
    let app = spawn_app().await;

    Mock::given(path(subscriptions_path()))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let response = app.post_subscribe(r#"{"email":"a@b.com"}"#).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "status": "Subscription successful" })
    );
}

#[tokio::test]
async fn subscribe_accepts_200_from_beehiiv() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let response = app.post_subscribe(r#"{"email":"a@b.com"}"#).await;

    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "status": "Subscription successful" })
    );
}

#[tokio::test]
async fn subscribe_sends_only_the_email_without_attribution() {
    let app = spawn_app().await;

    Mock::given(path(subscriptions_path()))
        .and(body_json(serde_json::json!({ "email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(3)
        .mount(&app.beehiiv_server)
        .await;

    let test_cases = vec![
        r#"{"email":"a@b.com"}"#,
        r#"{"email":"a@b.com","utm_source":"","utm_medium":"","referring_site":""}"#,
        r#"{"email":"a@b.com","utm_source":null}"#,
    ];

    for body in test_cases {
        let response = app.post_subscribe(body).await;
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "status": "Subscription successful" }),
            "Unexpected body when the payload was {body}."
        );
    }
}

#[tokio::test]
async fn subscribe_forwards_all_attribution_fields() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "email": "a@b.com",
        "utm_source": "twitter",
        "utm_medium": "social",
        "referring_site": "https://example.com/blog"
    });

    Mock::given(path(subscriptions_path()))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let response = app.post_subscribe(payload.to_string()).await;

    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "status": "Subscription successful" })
    );
}

#[tokio::test]
async fn subscribe_matches_keys_regardless_of_case() {
    let app = spawn_app().await;

    Mock::given(path(subscriptions_path()))
        .and(body_json(serde_json::json!({
            "email": "a@b.com",
            "utm_source": "twitter"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let response = app
        .post_subscribe(r#"{"Email":"a@b.com","UTM_Source":"twitter"}"#)
        .await;

    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "status": "Subscription successful" })
    );
}

#[tokio::test]
async fn subscribe_rejects_an_empty_email_without_calling_beehiiv() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.beehiiv_server)
        .await;

    let test_cases = vec![
        (r#"{"email":""}"#, "an empty email"),
        (r#"{"utm_source":"twitter"}"#, "a missing email"),
        (r#"{"email":null}"#, "a null email"),
        ("null", "a null body"),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscribe(body).await;

        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Email cannot be empty" }),
            "Unexpected body when the payload was {description}."
        );
    }
}

#[tokio::test]
async fn subscribe_reports_an_invalid_body() {
    let app = spawn_app().await;

    let response = app.post_subscribe("email=a%40b.com").await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "Invalid request body" })
    );
}

#[tokio::test]
async fn subscribe_reports_a_beehiiv_failure() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&app.beehiiv_server)
        .await;

    let response = app.post_subscribe(r#"{"email":"a@b.com"}"#).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "unexpected status code: 400" })
    );
}

#[tokio::test]
async fn subscribe_reports_a_missing_api_key_and_keeps_serving() {
    let secrets = StaticSecrets::default().with("BEEHIIV_PUBLICATION_ID", PUBLICATION_ID);
    let app = spawn_app_with_secrets(secrets).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.beehiiv_server)
        .await;

    let response = app.post_subscribe(r#"{"email":"a@b.com"}"#).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "BEEHIIV_API_KEY environment variable is not set" })
    );

    let response = app.request(reqwest::Method::GET, "/health_check").await;
    assert!(response.status().is_success());
}

#[tokio::test]
async fn subscribe_reports_a_missing_publication_id() {
    let secrets = StaticSecrets::default().with("BEEHIIV_API_KEY", API_KEY);
    let app = spawn_app_with_secrets(secrets).await;

    let response = app.post_subscribe(r#"{"email":"a@b.com"}"#).await;

    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "BEEHIIV_PUBLICATION_ID environment variable is not set" })
    );
}

#[tokio::test]
async fn subscribe_validates_before_reading_secrets() {
    let app = spawn_app_with_secrets(StaticSecrets::default()).await;

    let response = app.post_subscribe(r#"{"email":""}"#).await;

    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "Email cannot be empty" })
    );
}

#[tokio::test]
async fn subscribe_rejects_other_methods() {
    let app = spawn_app().await;

    for method in [reqwest::Method::GET, reqwest::Method::PATCH] {
        let response = app.request(method.clone(), "/subscribe").await;

        assert_eq!(405, response.status().as_u16());
        assert_eq!(response.text().await.unwrap(), "Method not allowed");
    }
}
