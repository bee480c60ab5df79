#![cfg(feature = "server")]

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use reviewsense::{api, Database, Review, ReviewService, Sentiment};
use serde_json::{json, Value};

// Helper function to create a service backed by an in-memory database
async fn create_test_service() -> web::Data<ReviewService<Database>> {
    let db = Database::new(":memory:").unwrap();
    db.create_schema().await.unwrap();
    web::Data::new(ReviewService::new(db))
}

macro_rules! test_app {
    ($service:expr) => {
        test::init_service(App::new().app_data($service.clone()).configure(api::configure)).await
    };
}

#[actix_web::test]
async fn test_post_review_classifies_text() {
    let service = create_test_service().await;
    let app = test_app!(service);

    let cases = [
        ("я люблю этот продукт, хорош!", Sentiment::Positive),
        ("это плохо, я ненавижу", Sentiment::Negative),
        ("обычный день", Sentiment::Neutral),
    ];

    let mut last_id = 0;
    for (text, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/reviews")
            .set_json(json!({ "text": text }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let review: Review = test::read_body_json(resp).await;
        assert_eq!(review.text, text);
        assert_eq!(review.sentiment, expected);
        assert!(review.id > last_id);
        assert!(review.created_at.ends_with('Z'));
        last_id = review.id;
    }
}

#[actix_web::test]
async fn test_post_review_json_fields() {
    let service = create_test_service().await;
    let app = test_app!(service);

    let req = test::TestRequest::post()
        .uri("/reviews")
        .set_json(json!({ "text": "хорошо" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let object = body.as_object().unwrap();
    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["created_at", "id", "sentiment", "text"]);
    assert_eq!(body["sentiment"], "positive");
}

#[actix_web::test]
async fn test_post_review_requires_text() {
    let service = create_test_service().await;
    let app = test_app!(service);

    for payload in [
        json!({}),
        json!({ "text": "" }),
        json!({ "text": "   " }),
        json!({ "text": null }),
        json!({ "text": 42 }),
        json!(["text"]),
    ] {
        let req = test::TestRequest::post()
            .uri("/reviews")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Field 'text' is required" }));
    }

    assert!(service.list("").await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_post_review_malformed_body() {
    let service = create_test_service().await;
    let app = test_app!(service);

    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Field 'text' is required");
}

#[actix_web::test]
async fn test_get_reviews_filters_by_sentiment() {
    let service = create_test_service().await;
    let app = test_app!(service);

    let love = service.add("люблю").await.unwrap();
    let hate = service.add("ненавижу").await.unwrap();
    let good = service.add("хорошо").await.unwrap();

    let req = test::TestRequest::get().uri("/reviews").to_request();
    let all: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all, vec![love.clone(), hate.clone(), good.clone()]);

    let req = test::TestRequest::get().uri("/reviews?sentiment=").to_request();
    let empty_filter: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(empty_filter, all);

    let req = test::TestRequest::get()
        .uri("/reviews?sentiment=positive")
        .to_request();
    let positive: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(positive, vec![love, good]);

    let req = test::TestRequest::get()
        .uri("/reviews?sentiment=negative")
        .to_request();
    let negative: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(negative, vec![hate]);

    let req = test::TestRequest::get()
        .uri("/reviews?sentiment=unknown")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let unknown: Vec<Review> = test::read_body_json(resp).await;
    assert!(unknown.is_empty());
}

#[actix_web::test]
async fn test_health() {
    let service = create_test_service().await;
    let app = test_app!(service);
    service.add("день").await.unwrap();

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "ok", "reviews": 1 }));
}

#[actix_web::test]
async fn test_storage_failure_is_server_error() {
    // No schema, so every query fails
    let db = Database::new(":memory:").unwrap();
    let service = web::Data::new(ReviewService::new(db));
    let app = test_app!(service);

    let req = test::TestRequest::post()
        .uri("/reviews")
        .set_json(json!({ "text": "люблю" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let req = test::TestRequest::get().uri("/reviews").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
