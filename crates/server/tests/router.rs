//! End-to-end router tests against an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

const API_KEY: &str = "pos-terminal-7";

async fn test_app() -> (Router, Arc<Engine>) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    migration::Migrator::up(&db, None).await.expect("migrations");
    let engine = Arc::new(
        Engine::builder()
            .database(db)
            .build()
            .await
            .expect("engine"),
    );

    let state = ServerState {
        engine: engine.clone(),
        api_key: API_KEY.into(),
    };
    (router(state), engine)
}

fn authed(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-api-key", API_KEY);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed_customer(engine: &Engine) -> String {
    engine
        .new_customer("Iris Vane", "iris@example.com", "555-0100", "email")
        .await
        .expect("seed customer")
        .id
}

#[tokio::test]
async fn requests_without_api_key_are_rejected() {
    let (app, _engine) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cards")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_with_wrong_api_key_are_rejected() {
    let (app, _engine) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cards")
                .header("x-api-key", "not-the-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn issue_reload_and_balance_round_trip() {
    let (app, engine) = test_app().await;
    let customer_id = seed_customer(&engine).await;

    let response = app
        .clone()
        .oneshot(authed(
            Method::POST,
            "/cards/issue",
            Some(json!({
                "card_id": null,
                "card_type": "closed_loop",
                "customer_id": customer_id,
                "issue_date": null,
                "initial_balance_minor": 500,
                "product": null,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let card = body_json(response).await;
    assert_eq!(card["id"], "CD001");
    assert_eq!(card["balance_minor"], 500);
    assert_eq!(card["status"], "active");

    let response = app
        .clone()
        .oneshot(authed(
            Method::POST,
            "/cards/CD001/reload",
            Some(json!({ "amount_minor": 1000 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = body_json(response).await;
    assert_eq!(receipt["previous_balance_minor"], 500);
    assert_eq!(receipt["new_balance_minor"], 1500);

    let response = app
        .oneshot(authed(Method::GET, "/cards/CD001/balance", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let balance = body_json(response).await;
    assert_eq!(balance["balance_minor"], 1500);
}

#[tokio::test]
async fn declined_payment_is_a_success_response() {
    let (app, engine) = test_app().await;
    let customer_id = seed_customer(&engine).await;
    engine
        .issue_card(
            Some("CD900"),
            engine::CardType::Bank,
            &customer_id,
            Utc::now(),
            engine::MoneyCents::new(100),
            None,
        )
        .await
        .expect("card");

    let response = app
        .oneshot(authed(
            Method::POST,
            "/payments/simulate",
            Some(json!({
                "card_id": "CD900",
                "amount_minor": 400,
                "method": "contactless",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    assert_eq!(result["result"], "declined");
    assert_eq!(result["current_balance_minor"], 100);
    assert_eq!(result["required_minor"], 400);
}

#[tokio::test]
async fn unknown_card_maps_to_not_found() {
    let (app, _engine) = test_app().await;

    let response = app
        .oneshot(authed(Method::GET, "/cards/CD999/balance", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_reload_maps_to_unprocessable() {
    let (app, engine) = test_app().await;
    let customer_id = seed_customer(&engine).await;
    engine
        .issue_card(
            None,
            engine::CardType::ClosedLoop,
            &customer_id,
            Utc::now(),
            engine::MoneyCents::new(0),
            None,
        )
        .await
        .expect("card");

    let response = app
        .oneshot(authed(
            Method::POST,
            "/cards/CD001/reload",
            Some(json!({ "amount_minor": -500 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn crm_sync_wraps_response_in_envelope() {
    let (app, engine) = test_app().await;
    let customer_id = seed_customer(&engine).await;
    engine
        .issue_card(
            None,
            engine::CardType::AccountBased,
            &customer_id,
            Utc::now(),
            engine::MoneyCents::new(0),
            None,
        )
        .await
        .expect("card");

    let response = app
        .oneshot(authed(
            Method::POST,
            "/crm/cards/sync",
            Some(json!({
                "card_id": "CD001",
                "action": "reload",
                "amount_minor": 750,
                "product": null,
                "robot_run_id": "run-42",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let envelope = body_json(response).await;
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["robot_run_id"], "run-42");
    assert!(envelope["transaction_id"].is_string());
    assert_eq!(envelope["data"]["balance_minor"], 750);
}

#[tokio::test]
async fn gate_tap_charges_and_returns_receipt() {
    let (app, engine) = test_app().await;
    let customer_id = seed_customer(&engine).await;
    engine
        .issue_card(
            None,
            engine::CardType::ClosedLoop,
            &customer_id,
            Utc::now(),
            engine::MoneyCents::new(300),
            None,
        )
        .await
        .expect("card");

    let response = app
        .clone()
        .oneshot(authed(
            Method::POST,
            "/taps/simulate",
            Some(json!({
                "card_id": "CD001",
                "location": "Central Station",
                "device_id": "GATE-01",
                "transit_mode": "metro",
                "direction": "entry",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = body_json(response).await;
    assert_eq!(receipt["remaining_balance_minor"], 50);
    assert_eq!(receipt["tap"]["outcome"], "success");

    let response = app
        .oneshot(authed(Method::GET, "/taps", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let taps = body_json(response).await;
    assert_eq!(taps.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn delete_customer_returns_no_content() {
    let (app, engine) = test_app().await;
    let customer_id = seed_customer(&engine).await;

    let response = app
        .clone()
        .oneshot(authed(
            Method::DELETE,
            &format!("/customers/{customer_id}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(authed(
            Method::GET,
            &format!("/customers/{customer_id}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
