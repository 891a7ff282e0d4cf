//! HTTP payment gateway tests against an in-process payment API.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use booking::{
    BookingService, CreateBookingRequest, HttpPaymentGateway, PaymentError, PaymentGateway,
    PaymentRequest, PaymentResponse,
};
use chrono::Utc;
use domain::{Event, Money, SeatingPolicy, User, Venue};
use serde_json::{Value, json};
use storage::Repositories;

/// Approves cards ending in an even digit.
async fn payments(Json(body): Json<Value>) -> Json<Value> {
    let card = body["creditCardNumber"].as_str().unwrap_or_default();
    let even = card
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .is_some_and(|d| d % 2 == 0);

    if even {
        Json(json!({ "isValid": true, "paymentId": format!("EXT-{card}") }))
    } else {
        Json(json!({ "isValid": false, "paymentId": null }))
    }
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn gateway(base_url: &str) -> HttpPaymentGateway {
    HttpPaymentGateway::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn approves_and_declines_through_the_api() {
    let base = spawn_server(Router::new().route("/payments/", post(payments))).await;
    let gateway = gateway(&base);

    let approved = gateway
        .process_payment(&PaymentRequest::new("4111111111111112"))
        .await
        .unwrap();
    assert_eq!(approved, PaymentResponse::approved("EXT-4111111111111112"));

    let declined = gateway
        .process_payment(&PaymentRequest::new("4111111111111111"))
        .await
        .unwrap();
    assert_eq!(declined, PaymentResponse::rejected());
}

#[tokio::test]
async fn blank_card_is_refused_before_any_request() {
    let gateway = gateway("http://127.0.0.1:9");
    let result = gateway.process_payment(&PaymentRequest::new("")).await;
    assert!(matches!(result, Err(PaymentError::MissingCardNumber)));
}

#[tokio::test]
async fn error_status_is_reported() {
    let router = Router::new().route(
        "/payments/",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let base = spawn_server(router).await;

    let result = gateway(&base)
        .process_payment(&PaymentRequest::new("4111111111111112"))
        .await;
    assert!(matches!(result, Err(PaymentError::Status(503))));
}

#[tokio::test]
async fn unparsable_body_is_reported() {
    let router = Router::new().route("/payments/", post(|| async { "approved!" }));
    let base = spawn_server(router).await;

    let result = gateway(&base)
        .process_payment(&PaymentRequest::new("4111111111111112"))
        .await;
    assert!(matches!(result, Err(PaymentError::MalformedResponse(_))));
}

#[tokio::test]
async fn slow_gateway_times_out() {
    let router = Router::new().route(
        "/payments/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "isValid": true, "paymentId": "late" }))
        }),
    );
    let base = spawn_server(router).await;
    let gateway = HttpPaymentGateway::new(&base, Duration::from_millis(100)).unwrap();

    let result = gateway
        .process_payment(&PaymentRequest::new("4111111111111112"))
        .await;
    assert!(matches!(result, Err(PaymentError::Transport(_))));
}

#[tokio::test]
async fn unreachable_gateway_fails_the_booking_without_persisting() {
    let repos = Repositories::in_memory();
    let user = repos
        .users
        .add(User::new("Jane", "Smith", "jane.smith@example.com"))
        .await
        .unwrap();
    let venue = repos
        .venues
        .add(Venue::new("Jazz Club Downtown", "789 Blues Road, Chicago", 300).unwrap())
        .await
        .unwrap();
    let event = repos
        .events
        .add(Event::new(
            "Jazz Night",
            venue,
            Utc::now() + chrono::Duration::days(3),
            "Concert",
            SeatingPolicy::Open,
        ))
        .await
        .unwrap();

    // Nothing listens on the discard port.
    let gateway = HttpPaymentGateway::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let service = BookingService::new(repos.clone(), Arc::new(gateway));

    let result = service
        .create_booking(CreateBookingRequest::new(
            user,
            event,
            2,
            "4111111111111112",
            Money::from_units(40),
        ))
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.message.starts_with("Payment processing failed: "));
    assert!(repos.bookings.get_all().await.unwrap().is_empty());
}
