//! Payment gateway contract and the simulated implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A charge request. Only carries the card-like token.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub credit_card_number: String,
}

impl PaymentRequest {
    pub fn new(credit_card_number: impl Into<String>) -> Self {
        Self {
            credit_card_number: credit_card_number.into(),
        }
    }
}

impl std::fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("credit_card_number", &"<redacted>")
            .finish()
    }
}

/// The gateway's verdict. `payment_id` is only expected when `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(alias = "IsValid", alias = "isvalid", alias = "is_valid")]
    pub is_valid: bool,
    #[serde(default, alias = "PaymentId", alias = "paymentid", alias = "payment_id")]
    pub payment_id: Option<String>,
}

impl PaymentResponse {
    pub fn approved(payment_id: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            payment_id: Some(payment_id.into()),
        }
    }

    pub fn rejected() -> Self {
        Self {
            is_valid: false,
            payment_id: None,
        }
    }
}

/// Failures talking to a payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Credit card number is required")]
    MissingCardNumber,

    #[error("Failed to communicate with payment gateway: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Payment gateway returned status {0}")]
    Status(u16),

    #[error("Failed to parse payment gateway response: {0}")]
    MalformedResponse(String),

    #[error("Payment gateway is unavailable")]
    Unavailable,
}

/// Authorizes a card-like token.
///
/// Implementations return `Err` for a blank token and for any failure to
/// obtain a verdict. A declined card is `Ok` with `is_valid == false`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process_payment(&self, request: &PaymentRequest)
    -> Result<PaymentResponse, PaymentError>;
}

#[derive(Debug, Default)]
struct SimulatedGatewayState {
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

/// In-process gateway with a card-number heuristic.
///
/// Accepts 13 to 19 digits once spaces and dashes are stripped, unless the
/// number starts with `0000`. Every accepted call gets a fresh UUID.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPaymentGateway {
    state: Arc<SimulatedGatewayState>,
}

impl SimulatedPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail as if the gateway were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of `process_payment` calls received.
    pub fn call_count(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    fn is_acceptable(card_number: &str) -> bool {
        let cleaned: String = card_number
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();

        (13..=19).contains(&cleaned.len())
            && cleaned.chars().all(|c| c.is_ascii_digit())
            && !cleaned.starts_with("0000")
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);

        if self.state.unavailable.load(Ordering::SeqCst) {
            return Err(PaymentError::Unavailable);
        }

        if request.credit_card_number.trim().is_empty() {
            return Err(PaymentError::MissingCardNumber);
        }

        if Self::is_acceptable(&request.credit_card_number) {
            Ok(PaymentResponse::approved(uuid::Uuid::new_v4().to_string()))
        } else {
            Ok(PaymentResponse::rejected())
        }
    }
}
