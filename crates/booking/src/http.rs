//! Payment gateway backed by an external HTTP payment API.

use std::time::Duration;

use async_trait::async_trait;

use crate::payment::{PaymentError, PaymentGateway, PaymentRequest, PaymentResponse};

/// Calls `POST {base_url}/payments/` with `{"creditCardNumber": ...}` and
/// reads back `{"isValid": ..., "paymentId": ...}`.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPaymentGateway {
    /// Builds a gateway whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/payments/", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError> {
        if request.credit_card_number.trim().is_empty() {
            return Err(PaymentError::MissingCardNumber);
        }

        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "payment gateway returned an error status");
            return Err(PaymentError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        // A literal `null` body counts as a declined payment.
        let verdict: Option<PaymentResponse> = serde_json::from_str(&body)
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;
        Ok(verdict.unwrap_or_else(PaymentResponse::rejected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let with_slash = HttpPaymentGateway::with_client(reqwest::Client::new(), "http://pay.test/");
        let without = HttpPaymentGateway::with_client(reqwest::Client::new(), "http://pay.test");
        assert_eq!(with_slash.endpoint(), "http://pay.test/payments/");
        assert_eq!(without.endpoint(), with_slash.endpoint());
    }
}
