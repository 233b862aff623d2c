//! PayMongo gateway client.
//!
//! Turns the five payment intents of the application (create intent, retrieve
//! intent, attach method, check status, create source) into authenticated,
//! idempotent, retried HTTP calls, and decodes every response into typed
//! records at the boundary.
//!
//! # Endpoints
//!
//! - `POST /payment_intents`
//! - `GET /payment_intents/{id}`
//! - `POST /payment_intents/{id}/attach`
//! - `POST /sources`
//!
//! The client holds no state between calls beyond its configuration, so one
//! instance is cloned into every request handler.

use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::PaymentError;
use crate::models::gateway::{ErrorBody, Metadata, RequestEnvelope};
use crate::models::money::to_minor_units;
use crate::models::payment_intent::{
    AttachPaymentMethodAttributes, CallerContext, CreatePaymentIntentAttributes, PaymentIntent,
    PaymentMethodOptions,
};
use crate::models::payment_source::{
    CreateSourceAttributes, PaymentSource, SourceOptions, SourceRedirect,
};
use crate::models::payment_status::PaymentStatusRecord;
use crate::services::idempotency::{build_headers, generate_idempotency_key, scope};
use crate::services::retry::RetryPolicy;
use crate::services::validation::{
    AmountRules, require_id, validate_currency, validate_gateway_id, validate_method_types,
};

/// The client could not be constructed from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ClientSetupError {
    #[error("Invalid gateway base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("Gateway base URL cannot carry a path: {0}")]
    NotABase(String),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct PaymongoClient {
    http: reqwest::Client,
    base_url: Url,
    secret_key: Option<String>,
    return_url: String,
    success_url: Option<String>,
    failed_url: Option<String>,
    retry: RetryPolicy,
    amount_rules: AmountRules,
}

impl PaymongoClient {
    /// Build a client from configuration.
    ///
    /// No request timeout is set here; callers that need a deadline wrap the
    /// call in their own timeout.
    pub fn new(config: &Config) -> Result<Self, ClientSetupError> {
        let base_url = Url::parse(&config.paymongo_api_base)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientSetupError::NotABase(config.paymongo_api_base.clone()));
        }
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url,
            secret_key: config.paymongo_secret_key.clone(),
            return_url: config.payment_return_url.clone(),
            success_url: config.payment_success_url.clone(),
            failed_url: config.payment_failed_url.clone(),
            retry: RetryPolicy::from_config(config),
            amount_rules: AmountRules::default(),
        })
    }

    /// Replace the per-currency minimum amount table.
    pub fn with_amount_rules(mut self, rules: AmountRules) -> Self {
        self.amount_rules = rules;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Create a payment intent for `amount` major units.
    ///
    /// # Process
    ///
    /// 1. Validate amount, method types and currency
    /// 2. Generate one idempotency key for every attempt of this call
    /// 3. Convert the amount to minor units
    /// 4. Merge caller metadata with caller context, `created_at` and `client_reference`
    /// 5. POST under the retry policy
    pub async fn create_payment_intent(
        &self,
        amount: f64,
        currency: &str,
        payment_method_types: &[String],
        metadata: Metadata,
        caller: CallerContext,
    ) -> Result<PaymentIntent, PaymentError> {
        self.amount_rules.validate(amount, currency)?;
        validate_method_types(payment_method_types)?;
        let currency = validate_currency(currency)?;

        let idempotency_key = generate_idempotency_key(scope::PAYMENT_INTENT);

        let mut metadata = metadata;
        if let Some(user_id) = caller.user_id {
            metadata.insert("user_id".to_string(), user_id);
        }
        if let Some(ip_address) = caller.ip_address {
            metadata.insert("ip_address".to_string(), ip_address);
        }
        metadata.insert("created_at".to_string(), chrono::Utc::now().to_rfc3339());
        metadata.insert("client_reference".to_string(), idempotency_key.clone());

        let body = RequestEnvelope::new(CreatePaymentIntentAttributes {
            amount: to_minor_units(amount),
            currency: currency.to_string(),
            payment_method_allowed: payment_method_types.to_vec(),
            payment_method_options: PaymentMethodOptions::default(),
            metadata,
        });

        let url = self.endpoint(&["payment_intents"])?;
        let intent: PaymentIntent = self
            .send(Method::POST, url, Some(&body), Some(idempotency_key.as_str()))
            .await?;

        tracing::info!(
            intent_id = intent.data.as_ref().map(|d| d.id.as_str()),
            client_reference = %idempotency_key,
            "Payment intent created"
        );
        Ok(intent)
    }

    /// Fetch a payment intent. Reads carry no idempotency key.
    pub async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let id = validate_gateway_id(payment_intent_id, "Payment intent ID")?;
        let url = self.endpoint(&["payment_intents", id])?;

        self.send::<(), _>(Method::GET, url, None, None).await
    }

    /// Attach a payment method to an intent, using the configured return URL.
    pub async fn attach_payment_method(
        &self,
        payment_intent_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if payment_intent_id.trim().is_empty() || payment_method_id.trim().is_empty() {
            return Err(PaymentError::InvalidArgument(
                "Payment intent ID and payment method ID are required".to_string(),
            ));
        }
        let intent_id = validate_gateway_id(payment_intent_id, "Payment intent ID")?;
        let method_id = validate_gateway_id(payment_method_id, "Payment method ID")?;

        let idempotency_key = generate_idempotency_key(scope::ATTACH_METHOD);
        let body = RequestEnvelope::new(AttachPaymentMethodAttributes {
            payment_method: method_id.to_string(),
            return_url: self.return_url.clone(),
        });
        let url = self.endpoint(&["payment_intents", intent_id, "attach"])?;

        self.send(Method::POST, url, Some(&body), Some(idempotency_key.as_str()))
            .await
    }

    /// Retrieve an intent and project it into a normalized status record.
    ///
    /// # Errors
    ///
    /// `NotFound` when the retrieval succeeded but carried no intent.
    pub async fn check_payment_status(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentStatusRecord, PaymentError> {
        let intent = self.retrieve_payment_intent(payment_intent_id).await?;
        let resource = intent.data.ok_or(PaymentError::NotFound)?;

        Ok(PaymentStatusRecord::from(resource))
    }

    /// Create a redirect-based payment source (e-wallet checkout).
    ///
    /// Redirect URLs missing from `options` fall back to the configured defaults.
    pub async fn create_payment_source(
        &self,
        amount: f64,
        currency: &str,
        source_type: &str,
        options: SourceOptions,
    ) -> Result<PaymentSource, PaymentError> {
        self.amount_rules.validate(amount, currency)?;
        let currency = validate_currency(currency)?;
        let source_type = require_id(source_type, "Source type")?;

        let idempotency_key = generate_idempotency_key(scope::PAYMENT_SOURCE);
        let body = RequestEnvelope::new(CreateSourceAttributes {
            amount: to_minor_units(amount),
            currency: currency.to_string(),
            source_type: source_type.to_string(),
            redirect: SourceRedirect {
                checkout_url: None,
                success: options.redirect_success.or_else(|| self.success_url.clone()),
                failed: options.redirect_failed.or_else(|| self.failed_url.clone()),
            },
        });

        let url = self.endpoint(&["sources"])?;
        self.send(Method::POST, url, Some(&body), Some(idempotency_key.as_str()))
            .await
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PaymentError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::InvalidArgument("Gateway base URL cannot carry a path".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue one logical call under the retry policy and decode the response.
    async fn send<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        idempotency_key: Option<&str>,
    ) -> Result<T, PaymentError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let headers = build_headers(self.secret_key.as_deref(), idempotency_key)?;

        self.retry
            .run(
                || {
                    let mut request = self
                        .http
                        .request(method.clone(), url.clone())
                        .headers(headers.clone());
                    if let Some(body) = body {
                        request = request.json(body);
                    }
                    async move {
                        let response = request.send().await.map_err(PaymentError::from_transport)?;
                        decode(response).await
                    }
                },
                PaymentError::is_transient,
            )
            .await
    }
}

/// Map a gateway response to a typed record or a classified failure.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PaymentError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(PaymentError::from_transport)?;

    if status.is_success() {
        return serde_json::from_str(&text)
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()));
    }

    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let (code, detail) = body.first();
    let message = detail.unwrap_or_else(|| {
        format!(
            "Gateway responded with {}",
            status.canonical_reason().unwrap_or(status.as_str())
        )
    });

    if status.is_server_error() {
        Err(PaymentError::GatewayServer {
            status: Some(status.as_u16()),
            message,
        })
    } else {
        Err(PaymentError::GatewayClient {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn intent_body(id: &str, amount: i64, status: &str) -> String {
        json!({
            "data": {
                "id": id,
                "type": "payment_intent",
                "attributes": {
                    "amount": amount,
                    "currency": "PHP",
                    "status": status,
                    "payment_method_allowed": ["gcash"],
                    "metadata": {"user_id": "guest"},
                    "created_at": 1735689000,
                    "updated_at": 1735689600
                }
            }
        })
        .to_string()
    }

    fn client_for(server: &mockito::ServerGuard) -> PaymongoClient {
        PaymongoClient::new(&test_config(&server.url()))
            .unwrap()
            .with_retry_policy(RetryPolicy::new(3, Duration::ZERO))
    }

    #[tokio::test]
    async fn create_intent_sends_minor_units_with_auth_and_idempotency_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/payment_intents")
            .match_header("authorization", "Basic c2tfdGVzdF8xMjM6")
            .match_header("content-type", "application/json")
            .match_header(
                "idempotency-key",
                Matcher::Regex(r"^payment_intent_\d+_[0-9a-f]{16}$".to_string()),
            )
            .match_body(Matcher::PartialJson(json!({
                "data": {"attributes": {
                    "amount": 25000,
                    "currency": "PHP",
                    "payment_method_allowed": ["gcash"],
                    "metadata": {"order": "42", "user_id": "u-1", "ip_address": "10.0.0.1"}
                }}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(intent_body("pi_1", 25000, "awaiting_payment_method"))
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut metadata = Metadata::new();
        metadata.insert("order".to_string(), "42".to_string());
        let caller = CallerContext {
            user_id: Some("u-1".to_string()),
            ip_address: Some("10.0.0.1".to_string()),
        };

        let intent = client
            .create_payment_intent(250.0, "PHP", &["gcash".to_string()], metadata, caller)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(intent.data.unwrap().attributes.amount, 25_000);
    }

    #[tokio::test]
    async fn create_then_check_status_round_trips_amount() {
        let mut server = mockito::Server::new_async().await;
        let _create = server
            .mock("POST", "/payment_intents")
            .with_status(200)
            .with_body(intent_body("pi_rt", 25000, "awaiting_payment_method"))
            .create_async()
            .await;
        let _get = server
            .mock("GET", "/payment_intents/pi_rt")
            .match_header("idempotency-key", Matcher::Missing)
            .with_status(200)
            .with_body(intent_body("pi_rt", 25000, "succeeded"))
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        let created = client
            .create_payment_intent(
                250.0,
                "PHP",
                &["gcash".to_string()],
                Metadata::new(),
                CallerContext::default(),
            )
            .await
            .unwrap();
        let id = created.data.unwrap().id;

        let retrieved = client.retrieve_payment_intent(&id).await.unwrap();
        assert_eq!(retrieved.data.unwrap().attributes.amount, 25_000);

        let status = client.check_payment_status(&id).await.unwrap();
        assert_eq!(status.amount, 250.0);
        assert!(status.is_successful);
        assert!(!status.is_pending);
        assert!(!status.is_failed);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_gateway() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let gcash = vec!["gcash".to_string()];

        let below_minimum = client
            .create_payment_intent(50.0, "PHP", &gcash, Metadata::new(), CallerContext::default())
            .await;
        assert!(matches!(below_minimum, Err(PaymentError::InvalidAmount(_))));

        let no_methods = client
            .create_payment_intent(150.0, "PHP", &[], Metadata::new(), CallerContext::default())
            .await;
        assert!(matches!(no_methods, Err(PaymentError::InvalidArgument(_))));

        let bad_currency = client
            .create_payment_intent(150.0, "pesos", &gcash, Metadata::new(), CallerContext::default())
            .await;
        assert!(matches!(bad_currency, Err(PaymentError::InvalidArgument(_))));

        let no_type = client
            .create_payment_source(500.0, "PHP", "", SourceOptions::default())
            .await;
        assert!(matches!(no_type, Err(PaymentError::InvalidArgument(_))));

        let no_method = client.attach_payment_method("pi_1", " ").await;
        assert!(matches!(no_method, Err(PaymentError::InvalidArgument(_))));

        let no_id = client.retrieve_payment_intent("").await;
        assert!(matches!(no_id, Err(PaymentError::InvalidArgument(_))));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_error_is_returned_after_one_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/payment_intents/pi_1/attach")
            .with_status(400)
            .with_body(
                json!({"errors": [{"code": "resource_failed_state", "detail": "Intent already succeeded"}]})
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .attach_payment_method("pi_1", "pm_1")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(
            err,
            PaymentError::GatewayClient {
                status: 400,
                code: Some("resource_failed_state".to_string()),
                message: "Intent already succeeded".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_exhausted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/payment_intents/pi_down")
            .with_status(503)
            .expect(4)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.retrieve_payment_intent("pi_down").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(
            err,
            PaymentError::GatewayServer {
                status: Some(503),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn attach_sends_configured_return_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/payment_intents/pi_1/attach")
            .match_header(
                "idempotency-key",
                Matcher::Regex(r"^attach_method_\d+_[0-9a-f]{16}$".to_string()),
            )
            .match_body(Matcher::Json(json!({
                "data": {"attributes": {
                    "payment_method": "pm_1",
                    "return_url": "https://your-website.com/payment/success"
                }}
            })))
            .with_status(200)
            .with_body(intent_body("pi_1", 25000, "awaiting_next_action"))
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let intent = client.attach_payment_method("pi_1", "pm_1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(intent.data.unwrap().attributes.status, "awaiting_next_action");
    }

    #[tokio::test]
    async fn check_status_without_data_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/payment_intents/pi_gone")
            .with_status(200)
            .with_body(r#"{"data": null}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.check_payment_status("pi_gone").await.unwrap_err();

        assert_eq!(err, PaymentError::NotFound);
    }

    #[tokio::test]
    async fn undecodable_success_body_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/payment_intents/pi_odd")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.retrieve_payment_intent("pi_odd").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, PaymentError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn source_falls_back_to_configured_redirects() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sources")
            .match_header(
                "idempotency-key",
                Matcher::Regex(r"^payment_source_\d+_[0-9a-f]{16}$".to_string()),
            )
            .match_body(Matcher::Json(json!({
                "data": {"attributes": {
                    "amount": 50000,
                    "currency": "PHP",
                    "type": "gcash",
                    "redirect": {
                        "success": "https://dishcraft.test/payment/success",
                        "failed": "https://dishcraft.test/payment/failed"
                    }
                }}
            })))
            .with_status(200)
            .with_body(
                json!({"data": {"id": "src_1", "type": "source", "attributes": {
                    "amount": 50000, "currency": "PHP", "type": "gcash", "status": "pending",
                    "redirect": {
                        "checkout_url": "https://pay.example/checkout",
                        "success": "https://dishcraft.test/payment/success",
                        "failed": "https://dishcraft.test/payment/failed"
                    }
                }}})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let source = client
            .create_payment_source(500.0, "PHP", "gcash", SourceOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        let attributes = source.data.unwrap().attributes;
        assert_eq!(
            attributes.redirect.checkout_url.as_deref(),
            Some("https://pay.example/checkout")
        );
    }

    #[tokio::test]
    async fn explicit_redirects_override_defaults() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sources")
            .match_body(Matcher::PartialJson(json!({
                "data": {"attributes": {"redirect": {
                    "success": "https://shop.test/ok",
                    "failed": "https://shop.test/fail"
                }}}
            })))
            .with_status(200)
            .with_body(
                json!({"data": {"id": "src_2", "type": "source", "attributes": {
                    "amount": 50000, "currency": "PHP", "type": "gcash",
                    "redirect": {"success": "https://shop.test/ok", "failed": "https://shop.test/fail"}
                }}})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let options = SourceOptions {
            redirect_success: Some("https://shop.test/ok".to_string()),
            redirect_failed: Some("https://shop.test/fail".to_string()),
        };
        client
            .create_payment_source(500.0, "PHP", "gcash", options)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_secret_key_sends_no_authorization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/payment_intents/pi_1")
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .with_body(json!({"errors": [{"code": "api_key_required", "detail": "API key required"}]}).to_string())
            .expect(1)
            .create_async()
            .await;

        let mut config = test_config(&server.url());
        config.paymongo_secret_key = None;
        let client = PaymongoClient::new(&config).unwrap();

        let err = client.retrieve_payment_intent("pi_1").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, PaymentError::GatewayClient { status: 401, .. }));
    }

    #[tokio::test]
    async fn ids_with_path_characters_never_reach_the_gateway() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let post = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);

        for id in ["../sources", "pi_1/attach", "pi_1?expand=all", "pi_1#x"] {
            let err = client.retrieve_payment_intent(id).await.unwrap_err();
            assert!(matches!(err, PaymentError::InvalidArgument(_)), "{id}");
        }
        let err = client
            .attach_payment_method("pi_1", "../../sources")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::InvalidArgument("Payment method ID contains invalid characters".to_string())
        );

        get.assert_async().await;
        post.assert_async().await;
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/payment_intents/pi_1")
            .with_status(200)
            .with_body(intent_body("pi_1", 25000, "processing"))
            .expect(2)
            .create_async()
            .await;

        for base in [format!("{}/v1", server.url()), format!("{}/v1/", server.url())] {
            let client = PaymongoClient::new(&test_config(&base)).unwrap();
            let intent = client.retrieve_payment_intent("pi_1").await.unwrap();
            assert_eq!(intent.data.unwrap().id, "pi_1");
        }

        mock.assert_async().await;
    }

    #[test]
    fn unusable_base_url_is_a_setup_error() {
        let err = PaymongoClient::new(&test_config("not a url")).unwrap_err();
        assert!(matches!(err, ClientSetupError::BaseUrl(_)));

        let err = PaymongoClient::new(&test_config("mailto:ops@dishcraft.test")).unwrap_err();
        assert!(matches!(err, ClientSetupError::NotABase(_)));
    }

    #[tokio::test]
    async fn retried_posts_reuse_one_idempotency_key() {
        use axum::{Router, http::HeaderMap, http::StatusCode, routing::post};
        use std::sync::{Arc, Mutex};

        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let recorder = {
            let seen = seen.clone();
            move |headers: HeaderMap| {
                let seen = seen.clone();
                async move {
                    let key = headers
                        .get("idempotency-key")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    seen.lock().unwrap().push(key);
                    StatusCode::SERVICE_UNAVAILABLE
                }
            }
        };
        let app = Router::new()
            .route("/payment_intents", post(recorder.clone()))
            .route("/sources", post(recorder));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = PaymongoClient::new(&test_config(&format!("http://{}", addr)))
            .unwrap()
            .with_retry_policy(RetryPolicy::new(3, Duration::ZERO));

        let err = client
            .create_payment_intent(
                250.0,
                "PHP",
                &["gcash".to_string()],
                Metadata::new(),
                CallerContext::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::GatewayServer { status: Some(503), .. }));

        let keys = std::mem::take(&mut *seen.lock().unwrap());
        assert_eq!(keys.len(), 4);
        assert!(keys[0].starts_with("payment_intent_"));
        assert!(keys.iter().all(|k| k == &keys[0]));

        client
            .create_payment_source(500.0, "PHP", "gcash", SourceOptions::default())
            .await
            .unwrap_err();

        let source_keys = seen.lock().unwrap().clone();
        assert_eq!(source_keys.len(), 4);
        assert!(source_keys[0].starts_with("payment_source_"));
        assert!(source_keys.iter().all(|k| k == &source_keys[0]));
        assert_ne!(source_keys[0], keys[0]);
    }
}
