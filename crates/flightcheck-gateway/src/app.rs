use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{batch_handler, health_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/v1/flights",
                Router::new().route("/batch", post(batch_handler)),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use flightcheck_core::{CanonicalFlightCode, FlightResult, ScheduleSource, SourceError};
    use http_body_util::BodyExt;
    use jiff::civil::Date;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Echoes every requested code back as a found flight and records the
    /// batches it was asked for.
    #[derive(Default)]
    struct EchoSource {
        batches: Mutex<Vec<(Vec<String>, Option<Date>)>>,
    }

    #[async_trait]
    impl ScheduleSource for EchoSource {
        async fn lookup(
            &self,
            codes: &[CanonicalFlightCode],
            date: Option<Date>,
        ) -> std::result::Result<Vec<FlightResult>, SourceError> {
            self.batches
                .lock()
                .unwrap()
                .push((codes.iter().map(|c| c.to_string()).collect(), date));
            Ok(codes
                .iter()
                .map(|code| FlightResult {
                    arrival_airport: Some("CUN".into()),
                    scheduled_in: Some("10:30 AM".into()),
                    ..FlightResult::empty(code.as_str())
                })
                .collect())
        }
    }

    struct DownSource;

    #[async_trait]
    impl ScheduleSource for DownSource {
        async fn lookup(
            &self,
            _codes: &[CanonicalFlightCode],
            _date: Option<Date>,
        ) -> std::result::Result<Vec<FlightResult>, SourceError> {
            Err(SourceError::Timeout)
        }
    }

    async fn post_batch(state: AppState, body: &str) -> (StatusCode, Value) {
        let response = App::router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/flights/batch")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = App::router(AppState::without_credentials())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn batch_echoes_codes_as_sent_in_input_order() {
        let source = Arc::new(EchoSource::default());
        let state = AppState::new(source.clone());

        let (status, body) = post_batch(
            state,
            r#"{ "flightCodes": ["AAL2641", " Delta1234 ", "AAL2641"], "date": "2025-03-14" }"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let codes: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["AAL2641", "Delta1234", "AAL2641"]);
        assert_eq!(body[0]["scheduled_in"], "10:30 AM");
        assert!(body[0].get("error").is_none());

        let batches = source.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0, vec!["AAL2641", "Delta1234", "AAL2641"]);
        assert_eq!(batches[0].1, Some(jiff::civil::date(2025, 3, 14)));
    }

    #[tokio::test]
    async fn non_array_codes_are_rejected() {
        let state = AppState::new(Arc::new(EchoSource::default()));
        let (status, body) = post_batch(state, r#"{ "flightCodes": "AA2641" }"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "flightCodes must be an array" }));
    }

    #[tokio::test]
    async fn unreadable_body_is_rejected() {
        let state = AppState::new(Arc::new(EchoSource::default()));
        let (status, body) = post_batch(state, "flightCodes=AA2641").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("request body is not valid JSON"));
    }

    #[tokio::test]
    async fn missing_credentials_is_a_server_error() {
        let (status, body) = post_batch(
            AppState::without_credentials(),
            r#"{ "flightCodes": ["AA2641"] }"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "schedule provider credentials are not configured" })
        );
    }

    #[tokio::test]
    async fn empty_batch_skips_the_source() {
        let source = Arc::new(EchoSource::default());
        let (status, body) =
            post_batch(AppState::new(source.clone()), r#"{ "flightCodes": [] }"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
        assert!(source.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn source_timeout_maps_to_gateway_timeout() {
        let (status, body) = post_batch(
            AppState::new(Arc::new(DownSource)),
            r#"{ "flightCodes": ["AA2641"] }"#,
        )
        .await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body, json!({ "error": "schedule lookup timed out" }));
    }
}
