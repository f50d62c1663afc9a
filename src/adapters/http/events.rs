//! Event ingest endpoint.
//!
//! Producers in other processes post a [`RawEvent`]; the body is validated
//! against the taxonomy and emitted on the shared bus. The response only
//! acknowledges scheduling. Handler outcomes are never reported back.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::domain::events::RawEvent;
use crate::domain::foundation::DomainError;
use crate::ports::EventPublisher;

/// State for the ingest route.
#[derive(Clone)]
pub struct EventIngestState {
    pub publisher: Arc<dyn EventPublisher>,
}

impl EventIngestState {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }
}

/// Body of a `202 Accepted` reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventAccepted {
    /// Number of handlers scheduled for the event.
    pub scheduled: usize,
}

/// Error body for rejected events.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
}

/// Maps a [`DomainError`] to a status code and JSON body.
#[derive(Debug)]
pub struct IngestError(DomainError);

impl From<DomainError> for IngestError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = if self.0.code.is_caller_fault() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "Event ingest failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error_code: self.0.code.as_str().to_string(),
            message: self.0.message,
        };
        (status, Json(body)).into_response()
    }
}

/// Route: `POST /events`
pub async fn ingest_event(
    State(state): State<EventIngestState>,
    Json(raw): Json<RawEvent>,
) -> Result<impl IntoResponse, IngestError> {
    let dispatch = state.publisher.emit_raw(raw).await?;
    let body = EventAccepted {
        scheduled: dispatch.scheduled(),
    };
    Ok((StatusCode::ACCEPTED, Json(body)))
}

/// Creates the ingest router.
///
/// Routes:
/// - `POST /events` - Validate and emit one event
pub fn events_router() -> Router<EventIngestState> {
    Router::new().route("/events", post(ingest_event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InProcessEventBus;
    use crate::domain::events::{Event, EventKind};
    use crate::ports::{EventHandler, EventSubscriber};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    struct Forward(mpsc::UnboundedSender<Event>);

    #[async_trait]
    impl EventHandler for Forward {
        async fn handle(&self, event: &Event) -> Result<(), DomainError> {
            let _ = self.0.send(event.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "Forward"
        }
    }

    fn app(bus: Arc<InProcessEventBus>) -> Router {
        events_router().with_state(EventIngestState::new(bus))
    }

    fn post_json(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/events")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn accepted_event_reaches_subscribers() {
        let bus = Arc::new(InProcessEventBus::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe(EventKind::CoursePublished, Arc::new(Forward(tx)));

        let response = app(bus)
            .oneshot(post_json(json!({
                "type": "course.published.v1",
                "tenant_id": "t-1",
                "payload": {
                    "course_id": "c-1",
                    "instructor_id": "i-1",
                    "course_title": "Rust"
                }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(response).await, json!({ "scheduled": 1 }));

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.kind(), EventKind::CoursePublished);
        assert_eq!(event.tenant_id().as_str(), "t-1");
    }

    #[tokio::test]
    async fn event_without_subscribers_schedules_nothing() {
        let bus = Arc::new(InProcessEventBus::default());

        let response = app(bus)
            .oneshot(post_json(json!({
                "type": "lesson.completed.v1",
                "tenant_id": "t-1",
                "payload": { "user_id": "u-1", "lesson_id": "l-1", "course_id": "c-1" }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(response).await, json!({ "scheduled": 0 }));
    }

    #[tokio::test]
    async fn unknown_event_type_is_a_bad_request() {
        let bus = Arc::new(InProcessEventBus::default());

        let response = app(bus)
            .oneshot(post_json(json!({
                "type": "course.archived.v1",
                "tenant_id": "t-1",
                "payload": {}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "INVALID_EVENT_KIND");
    }

    #[tokio::test]
    async fn blank_tenant_is_a_bad_request() {
        let bus = Arc::new(InProcessEventBus::default());

        let response = app(bus)
            .oneshot(post_json(json!({
                "type": "lesson.completed.v1",
                "tenant_id": "",
                "payload": { "user_id": "u-1", "lesson_id": "l-1", "course_id": "c-1" }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
