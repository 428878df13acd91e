//! HTTP handlers

use super::response::Reply;
use super::state::AppState;
use crate::{
    error::AppError,
    logging::RequestLogger,
    models::{ContactForm, QuoteForm, ValidationErrors},
    relay::{LeadRelay, RelayError},
};
use axum::{
    body::{Body, Bytes},
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

const DOWNLOAD_CHUNK: usize = 64 * 1024;
static ZEROS: [u8; DOWNLOAD_CHUNK] = [0; DOWNLOAD_CHUNK];

/// Route-specific wording of a submission endpoint
struct SubmissionRoute {
    path: &'static str,
    success: &'static str,
    failure: &'static str,
}

const CONTACT_ROUTE: SubmissionRoute = SubmissionRoute {
    path: "/api/mail",
    success: "Message sent successfully",
    failure: "Error sending message",
};

const QUOTE_ROUTE: SubmissionRoute = SubmissionRoute {
    path: "/api/submit-quote",
    success: "Quote request submitted successfully",
    failure: "Error submitting quote request",
};

/// POST /api/mail
pub async fn mail_handler(State(state): State<AppState>, body: Body) -> Reply {
    relay_submission(&state, &CONTACT_ROUTE, body, |relay, form: ContactForm| async move {
        relay.submit_contact(form).await.map(|_| ())
    })
    .await
}

/// POST /api/submit-quote
pub async fn submit_quote_handler(State(state): State<AppState>, body: Body) -> Reply {
    relay_submission(&state, &QUOTE_ROUTE, body, |relay, form: QuoteForm| async move {
        relay.submit_quote(form).await.map(|_| ())
    })
    .await
}

// Configuration is checked before the body is read.
async fn relay_submission<F, Fut>(
    state: &AppState,
    route: &SubmissionRoute,
    body: Body,
    submit: impl FnOnce(Arc<LeadRelay>, F) -> Fut,
) -> Reply
where
    F: DeserializeOwned,
    Fut: Future<Output = Result<(), RelayError>>,
{
    let request = RequestLogger::start(&state.logger, route.path).await;

    let relay = match state.relay() {
        Ok(relay) => relay,
        Err(e) => {
            request.failed(&e).await;
            return Reply::configuration_error();
        }
    };

    let body = match axum::body::to_bytes(body, crate::defaults::MAX_SUBMISSION_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            request.failed(&AppError::validation(format!("Unreadable request body: {}", e))).await;
            return Reply::too_large();
        }
    };

    let form: F = match parse_body(&body) {
        Ok(form) => form,
        Err(errors) => {
            request.rejected(&field_names(&errors)).await;
            return Reply::invalid(errors);
        }
    };

    match submit(relay, form).await {
        Ok(()) => {
            request.completed(StatusCode::OK.as_u16()).await;
            Reply::success(route.success)
        }
        Err(RelayError::Invalid(errors)) => {
            request.rejected(&field_names(&errors)).await;
            Reply::invalid(errors)
        }
        Err(RelayError::Delivery(e)) => {
            request.failed(&e).await;
            Reply::server_error(route.failure)
        }
    }
}

/// Malformed JSON is reported like any other invalid input
fn parse_body<F: DeserializeOwned>(body: &[u8]) -> Result<F, ValidationErrors> {
    serde_json::from_slice(body).map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.push("body", "Request body must be a JSON object with string fields");
        errors
    })
}

fn field_names(errors: &ValidationErrors) -> Vec<&str> {
    errors.errors().iter().map(|e| e.field.as_str()).collect()
}

/// GET /api/ping
pub async fn ping_handler() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Json(json!({ "status": "ok" })))
}

/// POST /api/upload-test; the payload is read and discarded
pub async fn upload_test_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut received = 0u64;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return upload_error(&state, e.status(), e.body_text()).await,
        };

        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => received += chunk.len() as u64,
                Ok(None) => break,
                Err(e) => return upload_error(&state, e.status(), e.body_text()).await,
            }
        }
    }

    state.logger.debug("Upload test payload discarded")
        .field("bytes_received", received)
        .log()
        .await;

    Json(json!({ "status": "success", "bytes_received": received })).into_response()
}

async fn upload_error(state: &AppState, status: StatusCode, detail: String) -> Response {
    state.logger.info("Upload test rejected")
        .field("status", status.as_u16())
        .field("detail", &detail)
        .log()
        .await;

    (status, Json(json!({ "status": "error", "message": detail }))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub bytes: Option<u64>,
}

/// GET /api/download?bytes=N streams N zero bytes
pub async fn download_handler(Query(query): Query<DownloadQuery>) -> Response {
    let size = query.bytes.unwrap_or(crate::defaults::DEFAULT_BLOCK_SIZE as u64);

    if size == 0 || size > crate::defaults::MAX_DOWNLOAD_BYTES {
        let message = format!(
            "bytes must be between 1 and {}",
            crate::defaults::MAX_DOWNLOAD_BYTES
        );
        return (StatusCode::BAD_REQUEST, Json(json!({ "status": "error", "message": message }))).into_response();
    }

    let full_chunks = size / DOWNLOAD_CHUNK as u64;
    let remainder = (size % DOWNLOAD_CHUNK as u64) as usize;
    let chunks = (0..full_chunks)
        .map(|_| Bytes::from_static(&ZEROS))
        .chain((remainder > 0).then(|| Bytes::from_static(&ZEROS[..remainder])))
        .map(Ok::<_, Infallible>);

    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, size.to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Body::from_stream(stream::iter(chunks)),
    )
        .into_response()
}

/// GET /api/plans
pub async fn plans_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.plans.as_ref().clone())
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "build_time": option_env!("BUILD_TIME"),
        "git_commit": option_env!("GIT_COMMIT"),
        "mail_relay": if state.relay_enabled() { "enabled" } else { "disabled" },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_accepts_partial_object() {
        let form: ContactForm = parse_body(br#"{"name":"A"}"#).unwrap();
        assert_eq!(form.name.as_deref(), Some("A"));
        assert!(form.email.is_none());
    }

    #[test]
    fn test_parse_body_rejects_malformed_json() {
        let errors = parse_body::<ContactForm>(b"{not json").unwrap_err();
        assert!(errors.has_field("body"));
    }

    #[test]
    fn test_parse_body_rejects_wrong_types() {
        let errors = parse_body::<ContactForm>(br#"{"name": 42}"#).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_names() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "Name is required");
        errors.push("email", "Invalid email address");
        assert_eq!(field_names(&errors), vec!["name", "email"]);
    }
}
