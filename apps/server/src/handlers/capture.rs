use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use dropcatch_domain::ResultCode;
use dropcatch_kernel::xml;
use dropcatch_registration::{CaptureRequest, RegistrationError, authorize, success_response};
use tracing::debug;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

fn xml_reply(code: ResultCode, body: String) -> Response {
    let status = StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
}

/// `POST /api/capture`: registers a competitor from a capture document.
pub(crate) async fn capture_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match register(&state, &headers, &body).await {
        Ok(reply) => xml_reply(ResultCode::Success, reply),
        Err(e) => {
            debug!(error = %e, "Capture rejected");
            xml_reply(e.result_code(), e.to_response())
        },
    }
}

async fn register(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<String, RegistrationError> {
    let header = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    authorize(state.config.registration.api_token.as_deref(), header)?;

    let text = std::str::from_utf8(body).map_err(|e| RegistrationError::InvalidInput {
        message: format!("body is not UTF-8: {e}").into(),
        context: None,
    })?;
    let request = CaptureRequest::parse(text)?;
    let id = state
        .registrar
        .register(request.drop_id, &request.name, request.attempts, request.delay_ms)
        .await?;

    Ok(success_response(id))
}

pub(crate) async fn method_not_allowed() -> Response {
    xml_reply(ResultCode::BadMethod, xml::result(ResultCode::BadMethod))
}
