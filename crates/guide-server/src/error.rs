use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use guide_core::checklist::ChecklistError;
use guide_core::GuideError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

fn status_for(e: &GuideError) -> StatusCode {
    match e {
        GuideError::MissingId => StatusCode::BAD_REQUEST,
        GuideError::ItemNotFound(_) => StatusCode::NOT_FOUND,
        GuideError::Checklist(c) => match c {
            ChecklistError::PreviousIncomplete { .. } | ChecklistError::Disabled => {
                StatusCode::CONFLICT
            }
            ChecklistError::StepOutOfRange { .. } => StatusCode::BAD_REQUEST,
        },
        GuideError::Fetch(_) | GuideError::NoColumns | GuideError::EmptySheet => {
            StatusCode::BAD_GATEWAY
        }
        GuideError::NoSource => StatusCode::SERVICE_UNAVAILABLE,
        GuideError::InvalidUrl(_)
        | GuideError::Store(_)
        | GuideError::Io(_)
        | GuideError::Yaml(_)
        | GuideError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<GuideError>() {
            status_for(e)
        } else if let Some(c) = self.0.downcast_ref::<ChecklistError>() {
            status_for(&GuideError::Checklist(c.clone()))
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %format!("{:#}", self.0), "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
