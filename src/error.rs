use axum::{
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(flatten_validation_errors(&errors))
    }
}

fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, kinds) in errors.errors() {
        collect_errors(field, kinds, &mut parts);
    }
    if parts.is_empty() {
        "Invalid input data".to_string()
    } else {
        parts.sort();
        parts.join("; ")
    }
}

fn collect_errors(prefix: &str, kind: &validator::ValidationErrorsKind, out: &mut Vec<String>) {
    match kind {
        validator::ValidationErrorsKind::Field(errs) => {
            for err in errs {
                let detail = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed {}", err.code));
                out.push(format!("{prefix}: {detail}"));
            }
        }
        validator::ValidationErrorsKind::Struct(nested) => {
            for (field, kinds) in nested.errors() {
                collect_errors(&format!("{prefix}.{field}"), kinds, out);
            }
        }
        validator::ValidationErrorsKind::List(items) => {
            for (index, nested) in items {
                for (field, kinds) in nested.errors() {
                    collect_errors(&format!("{prefix}[{index}].{field}"), kinds, out);
                }
            }
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Details of infrastructure failures stay in the logs; clients get a
        // generic message.
        let message = match &self {
            AppError::DbError(err) => {
                tracing::error!(error = %err, "database error");
                "Internal server error".to_string()
            }
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "orm error");
                "Internal server error".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = axum::Json(ErrorBody { error: message });

        if let AppError::RateLimited { retry_after_secs } = &self {
            let headers = [(header::RETRY_AFTER, retry_after_secs.to_string())];
            return (status, headers, body).into_response();
        }

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON extractor whose rejection is rendered as an [`AppError`], so
/// malformed bodies share the `{"error": ...}` shape with every other
/// failure instead of axum's plain-text default.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}
