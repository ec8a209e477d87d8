use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::error::Error;

/// HTTP-facing wrapper around [`Error`].
#[derive(Debug)]
pub struct ApiError(pub Error);

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn error_code(&self) -> &'static str {
        match &self.0 {
            Error::UserNotFound(_) => "USER_NOT_FOUND",
            Error::RateLimited(_) => "RATE_LIMITED",
            Error::GitHubApi(_) | Error::Network(_) => "UPSTREAM_ERROR",
            Error::LLMApi(_) => "LLM_ERROR",
            Error::ParseError(_) | Error::Serialization(_) => "PARSE_ERROR",
            Error::Config(_) | Error::InvalidHeader(_) => "CONFIGURATION_ERROR",
            Error::Database(_) | Error::Storage(_) | Error::Io(_) => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            Error::UserNotFound(_) => StatusCode::NOT_FOUND,
            Error::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Error::GitHubApi(_) | Error::Network(_) | Error::LLMApi(_) | Error::ParseError(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Error::RateLimited(retry_after) = &self.0 {
            builder.insert_header(("Retry-After", retry_after.to_string()));
        }

        builder.json(ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.0.to_string(),
            },
        })
    }
}
