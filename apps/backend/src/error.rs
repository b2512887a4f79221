use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::trace_ctx;

/// RFC 7807 body rendered for every failed HTTP request.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: ErrorCode,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Room unavailable: {detail}")]
    RoomUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::BadRequest { code, .. } => *code,
            AppError::RoomUnavailable { .. } => ErrorCode::RoomUnavailable,
            AppError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Config { detail }
            | AppError::BadRequest { detail, .. }
            | AppError::RoomUnavailable { detail }
            | AppError::Internal { detail } => detail,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::RoomUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn bad_request(code: ErrorCode, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    /// "ROOM_UNAVAILABLE" -> "Room Unavailable"
    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn problem_details(&self) -> ProblemDetails {
        let code = self.code();
        ProblemDetails {
            type_: format!("https://checkers.local/errors/{code}"),
            title: Self::humanize_code(code.as_str()),
            status: self.status().as_u16(),
            detail: self.detail().to_string(),
            code,
            trace_id: trace_ctx::trace_id(),
        }
    }
}

impl From<actix::MailboxError> for AppError {
    fn from(e: actix::MailboxError) -> Self {
        AppError::RoomUnavailable {
            detail: format!("room actor unreachable: {e}"),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::internal(format!("io error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let problem = self.problem_details();
        HttpResponse::build(self.status())
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", problem.trace_id.clone()))
            .json(problem)
    }
}
