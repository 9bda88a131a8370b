use rocket::{http::Status, response::Responder, serde::json::Json};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] mongodb::error::Error),
    #[error("{1}")]
    Status(Status, String),
    #[error("Invalid request data")]
    Validation(Vec<String>),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Status(Status::Unauthorized, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Status(Status::NotFound, message.into())
    }
}

/// Body of every error response: a human-readable message, plus the
/// individual validation failures when there are any.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let (status, body) = match self {
            Self::Db(err) => {
                error!("Database error: {err}");
                (
                    Status::InternalServerError,
                    ErrorBody::new("Internal server error"),
                )
            }
            Self::Status(status, message) => (status, ErrorBody::new(message)),
            Self::Validation(errors) => (
                Status::BadRequest,
                ErrorBody {
                    message: "Invalid request data".to_string(),
                    errors: Some(errors),
                },
            ),
        };
        (status, Json(body)).respond_to(req)
    }
}
