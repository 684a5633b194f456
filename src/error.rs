use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::store::{Collection, StoreError};

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorVerbosity {
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    Message,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    #[default]
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    fn error_verbosity(&self) -> ErrorVerbosity;
}

/// Maps an error into an [`InternalServerError`] using the verbosity of the given state.
#[macro_export]
macro_rules! server_error {
    ($state:expr) => {
        |err| {
            $crate::error::InternalServerError::from_generic_error(
                $crate::error::ErrorVerbosityProvider::error_verbosity(&$state),
                err,
            )
        }
    };
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiErrorMessage {
    message: &'static str,
}

impl From<ApiErrorResponse> for ApiErrorMessage {
    fn from(response: ApiErrorResponse) -> Self {
        ApiErrorMessage {
            message: response.message,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status_code = self.error.status_code();

        match self.error.verbosity() {
            ErrorVerbosity::StatusCode => status_code.into_response(),
            ErrorVerbosity::Message => {
                (status_code, Json(ApiErrorMessage::from(self))).into_response()
            }
            ErrorVerbosity::Full => (status_code, Json(self)).into_response(),
        }
    }
}

#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// Any store or runtime fault that is not the client's doing.
    InternalServerError(InternalServerError),
    /// Body error
    ///
    /// The request body is not a JSON object.
    Body(BodyError),
    /// Path error
    ///
    /// The path parameters could not be extracted.
    Path(PathError),
    /// Validation error
    ///
    /// The store rejected the shape of a write.
    Validation(ValidationError),
    /// Method not allowed
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// No route matches the request.
    NotFound(NotFoundError),
    /// Resource not found
    ///
    /// No document has the requested id. Rendered as plain text.
    #[serde(skip)]
    ResourceNotFound(ResourceNotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
            ApiError::ResourceNotFound(_) => ErrorVerbosity::Full,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Path(_) => "Failed to parse path parameters",
            ApiError::Validation(_) => "The document was rejected by the store",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
            ApiError::ResourceNotFound(_) => "The requested document was not found",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) | ApiError::Path(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) | ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Maps the outcome of a store read or delete.
    ///
    /// Nothing but a missing document is blamed on the client here, a malformed id included.
    pub fn from_store_read(verbosity: ErrorVerbosity, err: StoreError) -> Self {
        InternalServerError::from_generic_error(verbosity, err).into()
    }

    /// Maps the outcome of a store create or update.
    pub fn from_store_write(verbosity: ErrorVerbosity, err: StoreError) -> Self {
        match err {
            StoreError::Validation(_) | StoreError::MalformedId(_) => {
                ValidationError::from_store_error(verbosity, err).into()
            }
            StoreError::Unexpected(err) => {
                InternalServerError::from_generic_error(verbosity, err).into()
            }
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let message = error.message();

        ApiErrorResponse { error, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ResourceNotFound(err) => {
                (StatusCode::NOT_FOUND, err.to_string()).into_response()
            }
            _ => ApiErrorResponse::from(self).into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), Some(body_expected_schema)),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
        }
    }

    pub fn from_path_rejection(verbosity: ErrorVerbosity, rejection: PathRejection) -> ApiError {
        PathError::new(verbosity, rejection.body_text()).into()
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    validation_error_reason: Option<String>,
}

impl ValidationError {
    pub fn from_store_error(verbosity: ErrorVerbosity, err: StoreError) -> Self {
        tracing::warn!(%err, "Write rejected");

        let validation_error_reason = verbosity
            .should_generate_error_reason()
            .then(|| err.to_string());

        ValidationError {
            verbosity,
            validation_error_reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

/// A lookup by id matched no document of `collection`.
#[derive(Debug)]
pub struct ResourceNotFoundError {
    collection: Collection,
}

impl ResourceNotFoundError {
    pub fn new(collection: Collection) -> Self {
        tracing::debug!(%collection, "Document not found");

        ResourceNotFoundError { collection }
    }
}

impl std::fmt::Display for ResourceNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found", self.collection.kind())
    }
}
