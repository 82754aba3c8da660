//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field becomes an `invalid_request` error whose details
//! name the field and a stable code.

use actix_web::web;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Error, ExperienceValidationError, LoginValidationError, PageRequest, PageRequestError,
    PasswordValidationError, UserValidationError,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Request field name in wire casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    let name = field.as_str();
    Uuid::parse_str(value).map_err(|_| {
        Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
            "field": name,
            "value": value,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

pub(crate) fn experience_error(error: ExperienceValidationError) -> Error {
    field_error(error.field(), ErrorCode::InvalidValue, error.to_string())
}

pub(crate) fn user_error(field: FieldName, error: UserValidationError) -> Error {
    field_error(field.as_str(), ErrorCode::InvalidValue, error.to_string())
}

pub(crate) fn password_error(error: PasswordValidationError) -> Error {
    let field = match error {
        PasswordValidationError::TooShort { .. } => "password",
        PasswordValidationError::ConfirmationMismatch => "passwordConfirm",
    };
    field_error(field, ErrorCode::InvalidValue, error.to_string())
}

pub(crate) fn login_error(error: LoginValidationError) -> Error {
    let field = match error {
        LoginValidationError::InvalidEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, ErrorCode::InvalidValue, error.to_string())
}

/// Validate `page` and `limit` query parameters.
pub(crate) fn page_request(page: Option<u32>, limit: Option<u32>) -> Result<PageRequest, Error> {
    PageRequest::new(page, limit).map_err(|error| {
        let field = match error {
            PageRequestError::PageOutOfRange => "page",
            PageRequestError::LimitOutOfRange { .. } => "limit",
        };
        field_error(field, ErrorCode::InvalidValue, error.to_string())
    })
}

fn body_error(message: String) -> actix_web::Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
        .into()
}

/// JSON extractor configuration reporting malformed bodies in the error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _| body_error(error.to_string()))
}

/// Query extractor configuration reporting malformed parameters in the error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|error, _| body_error(error.to_string()))
}

/// Path extractor configuration reporting malformed segments in the error envelope.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|error, _| body_error(error.to_string()))
}
