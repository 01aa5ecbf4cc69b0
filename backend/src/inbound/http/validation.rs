//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report failures as plain enums. These helpers turn
//! them into `invalid_request` errors whose details name the offending field
//! and a stable machine-readable code.

use serde_json::json;

use crate::domain::{Error, PostValidationError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingHeader,
    Empty,
    TooLong,
    InvalidFormat,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingHeader => "missing_header",
            ErrorCode::Empty => "empty",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidFormat => "invalid_format",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
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

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn user_error_code(err: &UserValidationError) -> ErrorCode {
    match err {
        UserValidationError::EmptyEmail
        | UserValidationError::EmptyNickname
        | UserValidationError::EmptyCertificationCode => ErrorCode::Empty,
        UserValidationError::EmailTooLong { .. }
        | UserValidationError::NicknameTooLong { .. }
        | UserValidationError::AddressTooLong { .. } => ErrorCode::TooLong,
        UserValidationError::InvalidEmail | UserValidationError::UnknownStatus { .. } => {
            ErrorCode::InvalidFormat
        }
    }
}

/// Map a user value validation failure on `field` to `invalid_request`.
pub(crate) fn user_field_error(field: FieldName, err: &UserValidationError) -> Error {
    field_error(field, user_error_code(err), err.to_string())
}

/// Map a post value validation failure on `field` to `invalid_request`.
pub(crate) fn post_field_error(field: FieldName, err: &PostValidationError) -> Error {
    let code = match err {
        PostValidationError::EmptyContent => ErrorCode::Empty,
        PostValidationError::ContentTooLong { .. } => ErrorCode::TooLong,
    };
    field_error(field, code, err.to_string())
}

/// Report a required request header that was absent or unreadable.
pub(crate) fn missing_header_error(header: FieldName) -> Error {
    let name = header.as_str();
    field_error(
        header,
        ErrorCode::MissingHeader,
        format!("missing required header: {name}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    const EMAIL: FieldName = FieldName::new("email");

    #[rstest]
    #[case(UserValidationError::EmptyEmail, "empty")]
    #[case(UserValidationError::EmailTooLong { max: 254 }, "too_long")]
    #[case(UserValidationError::InvalidEmail, "invalid_format")]
    fn user_errors_carry_field_and_code(#[case] err: UserValidationError, #[case] code: &str) {
        let error = user_field_error(EMAIL, &err);

        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(error.message(), err.to_string());
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "email");
        assert_eq!(details["code"], code);
    }

    #[rstest]
    fn post_errors_report_too_long() {
        let error = post_field_error(
            FieldName::new("content"),
            &PostValidationError::ContentTooLong { max: 10 },
        );
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "content");
        assert_eq!(details["code"], "too_long");
    }

    #[rstest]
    fn missing_header_names_the_header() {
        let error = missing_header_error(FieldName::new("EMAIL"));
        assert_eq!(error.message(), "missing required header: EMAIL");
        assert_eq!(
            error.details().and_then(|d| d.get("code")),
            Some(&json!("missing_header"))
        );
    }
}
