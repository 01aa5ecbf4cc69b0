//! Extractor for the caller-supplied `EMAIL` header.
//!
//! The `/api/users/me` endpoints identify the caller by email address
//! without any session or credential check.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header::HeaderMap};
use futures_util::future::{Ready, ready};

use crate::domain::{Email, Error};
use crate::inbound::http::validation::{FieldName, missing_header_error, user_field_error};

/// Name of the header carrying the caller's email address.
pub const EMAIL_HEADER: &str = "EMAIL";

const EMAIL_FIELD: FieldName = FieldName::new(EMAIL_HEADER);

/// Validated email address taken from the [`EMAIL_HEADER`] request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterEmail(Email);

impl RequesterEmail {
    /// Parse the header out of `headers`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, Error> {
        let raw = headers
            .get(EMAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| missing_header_error(EMAIL_FIELD))?;
        Email::new(raw)
            .map(Self)
            .map_err(|err| user_field_error(EMAIL_FIELD, &err))
    }

    /// The caller's email address.
    pub fn email(&self) -> &Email {
        &self.0
    }
}

impl FromRequest for RequesterEmail {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req.headers()))
    }
}
