//! Domain primitives, services and ports.
//!
//! Purpose: hold the user lifecycle and post rules independently of HTTP and
//! Diesel. Inbound adapters call the driving ports in [`ports`]; outbound
//! adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User and its value types: account identity and lifecycle.
//! - Post and its value types: authored content.
//! - UserService / PostService: implementations of the driving ports.
//! - TraceId: request correlation identifier.

pub mod error;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::post::{
    NewPost, POST_CONTENT_MAX, Post, PostContent, PostCreate, PostId, PostUpdate,
    PostValidationError,
};
pub use self::post_service::PostService;
pub use self::trace_id::{TraceId, TraceIdParseError};
pub use self::user::{
    ADDRESS_MAX, Address, CertificationCode, CertificationCodeMismatch, EMAIL_MAX, Email,
    NICKNAME_MAX, NewUser, Nickname, User, UserCreate, UserId, UserParts, UserStatus, UserUpdate,
    UserValidationError, Verification,
};
pub use self::user_service::UserService;
