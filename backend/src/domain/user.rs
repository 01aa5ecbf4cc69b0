//! User account model and lifecycle.
//!
//! A user registers in [`UserStatus::Pending`] holding a freshly generated
//! [`CertificationCode`]. The only transition is `Pending -> Active`, taken
//! by [`User::verify`] when the caller presents the matching code. `Active`
//! is terminal.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email was empty after trimming.
    EmptyEmail,
    /// Email exceeded the allowed length.
    EmailTooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Nickname was empty after trimming.
    EmptyNickname,
    /// Nickname exceeded the allowed length.
    NicknameTooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// Address exceeded the allowed length.
    AddressTooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// Certification code was empty.
    EmptyCertificationCode,
    /// Stored status text is neither `PENDING` nor `ACTIVE`.
    UnknownStatus {
        /// Text that failed to parse.
        value: String,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyNickname => write!(f, "nickname must not be empty"),
            Self::NicknameTooLong { max } => {
                write!(f, "nickname must be at most {max} characters")
            }
            Self::AddressTooLong { max } => write!(f, "address must be at most {max} characters"),
            Self::EmptyCertificationCode => write!(f, "certification code must not be empty"),
            Self::UnknownStatus { value } => write!(f, "unknown user status: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Registered but the email address is not yet verified.
    Pending,
    /// Email verified. Terminal.
    Active,
}

impl UserStatus {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            other => Err(UserValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum allowed length for a nickname.
pub const NICKNAME_MAX: usize = 50;
/// Maximum allowed length for an address.
pub const ADDRESS_MAX: usize = 255;

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Shape check only; length is enforced separately.
fn looks_like_email(candidate: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(candidate))
}

/// Unique email address identifying a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`], trimming surrounding whitespace.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !looks_like_email(email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Name shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    /// Validate and construct a [`Nickname`].
    pub fn new(nickname: impl Into<String>) -> Result<Self, UserValidationError> {
        let nickname = nickname.into();
        if nickname.trim().is_empty() {
            return Err(UserValidationError::EmptyNickname);
        }
        if nickname.chars().count() > NICKNAME_MAX {
            return Err(UserValidationError::NicknameTooLong { max: NICKNAME_MAX });
        }
        Ok(Self(nickname))
    }
}

impl AsRef<str> for Nickname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Nickname> for String {
    fn from(value: Nickname) -> Self {
        value.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-form postal address. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate and construct an [`Address`].
    pub fn new(address: impl Into<String>) -> Result<Self, UserValidationError> {
        let address = address.into();
        if address.chars().count() > ADDRESS_MAX {
            return Err(UserValidationError::AddressTooLong { max: ADDRESS_MAX });
        }
        Ok(Self(address))
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl TryFrom<String> for Address {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque single-purpose token proving ownership of an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationCode(String);

impl CertificationCode {
    /// Wrap a stored or user-supplied code.
    pub fn new(code: impl Into<String>) -> Result<Self, UserValidationError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(UserValidationError::EmptyCertificationCode);
        }
        Ok(Self(code))
    }

    /// Generate a fresh UUID-formatted code.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for CertificationCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CertificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreate {
    /// Address the certification message is sent to.
    pub email: Email,
    /// Initial nickname.
    pub nickname: Nickname,
    /// Initial postal address.
    pub address: Address,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// Replacement nickname.
    pub nickname: Option<Nickname>,
    /// Replacement address.
    pub address: Option<Address>,
}

/// A user row that has not been assigned an identifier yet.
///
/// Always [`UserStatus::Pending`]; there is no way to register an active
/// account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: Email,
    nickname: Nickname,
    address: Address,
    certification_code: CertificationCode,
}

impl NewUser {
    /// Prepare a pending registration carrying `certification_code`.
    #[must_use]
    pub fn register(create: UserCreate, certification_code: CertificationCode) -> Self {
        let UserCreate {
            email,
            nickname,
            address,
        } = create;
        Self {
            email,
            nickname,
            address,
            certification_code,
        }
    }

    /// Email the registration was made with.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Requested nickname.
    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Requested address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Status every new registration starts in.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        UserStatus::Pending
    }

    /// Code embedded in the verification link.
    pub fn certification_code(&self) -> &CertificationCode {
        &self.certification_code
    }
}

/// Field bundle used to rehydrate a [`User`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserParts {
    /// Primary key.
    pub id: UserId,
    /// Unique email address.
    pub email: Email,
    /// Stored nickname.
    pub nickname: Nickname,
    /// Stored address.
    pub address: Address,
    /// Stored lifecycle state.
    pub status: UserStatus,
    /// Code issued at registration.
    pub certification_code: CertificationCode,
    /// Most recent login, `None` before the first one.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Outcome of a successful [`User::verify`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The user moved from pending to active and must be persisted.
    Activated,
    /// The user was already active; nothing changed.
    AlreadyActive,
}

/// Raised by [`User::verify`] when the presented code differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("certification code does not match")]
pub struct CertificationCodeMismatch;

/// Registered user account.
///
/// ## Invariants
/// - `status` only ever moves from `Pending` to `Active`.
/// - `certification_code` is fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    nickname: Nickname,
    address: Address,
    status: UserStatus,
    certification_code: CertificationCode,
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Rehydrate a user from stored fields.
    #[must_use]
    pub fn from_parts(parts: UserParts) -> Self {
        let UserParts {
            id,
            email,
            nickname,
            address,
            status,
            certification_code,
            last_login_at,
        } = parts;
        Self {
            id,
            email,
            nickname,
            address,
            status,
            certification_code,
            last_login_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Name shown to other users.
    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Postal address; only returned to the user themselves.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Current lifecycle state.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Code the user must present to verify their email.
    pub fn certification_code(&self) -> &CertificationCode {
        &self.certification_code
    }

    /// Time of the most recent login, if any.
    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    /// Whether the account has completed email verification.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Activate the account when `code` matches the stored certification code.
    ///
    /// A mismatch leaves the user untouched regardless of status.
    pub fn verify(
        &mut self,
        code: &CertificationCode,
    ) -> Result<Verification, CertificationCodeMismatch> {
        if self.certification_code != *code {
            return Err(CertificationCodeMismatch);
        }
        match self.status {
            UserStatus::Active => Ok(Verification::AlreadyActive),
            UserStatus::Pending => {
                self.status = UserStatus::Active;
                Ok(Verification::Activated)
            }
        }
    }
}
