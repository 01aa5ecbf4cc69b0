//! Users API handlers.
//!
//! ```text
//! POST /api/users {"email":"ada@example.com","nickname":"ada","address":"London"}
//! GET  /api/users/{id}
//! GET  /api/users/{id}/verify?certificationCode=...
//! GET  /api/users/me          (EMAIL header)
//! PUT  /api/users/me          (EMAIL header)
//! ```

use actix_web::{HttpResponse, get, http::header, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Address, CertificationCode, Email, Error, Nickname, User, UserCreate, UserId, UserStatus,
    UserUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::RequesterEmail;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, user_field_error};

const EMAIL: FieldName = FieldName::new("email");
const NICKNAME: FieldName = FieldName::new("nickname");
const ADDRESS: FieldName = FieldName::new("address");
const CERTIFICATION_CODE: FieldName = FieldName::new("certificationCode");

/// Registration body for `POST /api/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    /// Address that receives the verification link. Must be unused.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Display name, 1 to 50 characters.
    #[schema(example = "ada")]
    pub nickname: String,
    /// Postal address. Optional.
    #[serde(default)]
    #[schema(example = "12 Analytical Row, London")]
    pub address: String,
}

impl TryFrom<UserCreateRequest> for UserCreate {
    type Error = Error;

    fn try_from(value: UserCreateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: Email::new(&value.email).map_err(|err| user_field_error(EMAIL, &err))?,
            nickname: Nickname::new(value.nickname)
                .map_err(|err| user_field_error(NICKNAME, &err))?,
            address: Address::new(value.address).map_err(|err| user_field_error(ADDRESS, &err))?,
        })
    }
}

/// Profile edit body for `PUT /api/users/me`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    /// New nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// New address.
    #[serde(default)]
    pub address: Option<String>,
}

impl TryFrom<UserUpdateRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UserUpdateRequest) -> Result<Self, Self::Error> {
        let nickname = value
            .nickname
            .map(Nickname::new)
            .transpose()
            .map_err(|err| user_field_error(NICKNAME, &err))?;
        let address = value
            .address
            .map(Address::new)
            .transpose()
            .map_err(|err| user_field_error(ADDRESS, &err))?;
        Ok(Self { nickname, address })
    }
}

/// Query string of the verification link.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VerifyEmailQuery {
    /// Code delivered in the certification message.
    pub certification_code: String,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Registered email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "ada")]
    pub nickname: String,
    /// `PENDING` or `ACTIVE`.
    #[schema(value_type = String, example = "ACTIVE")]
    pub status: UserStatus,
    /// Latest login, absent before the first.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            email: user.email().to_string(),
            nickname: user.nickname().to_string(),
            status: user.status(),
            last_login_at: user.last_login_at(),
        }
    }
}

/// The caller's own profile, including their address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyProfileResponse {
    /// User identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Registered email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "ada")]
    pub nickname: String,
    /// Postal address, visible only to its owner.
    #[schema(example = "12 Analytical Row, London")]
    pub address: String,
    /// `PENDING` or `ACTIVE`.
    #[schema(value_type = String, example = "ACTIVE")]
    pub status: UserStatus,
    /// Timestamp of this login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for MyProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            email: user.email().to_string(),
            nickname: user.nickname().to_string(),
            address: user.address().as_ref().to_owned(),
            status: user.status(),
            last_login_at: user.last_login_at(),
        }
    }
}

/// Register a new user in `PENDING` status and send its verification link.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserCreateRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserCreateRequest>,
) -> ApiResult<HttpResponse> {
    let request = UserCreate::try_from(payload.into_inner())?;
    let user = state.users.create(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Fetch an `ACTIVE` user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Active user", body = UserResponse),
        (status = 404, description = "No active user with this id", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserById"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .users_query
        .get_by_id(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Activate a user from its verification link and redirect the browser.
#[utoipa::path(
    get,
    path = "/api/users/{id}/verify",
    params(("id" = i64, Path, description = "User identifier"), VerifyEmailQuery),
    responses(
        (status = 302, description = "Verified; redirects to the client application"),
        (status = 400, description = "Certification code does not match", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "verifyEmail"
)]
#[get("/users/{id}/verify")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<VerifyEmailQuery>,
) -> ApiResult<HttpResponse> {
    let code = CertificationCode::new(query.into_inner().certification_code)
        .map_err(|err| user_field_error(CERTIFICATION_CODE, &err))?;
    state
        .users
        .verify_email(UserId::new(path.into_inner()), code)
        .await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, state.verified_redirect_url.as_str()))
        .finish())
}

/// Return the caller's profile and record the login.
#[utoipa::path(
    get,
    path = "/api/users/me",
    params(("EMAIL" = String, Header, description = "Caller's email address")),
    responses(
        (status = 200, description = "Caller's profile", body = MyProfileResponse),
        (status = 400, description = "Missing or malformed EMAIL header", body = ErrorSchema),
        (status = 404, description = "No active user with this email", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getMyInfo"
)]
#[get("/users/me")]
pub async fn get_my_info(
    state: web::Data<HttpState>,
    requester: RequesterEmail,
) -> ApiResult<web::Json<MyProfileResponse>> {
    let user = state.users_query.get_by_email(requester.email()).await?;
    let user = state.users.login(user.id()).await?;
    Ok(web::Json(MyProfileResponse::from(&user)))
}

/// Update the caller's nickname and/or address.
#[utoipa::path(
    put,
    path = "/api/users/me",
    params(("EMAIL" = String, Header, description = "Caller's email address")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = MyProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No active user with this email", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateMyInfo"
)]
#[put("/users/me")]
pub async fn update_my_info(
    state: web::Data<HttpState>,
    requester: RequesterEmail,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<MyProfileResponse>> {
    let update = UserUpdate::try_from(payload.into_inner())?;
    let user = state.users_query.get_by_email(requester.email()).await?;
    let user = state.users.update(user.id(), update).await?;
    Ok(web::Json(MyProfileResponse::from(&user)))
}

/// Register the user routes. `/users/me` precedes `/users/{id}` so the
/// literal segment is matched first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_my_info)
        .service(update_my_info)
        .service(create_user)
        .service(verify_email)
        .service(get_user);
}

#[cfg(test)]
mod tests;
