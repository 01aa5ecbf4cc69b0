//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP endpoint together with the
//! request/response DTOs and the error envelope schemas. The document backs
//! Swagger UI in debug builds and is exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::posts::{PostCreateRequest, PostResponse, PostUpdateRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    MyProfileResponse, UserCreateRequest, UserResponse, UserUpdateRequest,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Postboard API",
        description = "User registration with email verification, profiles and posts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::verify_email,
        crate::inbound::http::users::get_my_info,
        crate::inbound::http::users::update_my_info,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserCreateRequest,
        UserUpdateRequest,
        UserResponse,
        MyProfileResponse,
        PostCreateRequest,
        PostUpdateRequest,
        PostResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Registration, verification and profiles"),
        (name = "posts", description = "Posts written by users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
