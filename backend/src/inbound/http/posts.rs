//! Posts API handlers.
//!
//! ```text
//! POST /api/posts {"writerId":1,"content":"hello"}
//! GET  /api/posts/{id}
//! PUT  /api/posts/{id} {"content":"edited"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Post, PostContent, PostCreate, PostId, PostUpdate, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{FieldName, post_field_error};

const CONTENT: FieldName = FieldName::new("content");

/// Body for `POST /api/posts`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostCreateRequest {
    /// Author's user id. Pending users may post.
    #[schema(example = 1)]
    pub writer_id: i64,
    /// Body text, never blank.
    #[schema(example = "Notes on the analytical engine")]
    pub content: String,
}

impl TryFrom<PostCreateRequest> for PostCreate {
    type Error = Error;

    fn try_from(value: PostCreateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            writer_id: UserId::new(value.writer_id),
            content: PostContent::new(value.content)
                .map_err(|err| post_field_error(CONTENT, &err))?,
        })
    }
}

/// Body for `PUT /api/posts/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdateRequest {
    /// Replacement body text.
    pub content: String,
}

impl TryFrom<PostUpdateRequest> for PostUpdate {
    type Error = Error;

    fn try_from(value: PostUpdateRequest) -> Result<Self, Self::Error> {
        PostContent::new(value.content)
            .map(|content| Self { content })
            .map_err(|err| post_field_error(CONTENT, &err))
    }
}

/// A post with its writer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Post identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Body text.
    pub content: String,
    /// Publication time.
    pub created_at: DateTime<Utc>,
    /// Latest edit; absent until the first.
    pub modified_at: Option<DateTime<Utc>>,
    /// Public view of the author.
    pub writer: UserResponse,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id().get(),
            content: post.content().as_ref().to_owned(),
            created_at: post.created_at(),
            modified_at: post.modified_at(),
            writer: UserResponse::from(post.writer()),
        }
    }
}

/// Publish a post on behalf of an existing user.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = PostCreateRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Writer does not exist", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    payload: web::Json<PostCreateRequest>,
) -> ApiResult<HttpResponse> {
    let request = PostCreate::try_from(payload.into_inner())?;
    let post = state.posts.create(request).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(&post)))
}

/// Fetch a post by id.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Post does not exist", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPostById"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostResponse>> {
    let post = state
        .posts_query
        .get_by_id(PostId::new(path.into_inner()))
        .await?;
    Ok(web::Json(PostResponse::from(&post)))
}

/// Replace a post's content and stamp its modification time.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    request_body = PostUpdateRequest,
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Post does not exist", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<PostUpdateRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let update = PostUpdate::try_from(payload.into_inner())?;
    let post = state
        .posts
        .update(PostId::new(path.into_inner()), update)
        .await?;
    Ok(web::Json(PostResponse::from(&post)))
}

/// Register the post routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_post)
        .service(get_post)
        .service(update_post);
}
