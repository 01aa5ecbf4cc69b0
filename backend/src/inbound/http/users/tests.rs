//! Tests for users API handlers.

use super::*;
use crate::domain::ports::{MockPostCommand, MockPostQuery, MockUserCommand, MockUserQuery};
use crate::domain::{UserParts, UserStatus};
use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::state::HttpStatePorts;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::TimeZone;
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

const REDIRECT: &str = "http://localhost:3000/";

fn parts(id: i64, status: UserStatus) -> UserParts {
    UserParts {
        id: UserId::new(id),
        email: Email::new("ada@example.com").expect("valid email"),
        nickname: Nickname::new("ada").expect("valid nickname"),
        address: Address::new("London").expect("valid address"),
        status,
        certification_code: CertificationCode::new("code-1").expect("valid code"),
        last_login_at: None,
    }
}

fn user(id: i64, status: UserStatus) -> User {
    User::from_parts(parts(id, status))
}

fn test_app(
    users: MockUserCommand,
    users_query: MockUserQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        HttpStatePorts {
            users: Arc::new(users),
            users_query: Arc::new(users_query),
            posts: Arc::new(MockPostCommand::new()),
            posts_query: Arc::new(MockPostQuery::new()),
        },
        Url::parse(REDIRECT).expect("valid redirect url"),
    );
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(web::scope("/api").configure(configure))
}

#[actix_web::test]
async fn create_user_returns_created_pending_user() {
    let mut users = MockUserCommand::new();
    users
        .expect_create()
        .withf(|request| {
            request.email.as_ref() == "ada@example.com" && request.nickname.as_ref() == "ada"
        })
        .times(1)
        .return_once(|_| Ok(user(1, UserStatus::Pending)));
    let app = actix_test::init_service(test_app(users, MockUserQuery::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(UserCreateRequest {
            email: "ada@example.com".into(),
            nickname: "ada".into(),
            address: "London".into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["id"], 1);
    assert_eq!(value["email"], "ada@example.com");
    assert_eq!(value["nickname"], "ada");
    assert_eq!(value["status"], "PENDING");
    assert!(value["lastLoginAt"].is_null());
    assert!(value.get("address").is_none());
}

#[rstest]
#[case("", "ada", "email", "empty")]
#[case("not-an-address", "ada", "email", "invalid_format")]
#[case("ada@example.com", "  ", "nickname", "empty")]
#[actix_web::test]
async fn create_user_rejects_invalid_fields(
    #[case] email: &str,
    #[case] nickname: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut users = MockUserCommand::new();
    users.expect_create().never();
    let app = actix_test::init_service(test_app(users, MockUserQuery::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(UserCreateRequest {
            email: email.into(),
            nickname: nickname.into(),
            address: String::new(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[actix_web::test]
async fn create_user_maps_duplicate_email_to_conflict() {
    let mut users = MockUserCommand::new();
    users
        .expect_create()
        .return_once(|_| Err(Error::conflict("email already registered")));
    let app = actix_test::init_service(test_app(users, MockUserQuery::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(UserCreateRequest {
            email: "ada@example.com".into(),
            nickname: "ada".into(),
            address: String::new(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn get_user_returns_active_user() {
    let mut query = MockUserQuery::new();
    query
        .expect_get_by_id()
        .withf(|id| *id == UserId::new(1))
        .return_once(|_| Ok(user(1, UserStatus::Active)));
    let app = actix_test::init_service(test_app(MockUserCommand::new(), query)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users/1").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["status"], "ACTIVE");
    assert!(value.get("address").is_none());
}

#[actix_web::test]
async fn get_user_maps_not_found() {
    let mut query = MockUserQuery::new();
    query
        .expect_get_by_id()
        .return_once(|_| Err(Error::not_found("user 9 not found")));
    let app = actix_test::init_service(test_app(MockUserCommand::new(), query)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users/9").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "not_found");
}

#[actix_web::test]
async fn get_user_rejects_non_numeric_id() {
    let app =
        actix_test::init_service(test_app(MockUserCommand::new(), MockUserQuery::new())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users/abc").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn verify_email_redirects_on_success() {
    let mut users = MockUserCommand::new();
    users
        .expect_verify_email()
        .withf(|id, code| *id == UserId::new(1) && code.as_ref() == "code-1")
        .times(1)
        .return_once(|_, _| Ok(user(1, UserStatus::Active)));
    let app = actix_test::init_service(test_app(users, MockUserQuery::new())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/1/verify?certificationCode=code-1")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(REDIRECT)
    );
}

#[actix_web::test]
async fn verify_email_reports_code_mismatch() {
    let mut users = MockUserCommand::new();
    users.expect_verify_email().return_once(|_, _| {
        Err(Error::certification_code_not_matched(
            "certification code does not match",
        ))
    });
    let app = actix_test::init_service(test_app(users, MockUserQuery::new())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/1/verify?certificationCode=wrong")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "certification_code_not_matched");
}

#[actix_web::test]
async fn verify_email_requires_certification_code() {
    let mut users = MockUserCommand::new();
    users.expect_verify_email().never();
    let app = actix_test::init_service(test_app(users, MockUserQuery::new())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/1/verify")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn get_my_info_records_login_and_includes_address() {
    let login_at = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    let mut query = MockUserQuery::new();
    query
        .expect_get_by_email()
        .withf(|email| email.as_ref() == "ada@example.com")
        .return_once(|_| Ok(user(1, UserStatus::Active)));
    let mut users = MockUserCommand::new();
    users
        .expect_login()
        .withf(|id| *id == UserId::new(1))
        .times(1)
        .return_once(move |_| {
            Ok(User::from_parts(UserParts {
                last_login_at: Some(login_at),
                ..parts(1, UserStatus::Active)
            }))
        });
    let app = actix_test::init_service(test_app(users, query)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("EMAIL", "ada@example.com"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["address"], "London");
    assert_eq!(value["lastLoginAt"], "2024-05-01T09:30:00Z");
}

#[actix_web::test]
async fn get_my_info_requires_email_header() {
    let mut query = MockUserQuery::new();
    query.expect_get_by_email().never();
    let app = actix_test::init_service(test_app(MockUserCommand::new(), query)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users/me").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["code"], "missing_header");
}

#[actix_web::test]
async fn update_my_info_applies_supplied_fields() {
    let mut query = MockUserQuery::new();
    query
        .expect_get_by_email()
        .return_once(|_| Ok(user(1, UserStatus::Active)));
    let mut users = MockUserCommand::new();
    users
        .expect_update()
        .withf(|id, update| {
            *id == UserId::new(1)
                && update
                    .nickname
                    .as_ref()
                    .is_some_and(|nickname| nickname.as_ref() == "lovelace")
                && update.address.is_none()
        })
        .times(1)
        .return_once(|_, update| {
            let mut stored = parts(1, UserStatus::Active);
            if let Some(nickname) = update.nickname {
                stored.nickname = nickname;
            }
            if let Some(address) = update.address {
                stored.address = address;
            }
            Ok(User::from_parts(stored))
        });
    let app = actix_test::init_service(test_app(users, query)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users/me")
            .insert_header(("EMAIL", "ada@example.com"))
            .set_json(UserUpdateRequest {
                nickname: Some("lovelace".into()),
                address: None,
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["nickname"], "lovelace");
    assert_eq!(value["address"], "London");
}

#[actix_web::test]
async fn update_my_info_rejects_malformed_json() {
    let app =
        actix_test::init_service(test_app(MockUserCommand::new(), MockUserQuery::new())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users/me")
            .insert_header(("EMAIL", "ada@example.com"))
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"nickname\":")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["code"], "malformed_body");
}
