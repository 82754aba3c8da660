//! Tests for administrator account management.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::ports::{RosterFailure, RosterImportReport};
use crate::domain::{Batch, Error, Page, RegNo, Role, User};
use crate::inbound::http::test_utils::{MockPorts, init_api, json_response, login_cookie};
use crate::test_support::sample_user;

#[fixture]
fn admin() -> User {
    sample_user(Role::Admin)
}

#[rstest]
#[actix_web::test]
async fn list_pages_accounts(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin.clone());
    let listed = admin.clone();
    ports
        .user_admin
        .expect_list_users()
        .withf(|caller, page| caller.role == Role::Admin && page.limit() == 2)
        .times(1)
        .returning(move |_, page| Ok(Page::new(vec![listed.clone()], page, 3)));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users?limit=2")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["results"][0]["regNo"], admin.reg_no.to_string());
}

#[rstest]
#[actix_web::test]
async fn non_admins_are_forbidden_by_the_service() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(sample_user(Role::Verifier));
    ports
        .user_admin
        .expect_list_users()
        .returning(|_, _| Err(Error::forbidden("you do not have permission")));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn create_parses_every_field(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin.clone());
    ports
        .user_admin
        .expect_create_user()
        .withf(|_, user| {
            user.reg_no.as_ref() == "2020ugec042"
                && user.batch.year() == 2024
                && user.role == Role::Verifier
                && user.email.as_ref() == "grace@example.com"
        })
        .times(1)
        .returning(move |_, _| Ok(sample_user(Role::Verifier)));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .cookie(cookie)
            .set_json(json!({
                "name": "Grace Hopper",
                "regNo": "2020UGEC042",
                "batch": 2024,
                "email": "grace@example.com",
                "role": "verifier"
            }))
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "verifier");
}

#[rstest]
#[case(json!({ "regNo": "2020ugec042", "batch": 2024, "email": "g@example.com" }), "name")]
#[case(json!({ "name": "Grace Hopper", "regNo": "2020ugec042", "batch": 1800, "email": "g@example.com" }), "batch")]
#[case(json!({ "name": "Grace Hopper", "regNo": "2020ugec042", "batch": 2024, "email": "nope" }), "email")]
#[case(json!({ "name": "Grace Hopper", "regNo": "2020ugec042", "batch": 2024, "email": "g@example.com", "role": "root" }), "role")]
#[actix_web::test]
async fn create_rejects_invalid_fields(
    admin: User,
    #[case] payload: serde_json::Value,
    #[case] field: &str,
) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin);
    ports.user_admin.expect_create_user().times(0);
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn get_normalises_the_registration_number(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin.clone());
    let found = admin.clone();
    ports
        .user_admin
        .expect_get_user()
        .withf(|_, reg_no| reg_no.as_ref() == "2019ugcs001")
        .times(1)
        .returning(move |_, _| Ok(found.clone()));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/2019UGCS001")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn update_never_accepts_a_password(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin);
    ports.user_admin.expect_update_user().times(0);
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users/2019ugcs001")
            .cookie(cookie)
            .set_json(json!({ "password": "sneaky-password" }))
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn update_forwards_partial_changes(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin.clone());
    let updated = admin.clone();
    ports
        .user_admin
        .expect_update_user()
        .withf(|_, reg_no, update| {
            reg_no.as_ref() == "2019ugcs001"
                && update.active == Some(false)
                && update.role == Some(Role::Verifier)
                && update.name.is_none()
        })
        .times(1)
        .returning(move |_, _, _| Ok(updated.clone()));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users/2019ugcs001")
            .cookie(cookie)
            .set_json(json!({ "active": false, "role": "verifier" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_no_content(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin);
    let reg_no = RegNo::new("2019ugcs001").expect("valid reg no");
    ports
        .user_admin
        .expect_delete_user()
        .withf(move |_, candidate| *candidate == reg_no)
        .times(1)
        .returning(|_, _| Ok(()));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/users/2019ugcs001")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn roster_import_reports_per_entry_failures(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin);
    let batch = Batch::new(2024).expect("valid batch");
    ports
        .user_admin
        .expect_import_roster()
        .withf(move |_, year, entries| *year == batch && entries.len() == 2)
        .times(1)
        .returning(|_, _, _| {
            Ok(RosterImportReport {
                total: 2,
                created: 1,
                failed: 1,
                failures: vec![RosterFailure {
                    reg_no: "bad".to_owned(),
                    reason: "invalid registration number".to_owned(),
                }],
            })
        });
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/batch/2024")
            .cookie(cookie)
            .set_json(json!([
                { "name": "Grace Hopper", "regNo": "2020ugec042" },
                { "name": "Bad Entry", "regNo": "bad" }
            ]))
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], 1);
    assert_eq!(body["failures"][0]["regNo"], "bad");
}

#[rstest]
#[case("/api/v1/users/batch/1900")]
#[case("/api/v1/users/batch/twenty")]
#[actix_web::test]
async fn roster_import_validates_the_year(admin: User, #[case] uri: &str) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin);
    ports.user_admin.expect_import_roster().times(0);
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(uri)
            .cookie(cookie)
            .set_json(json!([]))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn account_routes_win_over_the_reg_no_segment(admin: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(admin);
    ports.user_admin.expect_get_user().times(0);
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/loginStatus")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].is_object());
}
