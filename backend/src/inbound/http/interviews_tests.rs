//! Tests for the interview endpoints.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::{
    Error, InterviewListing, Page, PageRequest, Role, User, VerificationStatus,
};
use crate::inbound::http::test_utils::{MockPorts, init_api, json_response, login_cookie};
use crate::test_support::{sample_interview, sample_user, sample_view};

#[fixture]
fn owner() -> User {
    sample_user(Role::User)
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_view(owner: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(owner.clone());
    let owner_id = owner.id;
    ports
        .experiences
        .expect_create_interview()
        .withf(move |request| {
            request.caller.id == owner_id
                && request.draft.company.as_ref() == "Acme"
                && request.draft.rounds.len() == 1
        })
        .times(1)
        .returning(move |request| {
            Ok(sample_view(&sample_interview(
                request.caller.id,
                VerificationStatus::NotVerified,
            )))
        });
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/interviews")
            .cookie(cookie)
            .set_json(json!({
                "company": "Acme",
                "rounds": [{ "name": "OA", "type": "oa" }]
            }))
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["company"], "Acme");
    assert_eq!(body["verification"]["status"], "not-verified");
}

#[rstest]
#[actix_web::test]
async fn create_requires_a_session() {
    let mut ports = MockPorts::default();
    ports.experiences.expect_create_interview().times(0);
    let app = init_api(ports).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/interviews")
            .set_json(json!({ "company": "Acme" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn invalid_body_never_reaches_the_port(owner: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(owner);
    ports.experiences.expect_create_interview().times(0);
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/interviews")
            .cookie(cookie)
            .set_json(json!({ "company": "A" }))
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "company");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_error_envelope(owner: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(owner);
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/interviews")
            .cookie(cookie)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn public_listing_passes_filter_and_paging(owner: User) {
    let mut ports = MockPorts::default();
    let summary = owner.summary();
    let owner_id = owner.id;
    ports
        .experience_query
        .expect_list_accepted()
        .withf(|filter, page| {
            filter.company.as_deref() == Some("acme") && page.page() == 2 && page.limit() == 1
        })
        .returning(move |_, page| {
            let listing = InterviewListing {
                interview: sample_interview(owner_id, VerificationStatus::Accepted),
                interviewee: Some(summary.clone()),
            };
            Ok(Page::new(vec![listing], page, 3))
        });
    let app = init_api(ports).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/interviews?company=acme&page=2&limit=1")
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["results"][0]["interviewee"]["regNo"], owner.reg_no.to_string());
}

#[rstest]
#[case("/api/v1/interviews?limit=500")]
#[case("/api/v1/interviews?status=hired")]
#[case("/api/v1/interviews?page=abc")]
#[actix_web::test]
async fn bad_listing_parameters_are_rejected(#[case] uri: &str) {
    let mut ports = MockPorts::default();
    ports.experience_query.expect_list_accepted().times(0);
    let app = init_api(ports).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn mine_is_routed_before_the_id_segment(owner: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(owner.clone());
    ports
        .experience_query
        .expect_list_owned()
        .with(eq(owner.id), eq(PageRequest::default()))
        .times(1)
        .returning(|_, page| Ok(Page::new(Vec::new(), page, 0)));
    ports.experience_query.expect_get_interview().times(0);
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/interviews/mine")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["totalPages"], 0);
}

#[rstest]
#[actix_web::test]
async fn get_maps_missing_interview_to_404() {
    let mut ports = MockPorts::default();
    ports
        .experience_query
        .expect_get_interview()
        .returning(|_| Err(Error::not_found("interview not found")));
    let app = init_api(ports).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/interviews/{}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn get_rejects_non_uuid_ids() {
    let mut ports = MockPorts::default();
    ports.experience_query.expect_get_interview().times(0);
    let app = init_api(ports).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/interviews/not-an-id")
            .to_request(),
    )
    .await;
    let (status, body) = json_response(res).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[rstest]
#[actix_web::test]
async fn patch_surfaces_forbidden_from_the_port(owner: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(owner);
    ports
        .experiences
        .expect_update_interview()
        .withf(|request| request.edit.company.as_ref().map(AsRef::as_ref) == Some("Globex"))
        .returning(|_| Err(Error::forbidden("accepted interviews can no longer be edited")));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/interviews/{}", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .set_json(json!({ "company": "Globex" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_no_content(owner: User) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(owner.clone());
    let id = uuid::Uuid::new_v4();
    let owner_id = owner.id;
    ports
        .experiences
        .expect_delete_interview()
        .withf(move |caller, interview_id| caller.id == owner_id && *interview_id == id)
        .times(1)
        .returning(|_, _| Ok(()));
    let app = init_api(ports).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/interviews/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
