//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1` plus the health
//! probes, the error envelope schemas and the session cookie scheme. Swagger
//! UI serves it in debug builds and `cargo run --bin openapi-dump` prints it
//! for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::accounts::{
    LoginBody, LoginStatusResponse, MessageResponse, RegNoBody, ResetPasswordBody,
    UpdatePasswordBody, UserResponse,
};
use crate::inbound::http::admin_users::{
    CreateUserBody, RosterEntryBody, RosterFailureResponse, RosterImportResponse,
    UpdateUserBody, UserPageResponse,
};
use crate::inbound::http::experience_dto::{
    CreateInterviewBody, CreateQuestionBody, CreateRoundBody, InterviewPageResponse,
    InterviewResponse, InterviewSummaryResponse, IntervieweeResponse, QuestionBody,
    QuestionResponse, RejectBody, RoundBody, RoundResponse, UpdateInterviewBody,
    UpdateRoundBody, VerificationResponse,
};
use crate::inbound::http::posters::PosterLinkResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/users/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Placement experience API",
        description = "Students share interview experiences; verifiers publish them.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::interviews::create_interview,
        crate::inbound::http::interviews::list_interviews,
        crate::inbound::http::interviews::my_interviews,
        crate::inbound::http::interviews::get_interview,
        crate::inbound::http::interviews::update_interview,
        crate::inbound::http::interviews::delete_interview,
        crate::inbound::http::verification::verification_queue,
        crate::inbound::http::verification::accept_interview,
        crate::inbound::http::verification::reject_interview,
        crate::inbound::http::posters::generate_poster,
        crate::inbound::http::posters::download_poster,
        crate::inbound::http::rounds::create_round,
        crate::inbound::http::rounds::update_round,
        crate::inbound::http::rounds::delete_round,
        crate::inbound::http::questions::create_question,
        crate::inbound::http::questions::update_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::forgot_password,
        crate::inbound::http::accounts::reset_password,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::login_status,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::my_interviews,
        crate::inbound::http::accounts::update_my_password,
        crate::inbound::http::admin_users::list_users,
        crate::inbound::http::admin_users::create_user,
        crate::inbound::http::admin_users::get_user,
        crate::inbound::http::admin_users::update_user,
        crate::inbound::http::admin_users::delete_user,
        crate::inbound::http::admin_users::import_roster,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateInterviewBody,
        UpdateInterviewBody,
        RoundBody,
        QuestionBody,
        CreateRoundBody,
        UpdateRoundBody,
        CreateQuestionBody,
        RejectBody,
        InterviewResponse,
        InterviewSummaryResponse,
        InterviewPageResponse,
        IntervieweeResponse,
        VerificationResponse,
        RoundResponse,
        QuestionResponse,
        PosterLinkResponse,
        RegNoBody,
        LoginBody,
        ResetPasswordBody,
        UpdatePasswordBody,
        MessageResponse,
        UserResponse,
        LoginStatusResponse,
        CreateUserBody,
        UpdateUserBody,
        RosterEntryBody,
        UserPageResponse,
        RosterFailureResponse,
        RosterImportResponse,
    )),
    tags(
        (name = "interviews", description = "Interview experiences and their aggregate"),
        (name = "verification", description = "Verifier queue and decisions"),
        (name = "posters", description = "Shareable posters for verified interviews"),
        (name = "rounds", description = "Rounds nested under an interview"),
        (name = "questions", description = "Questions nested under a round"),
        (name = "accounts", description = "Sign-up, login and password management"),
        (name = "users", description = "Administrator user management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_uses_camel_case_envelope() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/api/v1/interviews")]
    #[case("/api/v1/interviews/verificationQueue")]
    #[case("/api/v1/interviews/{id}/accepted")]
    #[case("/api/v1/interviews/{id}/poster")]
    #[case("/api/v1/users/login")]
    #[case("/api/v1/users/batch/{year}")]
    #[case("/api/v1/users/{regNo}")]
    #[case("/health/ready")]
    fn document_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
