//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod admin_users;
pub mod auth;
pub mod error;
pub mod experience_dto;
pub mod health;
pub mod interviews;
pub mod posters;
pub mod questions;
pub mod rounds;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod verification;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint plus the extractor configuration that
/// keeps framework errors in the API envelope.
///
/// Literal segments (`mine`, `verificationQueue`, `loginStatus`, ...) are
/// registered before the `{id}` and `{regNo}` routes they would otherwise
/// be captured by.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .app_data(web::PayloadConfig::new(posters::MAX_PHOTO_BYTES))
        .service(interviews::create_interview)
        .service(interviews::list_interviews)
        .service(interviews::my_interviews)
        .service(verification::verification_queue)
        .service(interviews::get_interview)
        .service(interviews::update_interview)
        .service(interviews::delete_interview)
        .service(verification::accept_interview)
        .service(verification::reject_interview)
        .service(posters::generate_poster)
        .service(posters::download_poster)
        .service(rounds::create_round)
        .service(rounds::update_round)
        .service(rounds::delete_round)
        .service(questions::create_question)
        .service(questions::update_question)
        .service(questions::delete_question)
        .service(accounts::signup)
        .service(accounts::forgot_password)
        .service(accounts::reset_password)
        .service(accounts::login)
        .service(accounts::login_status)
        .service(accounts::logout)
        .service(accounts::my_interviews)
        .service(accounts::update_my_password)
        .service(admin_users::list_users)
        .service(admin_users::create_user)
        .service(admin_users::import_roster)
        .service(admin_users::get_user)
        .service(admin_users::update_user)
        .service(admin_users::delete_user);
}
