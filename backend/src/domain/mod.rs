//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, the write plans that keep the experience aggregate consistent,
//! and the services that implement the driving ports.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User and its fields: student accounts.
//! - Interview / Round / Question: the experience aggregate.
//! - WritePlan / StoreOp: unit-of-work plans committed by the store.
//! - authorize / Capability: the authorization gate.

pub mod account_service;
pub mod auth;
pub mod authorization;
pub mod error;
pub mod experience;
pub mod experience_service;
pub mod paging;
pub mod ports;
pub mod poster_service;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;
pub mod verification_service;
pub mod write_plan;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, NewPassword, PASSWORD_MIN_LEN,
    PasswordValidationError, ResetToken, ResetTokenDigest, reset_token_ttl,
};
pub use self::authorization::{ADMINS, Caller, Capability, VERIFIERS, authorize};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::experience::{
    CompanyName, Compensation, ExperienceValidationError, Interview, InterviewChanges,
    InterviewDraft, InterviewEdit, InterviewFilter, InterviewListQuery, InterviewListing,
    InterviewStatus, InterviewView, ListScope, Offer, Question, QuestionChanges,
    QuestionDescription, QuestionDraft, QuestionLink, QuestionTitle, Round, RoundChanges,
    RoundDraft, RoundName, RoundNote, RoundType, RoundView, Verification, VerificationStatus,
};
pub use self::experience_service::ExperienceService;
pub use self::paging::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, PageRequest, PageRequestError,
};
pub use self::poster_service::PosterService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Batch, Email, RegNo, Role, User, UserId, UserName, UserSummary, UserValidationError,
};
pub use self::user_admin_service::UserAdminService;
pub use self::verification_service::VerificationService;
pub use self::write_plan::{
    AWAITING_DECISION, EDITABLE, PROPAGATION_RULES, Propagation, QuestionSelection,
    RoundSelection, StoreOp, WritePlan,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use experience_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
