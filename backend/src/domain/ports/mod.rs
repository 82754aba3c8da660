//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`ExperienceStore`, `UserRepository`, `Notifier`,
//! `PasswordHasher`, `PosterRenderer`, `PosterStore`) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented
//! by the domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod experience_command;
mod experience_query;
mod experience_store;
mod notifier;
mod password_hasher;
mod poster;
mod poster_command;
mod user_admin_command;
mod user_repository;
mod verification_command;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{
    AccountCommand, ResetPasswordRequest, SessionGrant, UpdatePasswordRequest,
};
#[cfg(test)]
pub use experience_command::MockExperienceCommand;
pub use experience_command::{
    CreateInterviewRequest, CreateQuestionRequest, CreateRoundRequest, ExperienceCommand,
    UpdateInterviewRequest, UpdateQuestionRequest, UpdateRoundRequest,
};
#[cfg(test)]
pub use experience_query::MockExperienceQuery;
pub use experience_query::ExperienceQuery;
#[cfg(test)]
pub use experience_store::MockExperienceStore;
pub use experience_store::{ExperienceStore, ExperienceStoreError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notification, Notifier, NotifierError, Recipient};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use poster::{MockPosterRenderer, MockPosterStore};
pub use poster::{
    PosterContent, PosterError, PosterPhoto, PosterRenderer, PosterStore, RenderedPoster,
};
#[cfg(test)]
pub use poster_command::MockPosterCommand;
pub use poster_command::{
    GeneratePosterRequest, PosterCommand, PosterLink, poster_download_path,
};
#[cfg(test)]
pub use user_admin_command::MockUserAdminCommand;
pub use user_admin_command::{
    NewUser, RosterEntry, RosterFailure, RosterImportReport, UserAdminCommand, UserUpdate,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use verification_command::MockVerificationCommand;
pub use verification_command::{RejectInterviewRequest, VerificationCommand};
