//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, ExperienceCommand, ExperienceQuery, PosterCommand, UserAdminCommand,
    VerificationCommand,
};

/// Driving ports used by the handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub experiences: Arc<dyn ExperienceCommand>,
    pub experience_query: Arc<dyn ExperienceQuery>,
    pub verification: Arc<dyn VerificationCommand>,
    pub posters: Arc<dyn PosterCommand>,
    pub user_admin: Arc<dyn UserAdminCommand>,
}
