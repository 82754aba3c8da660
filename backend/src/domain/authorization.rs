//! Ownership and role checks gating every mutation.
//!
//! Services call [`authorize`] at the top of an operation, before any write
//! plan is built, so a refusal never leaves partial state behind.

use super::{Error, Role, UserId};

/// Roles allowed to run the verification workflow.
pub const VERIFIERS: &[Role] = &[Role::Admin, Role::Verifier];
/// Roles allowed to manage accounts.
pub const ADMINS: &[Role] = &[Role::Admin];

/// Authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// What the caller must hold for an operation to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<'a> {
    /// Caller must be the owner of the resource.
    Own(&'a UserId),
    /// Caller's role must be one of these.
    Role(&'a [Role]),
}

/// Check `caller` against `capability`.
///
/// # Examples
/// ```
/// use experience_backend::domain::{authorize, Caller, Capability, Role, UserId, VERIFIERS};
///
/// let caller = Caller::new(UserId::random(), Role::Verifier);
/// assert!(authorize(&caller, Capability::Role(VERIFIERS)).is_ok());
/// assert!(authorize(&caller, Capability::Own(&UserId::random())).is_err());
/// ```
pub fn authorize(caller: &Caller, capability: Capability<'_>) -> Result<(), Error> {
    match capability {
        Capability::Own(owner) if *owner == caller.id => Ok(()),
        Capability::Own(_) => Err(Error::forbidden(
            "you do not have permission to modify this resource",
        )),
        Capability::Role(roles) if roles.contains(&caller.role) => Ok(()),
        Capability::Role(_) => Err(Error::forbidden(
            "you do not have permission to perform this action",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn owner_passes_ownership_check() {
        let caller = Caller::new(UserId::random(), Role::User);
        assert!(authorize(&caller, Capability::Own(&caller.id)).is_ok());
    }

    #[rstest]
    #[case(Role::User)]
    #[case(Role::Admin)]
    fn ownership_is_not_implied_by_role(#[case] role: Role) {
        let caller = Caller::new(UserId::random(), role);
        let err = authorize(&caller, Capability::Own(&UserId::random()))
            .expect_err("non-owner must be refused");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::User, VERIFIERS, false)]
    #[case(Role::Verifier, VERIFIERS, true)]
    #[case(Role::Admin, VERIFIERS, true)]
    #[case(Role::Verifier, ADMINS, false)]
    #[case(Role::Admin, ADMINS, true)]
    fn role_membership(#[case] role: Role, #[case] roles: &[Role], #[case] allowed: bool) {
        let caller = Caller::new(UserId::random(), role);
        assert_eq!(authorize(&caller, Capability::Role(roles)).is_ok(), allowed);
    }
}
