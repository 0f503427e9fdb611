use crate::types::{Identity, Role};

/// Operations on the service listing resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a listing
    Create,
    /// Edit an existing listing
    Update,
    /// Remove an existing listing
    Delete,
    /// Browse active listings
    List,
}

/// Relationship between the caller and the targeted listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// No record is involved yet (creation, or the gate before loading)
    NotApplicable,
    /// The caller created the record
    Owner,
    /// Someone else created the record
    NotOwner,
}

impl Ownership {
    /// Derives the ownership of a record created by `created_by`.
    pub fn of(identity: &Identity, created_by: &str) -> Self {
        if identity.id == created_by {
            Ownership::Owner
        } else {
            Ownership::NotOwner
        }
    }
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The role is not allowed to perform the operation at all
    Role,
    /// The role is allowed, but not on a record owned by someone else
    NotOwner,
}

/// Outcome of an authorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed
    Allow,
    /// Reject with the given reason
    Deny(Denial),
}

impl Decision {
    /// Whether the decision allows the operation.
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Central access policy for listings.
///
/// Browsing is public. Mutations require a managing role (admin, agency, escort);
/// edits and deletes of an existing record additionally require the caller to
/// own it, unless the caller is an admin.
pub fn authorize(operation: Operation, role: &Role, ownership: Ownership) -> Decision {
    if operation == Operation::List {
        return Decision::Allow;
    }

    if !role.can_manage_listings() {
        return Decision::Deny(Denial::Role);
    }

    match (operation, ownership) {
        (Operation::Update | Operation::Delete, Ownership::NotOwner) if *role != Role::Admin => {
            Decision::Deny(Denial::NotOwner)
        }
        _ => Decision::Allow,
    }
}
