use daybook_core::OwnerId;

/// Authenticated owner for a request.
///
/// Inserted by the auth middleware and required by every `/api` route; all
/// store access is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerContext {
    owner_id: OwnerId,
}

impl OwnerContext {
    pub fn new(owner_id: OwnerId) -> Self {
        Self { owner_id }
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}
