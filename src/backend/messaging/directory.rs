//! Identity & Directory
//!
//! Resolves a user id into a [`Participant`] snapshot by looking it up in
//! the student and teacher collections. A role hint decides which collection
//! is tried first; the other one is always tried as a fallback.

use std::sync::Arc;

use crate::backend::store::{Collection, Record, RecordStore, StoreResult};
use crate::shared::{Participant, Role};

/// Collection holding the users of a role
pub fn collection_for(role: Role) -> Collection {
    match role {
        Role::Student => Collection::Students,
        Role::Teacher => Collection::Teachers,
    }
}

/// Read-only view over the user collections
#[derive(Clone)]
pub struct Directory {
    records: Arc<dyn RecordStore>,
}

impl Directory {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Resolve a user id, trying `hint` first when given
    ///
    /// Returns `Ok(None)` when neither collection holds the id.
    pub async fn resolve(&self, user_id: &str, hint: Option<Role>) -> StoreResult<Option<Participant>> {
        let order = match hint.unwrap_or(Role::Student) {
            Role::Student => [Role::Student, Role::Teacher],
            Role::Teacher => [Role::Teacher, Role::Student],
        };

        for role in order {
            if let Some(record) = self.records.get(collection_for(role), user_id).await? {
                return Ok(Some(participant_from(&record, role)));
            }
        }
        Ok(None)
    }
}

fn participant_from(record: &Record, role: Role) -> Participant {
    Participant::new(
        record.id.clone(),
        record.str_field("name").unwrap_or_default(),
        role,
    )
}
