/**
 * User Lookup and Password Handling
 *
 * Students and teachers are ordinary records of their collections. This
 * module finds them by email for login and keeps their `password` field
 * bcrypt-hashed.
 */

use bcrypt::{hash, verify, DEFAULT_COST};
use serde_json::{Map, Value};

use crate::backend::messaging::directory::collection_for;
use crate::backend::store::{Filter, Record, RecordStore, Sort, StoreResult};
use crate::shared::{Participant, Role};

/// Roles in the order login searches them
pub const LOGIN_ORDER: [Role; 2] = [Role::Student, Role::Teacher];

/// A user record together with the role of its collection
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub record: Record,
    pub role: Role,
}

impl UserRecord {
    pub fn name(&self) -> &str {
        self.record.str_field("name").unwrap_or_default()
    }

    pub fn participant(&self) -> Participant {
        Participant::new(self.record.id.clone(), self.name(), self.role)
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.record.str_field("password")
    }
}

/// Find a user by email, students first
pub async fn find_user_by_email(
    records: &dyn RecordStore,
    email: &str,
) -> StoreResult<Option<UserRecord>> {
    for role in LOGIN_ORDER {
        let found = records
            .find(collection_for(role), Filter::eq("email", email), Sort::default())
            .await?;
        if let Some(record) = found.into_iter().next() {
            return Ok(Some(UserRecord { record, role }));
        }
    }
    Ok(None)
}

/// Find a user by id in either collection
pub async fn find_user_by_id(records: &dyn RecordStore, id: &str) -> StoreResult<Option<UserRecord>> {
    for role in LOGIN_ORDER {
        if let Some(record) = records.get(collection_for(role), id).await? {
            return Ok(Some(UserRecord { record, role }));
        }
    }
    Ok(None)
}

/// Hash a plain-text password
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a plain-text password against a stored hash
///
/// A stored value that is not a bcrypt hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    verify(password, stored_hash).unwrap_or(false)
}

/// Replace a plain-text `password` field of a user body with its hash
pub fn hash_password_field(body: &mut Map<String, Value>) -> Result<(), bcrypt::BcryptError> {
    if let Some(Value::String(plain)) = body.get("password") {
        let hashed = hash_password(plain)?;
        body.insert("password".to_string(), Value::String(hashed));
    }
    Ok(())
}
