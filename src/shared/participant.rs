//! Participant Data Structure
//!
//! A participant is a denormalized snapshot of a user at the time it was
//! referenced. Threads and messages keep their own copy, so renaming or
//! deleting the student/teacher record later does not rewrite history.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SharedError;

/// The two kinds of users that can take part in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    /// The role on the other side of a student/teacher conversation
    pub fn complement(self) -> Self {
        match self {
            Role::Student => Role::Teacher,
            Role::Teacher => Role::Student,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(SharedError::validation(
                "role",
                format!("unknown role '{}', expected 'student' or 'teacher'", other),
            )),
        }
    }
}

/// Snapshot of a user's id, display name and role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    /// Opaque user identifier (student or teacher record id)
    pub id: String,
    /// Display name at reference time
    pub name: String,
    /// Which directory the user was resolved from
    pub role: Role,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}
