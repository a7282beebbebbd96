//! Caller identity and the edit-access decision.
//!
//! Identity itself comes from the external auth service; this crate only
//! models what the content core needs: who the caller is, their role, and
//! whether they may mutate a course. The decision is computed here, outside
//! the tree, and passed into the editing session.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Professor,
    Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user: UserId,
    pub role: Role,
}

/// Whether a caller may mutate a course's content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAccess {
    ReadWrite,
    ReadOnly,
}

impl EditAccess {
    /// Professors edit their courses; students only read them.
    pub fn for_caller(caller: &Caller) -> Self {
        match caller.role {
            Role::Professor => EditAccess::ReadWrite,
            Role::Student => EditAccess::ReadOnly,
        }
    }

    pub fn may_mutate(self) -> bool {
        matches!(self, EditAccess::ReadWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_lowercase_wire_names() {
        let role: Role = serde_json::from_str(r#""professor""#).unwrap();
        assert_eq!(role, Role::Professor);
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), r#""student""#);
    }

    #[test]
    fn professors_may_mutate() {
        let caller = Caller {
            user: UserId::from("prof-1"),
            role: Role::Professor,
        };
        assert!(EditAccess::for_caller(&caller).may_mutate());
    }

    #[test]
    fn students_may_not_mutate() {
        let caller = Caller {
            user: UserId::from("stu-1"),
            role: Role::Student,
        };
        assert!(!EditAccess::for_caller(&caller).may_mutate());
    }
}
