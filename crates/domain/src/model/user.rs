use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user; the id is assigned by the store on insert.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::UNASSIGNED,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let user = User::new("Jane", "Smith", "jane.smith@example.com");
        assert_eq!(user.full_name(), "Jane Smith");
    }
}
