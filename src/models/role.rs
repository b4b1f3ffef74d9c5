//! Organisational roles. A lower `level` is more privileged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const ADMINISTRATOR: &str = "Administrator";
pub const SENIOR_VP: &str = "Senior VP";
pub const VP: &str = "VP";
pub const OFFICER: &str = "Officer";
pub const EMPLOYEE: &str = "Employee";

/// Level assigned to role names outside the known ladder.
pub const UNKNOWN_LEVEL: i32 = 6;

/// Canonical level for a role name, used where only the name is stored
/// (document access levels, chat channel requirements).
pub fn level_for_name(name: &str) -> i32 {
    match name {
        ADMINISTRATOR => 1,
        SENIOR_VP => 2,
        VP => 3,
        OFFICER => 4,
        EMPLOYEE => 5,
        _ => UNKNOWN_LEVEL,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub level: i32,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 100))]
    pub level: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub level: Option<i32>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_ordered_by_privilege() {
        assert!(level_for_name(ADMINISTRATOR) < level_for_name(SENIOR_VP));
        assert!(level_for_name(SENIOR_VP) < level_for_name(VP));
        assert!(level_for_name(VP) < level_for_name(OFFICER));
        assert!(level_for_name(OFFICER) < level_for_name(EMPLOYEE));
    }

    #[test]
    fn unknown_role_ranks_last() {
        assert_eq!(level_for_name("Intern"), UNKNOWN_LEVEL);
        assert_eq!(level_for_name(""), UNKNOWN_LEVEL);
    }

    #[test]
    fn create_role_rejects_empty_name() {
        let input = CreateRole {
            name: String::new(),
            level: 3,
            description: None,
        };
        assert!(input.validate().is_err());
    }
}
