use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Membership type code (the role a user holds in an org).
///
/// Codes are carried as opaque strings so rows written with a code this crate
/// does not know about still resolve; unknown codes simply lose every
/// precedence comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

/// Precedence ranks used to pick one membership when several qualify.
///
/// Lower wins. `MEMBER` is the legacy code and ranks with `COORDINATOR`.
pub const PRECEDENCE: &[(&str, u8)] = &[
    ("OWNER", 1),
    ("ADMIN", 2),
    ("COORDINATOR", 3),
    ("MEMBER", 3),
    ("USER", 4),
];

/// Rank assigned to codes missing from [`PRECEDENCE`].
pub const UNRANKED: u8 = 5;

impl Role {
    pub const OWNER: Role = Role(Cow::Borrowed("OWNER"));
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));
    pub const COORDINATOR: Role = Role(Cow::Borrowed("COORDINATOR"));
    pub const USER: Role = Role(Cow::Borrowed("USER"));
    pub const MEMBER: Role = Role(Cow::Borrowed("MEMBER"));
    /// Pseudo-role for staff principals; never stored on a membership.
    pub const STAFF: Role = Role(Cow::Borrowed("STAFF"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn precedence_rank(&self) -> u8 {
        PRECEDENCE
            .iter()
            .find(|(code, _)| *code == self.as_str())
            .map(|(_, rank)| *rank)
            .unwrap_or(UNRANKED)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Render the precedence table as a SQL `CASE` over `column`.
///
/// Stores that order rows in the database use this so the SQL ordering can't
/// drift from [`Role::precedence_rank`].
pub fn precedence_case_sql(column: &str) -> String {
    let mut sql = format!("CASE {column}");
    for (code, rank) in PRECEDENCE {
        sql.push_str(&format!(" WHEN '{code}' THEN {rank}"));
    }
    sql.push_str(&format!(" ELSE {UNRANKED} END"));
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_beats_admin_beats_coordinator_beats_user() {
        let ranks: Vec<u8> = [Role::OWNER, Role::ADMIN, Role::COORDINATOR, Role::USER]
            .iter()
            .map(Role::precedence_rank)
            .collect();
        assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]), "{ranks:?}");
    }

    #[test]
    fn legacy_member_ranks_with_coordinator() {
        assert_eq!(Role::MEMBER.precedence_rank(), Role::COORDINATOR.precedence_rank());
    }

    #[test]
    fn unknown_codes_rank_last() {
        let role = Role::new("AUDITOR");
        assert_eq!(role.precedence_rank(), UNRANKED);
        assert!(Role::USER.precedence_rank() < role.precedence_rank());
    }

    #[test]
    fn case_sql_lists_every_rank() {
        let sql = precedence_case_sql("org_membership");
        assert!(sql.starts_with("CASE org_membership"));
        assert!(sql.contains("WHEN 'OWNER' THEN 1"));
        assert!(sql.contains("WHEN 'MEMBER' THEN 3"));
        assert!(sql.ends_with("ELSE 5 END"));
    }
}
