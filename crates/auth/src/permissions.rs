use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{OrgStatus, Role};

/// Permitted action identifier (e.g. "make-payment").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// One row of the permission matrix.
///
/// `org_status == None` applies whatever the org's status is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub membership_type: Role,
    pub org_status: Option<OrgStatus>,
    pub action: Permission,
}

impl PermissionRule {
    pub fn new(
        membership_type: Role,
        org_status: Option<OrgStatus>,
        action: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            membership_type,
            org_status,
            action: Permission::new(action),
        }
    }

    pub fn applies_to(&self, role: &Role, org_status: &OrgStatus) -> bool {
        &self.membership_type == role
            && self.org_status.as_ref().is_none_or(|status| status == org_status)
    }
}

/// Static (role, org status, action) lookup.
///
/// Rows are additive: a status-specific row never hides the status-agnostic
/// rows for the same role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTable {
    rules: Vec<PermissionRule>,
}

impl PermissionTable {
    pub fn new(rules: Vec<PermissionRule>) -> Self {
        Self { rules }
    }

    /// Built-in seed, identical to the rows inserted by the SQL schema.
    pub fn seed() -> Self {
        let mut rules = Vec::new();
        let any = None;
        let nsf = Some(OrgStatus::NSF_SUSPENDED);

        for role in [Role::OWNER, Role::ADMIN] {
            for action in MANAGER_ACTIONS {
                rules.push(PermissionRule::new(role.clone(), any.clone(), action));
            }
            rules.push(PermissionRule::new(role, nsf.clone(), "transaction_history"));
        }
        for action in ["change-account-info", "deactivate-account"] {
            rules.push(PermissionRule::new(Role::OWNER, any.clone(), action));
        }
        for action in ["view", "edit", "invite-members", "view-statements"] {
            rules.push(PermissionRule::new(Role::COORDINATOR, any.clone(), action));
        }
        rules.push(PermissionRule::new(Role::COORDINATOR, nsf, "view-statements"));
        for role in [Role::USER, Role::MEMBER] {
            rules.push(PermissionRule::new(role, any.clone(), "view"));
        }
        for action in ["view", "view-statements", "transaction_history"] {
            rules.push(PermissionRule::new(Role::STAFF, any.clone(), action));
        }

        Self { rules }
    }

    pub fn rules(&self) -> &[PermissionRule] {
        &self.rules
    }

    /// The rows for any of `roles`.
    pub fn restricted_to(&self, roles: &[Role]) -> Self {
        Self {
            rules: self
                .rules
                .iter()
                .filter(|rule| roles.contains(&rule.membership_type))
                .cloned()
                .collect(),
        }
    }

    /// Append a row. The table only grows.
    pub fn push(&mut self, rule: PermissionRule) {
        self.rules.push(rule);
    }

    /// Actions for `role` in an org with `org_status`: the union of the
    /// status-agnostic rows and the rows for that exact status, deduplicated
    /// and sorted.
    pub fn actions_for(&self, role: &Role, org_status: &OrgStatus) -> Vec<Permission> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(role, org_status))
            .map(|rule| rule.action.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

const MANAGER_ACTIONS: [&str; 9] = [
    "view",
    "edit",
    "make-payment",
    "generate-invoice",
    "invite-members",
    "change-role",
    "remove-member",
    "view-statements",
    "manage-statements",
];
