//! Status codes for orgs, memberships and product subscriptions.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Org status code.
///
/// Opaque like [`crate::Role`]: permission rows are keyed by the raw code, so
/// statuses added later need no code change here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgStatus(Cow<'static, str>);

impl OrgStatus {
    pub const ACTIVE: OrgStatus = OrgStatus(Cow::Borrowed("ACTIVE"));
    pub const PENDING_ACTIVATION: OrgStatus = OrgStatus(Cow::Borrowed("PENDING_ACTIVATION"));
    pub const PENDING_STAFF_REVIEW: OrgStatus = OrgStatus(Cow::Borrowed("PENDING_STAFF_REVIEW"));
    pub const INACTIVE: OrgStatus = OrgStatus(Cow::Borrowed("INACTIVE"));
    pub const REJECTED: OrgStatus = OrgStatus(Cow::Borrowed("REJECTED"));
    pub const NSF_SUSPENDED: OrgStatus = OrgStatus(Cow::Borrowed("NSF_SUSPENDED"));
    pub const SUSPENDED: OrgStatus = OrgStatus(Cow::Borrowed("SUSPENDED"));

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrgStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrgStatus {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Lifecycle of a membership. Only `Active` memberships authorize anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    #[default]
    Active,
    PendingApproval,
    Inactive,
    Rejected,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "ACTIVE",
            MembershipStatus::PendingApproval => "PENDING_APPROVAL",
            MembershipStatus::Inactive => "INACTIVE",
            MembershipStatus::Rejected => "REJECTED",
        }
    }
}

impl core::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a product subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    PendingStaffReview,
    Rejected,
    Inactive,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::PendingStaffReview => "PENDING_STAFF_REVIEW",
            SubscriptionStatus::Rejected => "REJECTED",
            SubscriptionStatus::Inactive => "INACTIVE",
        }
    }
}

impl core::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
