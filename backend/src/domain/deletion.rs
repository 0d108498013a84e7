//! Row counts reported by cascading deletes, and platform-wide counters.

use serde::Serialize;
use utoipa::ToSchema;

/// Number of rows removed by one cascading delete, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletionSummary {
    pub users: u64,
    pub pets: u64,
    pub posts: u64,
    pub comments: u64,
    pub replies: u64,
    pub likes: u64,
    pub tasks: u64,
    pub medical_records: u64,
    pub vaccination_records: u64,
    pub shops: u64,
    pub promotions: u64,
    pub applications: u64,
}

impl DeletionSummary {
    /// Total rows removed.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.users
            + self.pets
            + self.posts
            + self.comments
            + self.replies
            + self.likes
            + self.tasks
            + self.medical_records
            + self.vaccination_records
            + self.shops
            + self.promotions
            + self.applications
    }
}

impl std::ops::AddAssign for DeletionSummary {
    fn add_assign(&mut self, other: Self) {
        self.users += other.users;
        self.pets += other.pets;
        self.posts += other.posts;
        self.comments += other.comments;
        self.replies += other.replies;
        self.likes += other.likes;
        self.tasks += other.tasks;
        self.medical_records += other.medical_records;
        self.vaccination_records += other.vaccination_records;
        self.shops += other.shops;
        self.promotions += other.promotions;
        self.applications += other.applications;
    }
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub users: u64,
    pub pets: u64,
    pub posts: u64,
    pub comments: u64,
    pub shops: u64,
    pub pending_applications: u64,
}
