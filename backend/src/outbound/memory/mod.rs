//! In-process implementation of every repository port.
//!
//! `MemoryStore` keeps all tables behind one mutex so each port call, cascades
//! included, observes and leaves a consistent snapshot. It backs debug runs
//! without `DATABASE_URL` and the HTTP-level tests.

mod pets;
mod posts;
mod shops;
mod tasks;
mod users;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::domain::{
    ApplicationId, Comment, CommentId, DeletionSummary, MedicalRecord, Pet, PetId, Post, PostId,
    PromotionId, PromotionalPost, RecordId, Reply, ReplyId, Shop, ShopApplication, ShopId, Task,
    TaskId, User, UserId, VaccinationRecord,
};

/// Shared in-memory database.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, Account>,
    pets: HashMap<PetId, Pet>,
    medical: HashMap<RecordId, MedicalRecord>,
    vaccinations: HashMap<RecordId, VaccinationRecord>,
    posts: HashMap<PostId, Post>,
    likes: HashMap<(PostId, UserId), DateTime<Utc>>,
    comments: HashMap<CommentId, Comment>,
    replies: HashMap<ReplyId, Reply>,
    applications: HashMap<ApplicationId, ShopApplication>,
    shops: HashMap<ShopId, Shop>,
    promotions: HashMap<PromotionId, PromotionalPost>,
    tasks: HashMap<TaskId, Task>,
}

struct Account {
    user: User,
    password_hash: String,
}

/// A row that a new or updated row references.
#[derive(Clone, Copy, Debug)]
enum Parent {
    User(UserId),
    Pet(PetId),
    Post(PostId),
    Comment(CommentId),
    Shop(ShopId),
}

impl State {
    /// Fail like a foreign key constraint when any referenced row is gone.
    fn require_parents(&self, parents: &[Parent]) -> Result<(), String> {
        for parent in parents {
            let (exists, label) = match parent {
                Parent::User(id) => (self.users.contains_key(id), format!("user {id}")),
                Parent::Pet(id) => (self.pets.contains_key(id), format!("pet {id}")),
                Parent::Post(id) => (self.posts.contains_key(id), format!("post {id}")),
                Parent::Comment(id) => (self.comments.contains_key(id), format!("comment {id}")),
                Parent::Shop(id) => (self.shops.contains_key(id), format!("shop {id}")),
            };
            if !exists {
                return Err(format!("{label} does not exist"));
            }
        }
        Ok(())
    }
}

fn count(removed: usize) -> u64 {
    u64::try_from(removed).unwrap_or(u64::MAX)
}

/// Remove every entry matching `doomed` and report how many went.
fn purge<K, V>(table: &mut HashMap<K, V>, mut doomed: impl FnMut(&K, &V) -> bool) -> u64
where
    K: std::hash::Hash + Eq,
{
    let before = table.len();
    table.retain(|key, value| !doomed(key, value));
    count(before - table.len())
}

impl State {
    fn delete_comments(&mut self, ids: &HashSet<CommentId>) -> DeletionSummary {
        DeletionSummary {
            replies: purge(&mut self.replies, |_, reply| ids.contains(&reply.comment_id)),
            comments: purge(&mut self.comments, |id, _| ids.contains(id)),
            ..DeletionSummary::default()
        }
    }

    fn delete_posts(&mut self, ids: &HashSet<PostId>) -> DeletionSummary {
        let likes = purge(&mut self.likes, |(post_id, _), _| ids.contains(post_id));
        let comment_ids: HashSet<CommentId> = self
            .comments
            .values()
            .filter(|comment| ids.contains(&comment.post_id))
            .map(|comment| comment.id)
            .collect();
        let mut summary = self.delete_comments(&comment_ids);
        summary.likes += likes;
        summary.posts = purge(&mut self.posts, |id, _| ids.contains(id));
        summary
    }

    fn delete_pets(&mut self, ids: &HashSet<PetId>) -> DeletionSummary {
        let summary = DeletionSummary {
            medical_records: purge(&mut self.medical, |_, record| ids.contains(&record.pet_id)),
            vaccination_records: purge(&mut self.vaccinations, |_, record| {
                ids.contains(&record.pet_id)
            }),
            tasks: purge(&mut self.tasks, |_, task| {
                task.pet_id.is_some_and(|pet_id| ids.contains(&pet_id))
            }),
            pets: purge(&mut self.pets, |id, _| ids.contains(id)),
            ..DeletionSummary::default()
        };
        for post in self.posts.values_mut() {
            if post.pet_id.is_some_and(|pet_id| ids.contains(&pet_id)) {
                post.pet_id = None;
            }
        }
        summary
    }

    fn delete_shops(&mut self, ids: &HashSet<ShopId>) -> DeletionSummary {
        let owners: HashSet<UserId> = self
            .shops
            .values()
            .filter(|shop| ids.contains(&shop.id))
            .map(|shop| shop.owner_id)
            .collect();
        let summary = DeletionSummary {
            promotions: purge(&mut self.promotions, |_, promotion| {
                ids.contains(&promotion.shop_id)
            }),
            shops: purge(&mut self.shops, |id, _| ids.contains(id)),
            ..DeletionSummary::default()
        };
        for owner in owners {
            if let Some(account) = self.users.get_mut(&owner) {
                account.user.is_shop_owner = false;
            }
        }
        summary
    }

    fn delete_user(&mut self, user_id: UserId) -> DeletionSummary {
        let mut summary = DeletionSummary {
            likes: purge(&mut self.likes, |(_, liker), _| *liker == user_id),
            replies: purge(&mut self.replies, |_, reply| reply.author_id == user_id),
            ..DeletionSummary::default()
        };

        let comment_ids: HashSet<CommentId> = self
            .comments
            .values()
            .filter(|comment| comment.author_id == user_id)
            .map(|comment| comment.id)
            .collect();
        summary += self.delete_comments(&comment_ids);

        let post_ids: HashSet<PostId> = self
            .posts
            .values()
            .filter(|post| post.author_id == user_id)
            .map(|post| post.id)
            .collect();
        summary += self.delete_posts(&post_ids);

        summary.tasks += purge(&mut self.tasks, |_, task| task.owner_id == user_id);

        let pet_ids: HashSet<PetId> = self
            .pets
            .values()
            .filter(|pet| pet.owner_id == user_id)
            .map(|pet| pet.id)
            .collect();
        summary += self.delete_pets(&pet_ids);

        let shop_ids: HashSet<ShopId> = self
            .shops
            .values()
            .filter(|shop| shop.owner_id == user_id)
            .map(|shop| shop.id)
            .collect();
        summary += self.delete_shops(&shop_ids);

        summary.applications += purge(&mut self.applications, |_, application| {
            application.applicant_id == user_id
        });
        summary.users += purge(&mut self.users, |id, _| *id == user_id);
        summary
    }
}
