//! Shared builders for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::{
    DisplayName, Email, Gender, Pet, PetId, Post, PostId, User, UserId, Username,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_today() -> NaiveDate {
    fixture_timestamp().date_naive()
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn user(username: &str) -> User {
    User {
        id: UserId::random(),
        email: Email::parse(&format!("{username}@example.com")).expect("fixture email"),
        username: Username::parse(username).expect("fixture username"),
        display_name: DisplayName::parse(username).expect("fixture display name"),
        bio: None,
        avatar_url: None,
        is_admin: false,
        is_shop_owner: false,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub(crate) fn admin(username: &str) -> User {
    User {
        is_admin: true,
        ..user(username)
    }
}

pub(crate) fn pet_of(owner: &User) -> Pet {
    Pet {
        id: PetId::random(),
        owner_id: owner.id,
        name: "Biscuit".to_owned(),
        species: "dog".to_owned(),
        breed: None,
        birth_date: None,
        gender: Gender::Unknown,
        weight_kg: None,
        image_url: None,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

pub(crate) fn post_by(author: &User) -> Post {
    Post {
        id: PostId::random(),
        author_id: author.id,
        pet_id: None,
        content: "Walkies!".to_owned(),
        image_url: None,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}
