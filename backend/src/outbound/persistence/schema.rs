//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` and `username` carry unique indexes. `password_hash` holds a
    /// PHC-formatted Argon2 hash and never leaves the persistence layer.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        username -> Varchar,
        display_name -> Varchar,
        bio -> Nullable<Text>,
        avatar_url -> Nullable<Text>,
        password_hash -> Text,
        is_admin -> Bool,
        is_shop_owner -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pet profiles owned by a user.
    pets (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        species -> Varchar,
        breed -> Nullable<Varchar>,
        birth_date -> Nullable<Date>,
        /// `male`, `female` or `unknown`.
        gender -> Varchar,
        weight_kg -> Nullable<Float8>,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    medical_records (id) {
        id -> Uuid,
        pet_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        vet_name -> Nullable<Varchar>,
        visit_date -> Date,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    vaccination_records (id) {
        id -> Uuid,
        pet_id -> Uuid,
        vaccine_name -> Varchar,
        administered_on -> Date,
        next_due_on -> Nullable<Date>,
        vet_name -> Nullable<Varchar>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Feed posts. `pet_id` is cleared when the tagged pet is deleted.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        pet_id -> Nullable<Uuid>,
        content -> Text,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (post, user); the composite key makes likes idempotent.
    post_likes (post_id, user_id) {
        post_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    replies (id) {
        id -> Uuid,
        comment_id -> Uuid,
        author_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shop applications. A partial unique index allows one pending row per
    /// applicant.
    shop_applications (id) {
        id -> Uuid,
        applicant_id -> Uuid,
        shop_name -> Varchar,
        description -> Nullable<Text>,
        address -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        status -> Varchar,
        review_note -> Nullable<Text>,
        created_at -> Timestamptz,
        reviewed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Approved shops, at most one per owner.
    shops (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        address -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        logo_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    promotions (id) {
        id -> Uuid,
        shop_id -> Uuid,
        title -> Varchar,
        content -> Text,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tasks (id) {
        id -> Uuid,
        owner_id -> Uuid,
        pet_id -> Nullable<Uuid>,
        title -> Varchar,
        description -> Nullable<Text>,
        due_at -> Nullable<Timestamptz>,
        completed -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(pets -> users (owner_id));
diesel::joinable!(medical_records -> pets (pet_id));
diesel::joinable!(vaccination_records -> pets (pet_id));
diesel::joinable!(posts -> users (author_id));
diesel::joinable!(post_likes -> posts (post_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(replies -> comments (comment_id));
diesel::joinable!(replies -> users (author_id));
diesel::joinable!(shop_applications -> users (applicant_id));
diesel::joinable!(shops -> users (owner_id));
diesel::joinable!(promotions -> shops (shop_id));
diesel::joinable!(tasks -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    pets,
    medical_records,
    vaccination_records,
    posts,
    post_likes,
    comments,
    replies,
    shop_applications,
    shops,
    promotions,
    tasks,
);
