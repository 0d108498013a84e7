//! Cascades, like idempotency and the approval transaction against
//! PostgreSQL.
//!
//! Every test provisions its own database through
//! `PAWPRINT_TEST_DATABASE_URL` and returns early when it is unset.

#[path = "support/postgres.rs"]
mod postgres;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use pawprint::domain::ports::{
    ApprovalOutcome, HealthRecordRepository, PetRepository, PostRepository, PostRepositoryError,
    ShopRepository, ShopRepositoryError, TaskRepository, UserRepository, UserRepositoryError,
};
use pawprint::domain::{
    Comment, CommentId, DeletionSummary, DisplayName, Email, FeedQuery, MedicalRecordDraft, Pet,
    PetDraft, PetInput, Post, PostId, PromotionDraft, Reply, ReplyId, Shop, ShopApplicationDraft,
    TaskDraft, TaskFilter, User, UserId, Username,
};
use pawprint::outbound::persistence::{
    DieselHealthRecordRepository, DieselPetRepository, DieselPostRepository,
    DieselShopRepository, DieselTaskRepository, DieselUserRepository,
};
use postgres::TestDatabase;
use rstest::rstest;

struct Repositories {
    users: DieselUserRepository,
    pets: DieselPetRepository,
    records: DieselHealthRecordRepository,
    posts: DieselPostRepository,
    tasks: DieselTaskRepository,
    shops: DieselShopRepository,
}

impl Repositories {
    fn over(db: &TestDatabase) -> Self {
        Self {
            users: DieselUserRepository::new(db.pool()),
            pets: DieselPetRepository::new(db.pool()),
            records: DieselHealthRecordRepository::new(db.pool()),
            posts: DieselPostRepository::new(db.pool()),
            tasks: DieselTaskRepository::new(db.pool()),
            shops: DieselShopRepository::new(db.pool()),
        }
    }

    async fn register(&self, name: &str) -> User {
        let account = user(name);
        UserRepository::create(&self.users, &account, "hash")
            .await
            .expect("user stored");
        account
    }

    async fn adopt(&self, owner: &User) -> Pet {
        let pet = PetDraft::try_new(PetInput {
            name: "Biscuit",
            species: "dog",
            ..PetInput::default()
        })
        .expect("valid pet")
        .into_pet(owner.id, at());
        PetRepository::create(&self.pets, &pet)
            .await
            .expect("pet stored");
        pet
    }

    async fn publish(&self, post: Post) -> Post {
        self.posts.create_post(&post).await.expect("post stored");
        post
    }

    async fn comment(&self, post: &Post, author: &User) -> Comment {
        let comment = Comment {
            id: CommentId::random(),
            post_id: post.id,
            author_id: author.id,
            content: "Lovely".to_owned(),
            created_at: at(),
        };
        self.posts
            .create_comment(&comment)
            .await
            .expect("comment stored");
        comment
    }

    async fn reply(&self, comment: &Comment, author: &User) -> Reply {
        let reply = Reply {
            id: ReplyId::random(),
            comment_id: comment.id,
            author_id: author.id,
            content: "Thanks".to_owned(),
            created_at: at(),
        };
        self.posts.create_reply(&reply).await.expect("reply stored");
        reply
    }
}

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn checkup_day() -> NaiveDate {
    at().date_naive()
}

fn user(name: &str) -> User {
    User {
        id: UserId::random(),
        email: Email::parse(&format!("{name}@example.com")).expect("valid email"),
        username: Username::parse(name).expect("valid username"),
        display_name: DisplayName::parse(name).expect("valid display name"),
        bio: None,
        avatar_url: None,
        is_admin: false,
        is_shop_owner: false,
        created_at: at(),
        updated_at: at(),
    }
}

fn post_by(author: &User) -> Post {
    Post {
        id: PostId::random(),
        author_id: author.id,
        pet_id: None,
        content: "Walkies!".to_owned(),
        image_url: None,
        created_at: at(),
        updated_at: at(),
    }
}

async fn approved_shop(repos: &Repositories, owner: &User) -> Shop {
    let application = ShopApplicationDraft::try_from_parts("Paws & Claws", None, None, None)
        .expect("valid draft")
        .into_application(owner.id, at());
    repos
        .shops
        .create_application(&application)
        .await
        .expect("application stored");
    let ApprovalOutcome::Approved(shop) = repos
        .shops
        .approve_application(&application.id, at())
        .await
        .expect("approval")
    else {
        panic!("expected approval");
    };
    shop
}

#[rstest]
#[tokio::test]
async fn duplicate_accounts_name_the_clashing_field() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;

    let same_email = User {
        username: user("grace").username,
        ..user("ada")
    };
    let err = UserRepository::create(&repos.users, &same_email, "hash")
        .await
        .expect_err("email taken");
    assert_eq!(err, UserRepositoryError::duplicate("email"));

    let same_username = User {
        id: UserId::random(),
        email: user("grace").email,
        ..ada
    };
    let err = UserRepository::create(&repos.users, &same_username, "hash")
        .await
        .expect_err("username taken");
    assert_eq!(err, UserRepositoryError::duplicate("username"));
}

#[rstest]
#[tokio::test]
async fn likes_are_idempotent() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;
    let post = repos.publish(post_by(&ada)).await;

    assert_eq!(repos.posts.add_like(&post.id, &ada.id, at()).await.expect("like"), 1);
    assert_eq!(repos.posts.add_like(&post.id, &ada.id, at()).await.expect("like"), 1);
    let view = repos
        .posts
        .find_post_view(&post.id, Some(ada.id))
        .await
        .expect("lookup")
        .expect("post exists");
    assert!(view.liked_by_me);
    assert_eq!(view.like_count, 1);

    assert_eq!(repos.posts.remove_like(&post.id, &ada.id).await.expect("unlike"), 0);
    assert_eq!(repos.posts.remove_like(&post.id, &ada.id).await.expect("unlike"), 0);
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_removes_everything_they_touched() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;
    let grace = repos.register("grace").await;
    let ada_post = repos.publish(post_by(&ada)).await;
    let grace_post = repos.publish(post_by(&grace)).await;

    // Grace comments on Ada's post; Ada comments and replies on Grace's.
    let on_ada = repos.comment(&ada_post, &grace).await;
    let on_grace = repos.comment(&grace_post, &ada).await;
    repos.reply(&on_grace, &grace).await;
    repos.reply(&on_ada, &ada).await;
    repos
        .posts
        .add_like(&grace_post.id, &ada.id, at())
        .await
        .expect("like");
    repos
        .posts
        .add_like(&ada_post.id, &grace.id, at())
        .await
        .expect("like");
    repos.adopt(&ada).await;

    let summary = UserRepository::delete_cascade(&repos.users, &ada.id)
        .await
        .expect("cascade")
        .expect("user existed");

    assert_eq!(summary.users, 1);
    assert_eq!(summary.posts, 1);
    assert_eq!(summary.pets, 1);
    assert_eq!(summary.likes, 2);
    assert_eq!(summary.comments, 2);
    assert_eq!(summary.replies, 2);

    let survivors = repos
        .posts
        .list_feed(FeedQuery::default(), Some(grace.id))
        .await
        .expect("feed");
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].like_count, 0);
    assert_eq!(survivors[0].comment_count, 0);
    let stats = repos.users.stats().await.expect("stats");
    assert_eq!((stats.users, stats.comments), (1, 0));

    let again = UserRepository::delete_cascade(&repos.users, &ada.id)
        .await
        .expect("cascade");
    assert!(again.is_none());
}

#[rstest]
#[tokio::test]
async fn deleting_a_pet_untags_posts_and_drops_records() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;
    let pet = repos.adopt(&ada).await;
    let tagged = repos
        .publish(Post {
            pet_id: Some(pet.id),
            ..post_by(&ada)
        })
        .await;
    let record = MedicalRecordDraft::try_from_parts("Checkup", None, None, checkup_day())
        .expect("valid record")
        .into_record(pet.id, at());
    repos
        .records
        .create_medical(&record)
        .await
        .expect("record stored");
    let task = TaskDraft::try_from_parts("Walk", None, None, Some(pet.id))
        .expect("valid task")
        .into_task(ada.id, at());
    TaskRepository::create(&repos.tasks, &task)
        .await
        .expect("task stored");

    let summary = PetRepository::delete_cascade(&repos.pets, &pet.id)
        .await
        .expect("cascade")
        .expect("pet existed");

    assert_eq!(
        summary,
        DeletionSummary {
            pets: 1,
            medical_records: 1,
            tasks: 1,
            ..DeletionSummary::default()
        }
    );
    let kept = repos
        .posts
        .find_post(&tagged.id)
        .await
        .expect("lookup")
        .expect("post kept");
    assert_eq!(kept.pet_id, None);
    let remaining = TaskRepository::list(&repos.tasks, &ada.id, TaskFilter::default())
        .await
        .expect("tasks");
    assert!(remaining.is_empty());
}

#[rstest]
#[tokio::test]
async fn deleting_a_post_removes_its_thread() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;
    let grace = repos.register("grace").await;
    let post = repos.publish(post_by(&ada)).await;
    let comment = repos.comment(&post, &grace).await;
    repos.reply(&comment, &ada).await;
    repos
        .posts
        .add_like(&post.id, &grace.id, at())
        .await
        .expect("like");

    let summary = repos
        .posts
        .delete_post_cascade(&post.id)
        .await
        .expect("cascade")
        .expect("post existed");

    assert_eq!(
        summary,
        DeletionSummary {
            posts: 1,
            likes: 1,
            comments: 1,
            replies: 1,
            ..DeletionSummary::default()
        }
    );
    let orphan = repos.posts.find_comment(&comment.id).await.expect("lookup");
    assert!(orphan.is_none());
}

#[rstest]
#[tokio::test]
async fn children_of_deleted_posts_are_rejected() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;
    let post = repos.publish(post_by(&ada)).await;
    repos
        .posts
        .delete_post_cascade(&post.id)
        .await
        .expect("cascade")
        .expect("post existed");

    let late_comment = repos
        .posts
        .create_comment(&Comment {
            id: CommentId::random(),
            post_id: post.id,
            author_id: ada.id,
            content: "Too late".to_owned(),
            created_at: at(),
        })
        .await;
    let late_like = repos.posts.add_like(&post.id, &ada.id, at()).await;

    assert!(matches!(late_comment, Err(PostRepositoryError::Query { .. })));
    assert!(matches!(late_like, Err(PostRepositoryError::Query { .. })));
}

#[rstest]
#[tokio::test]
async fn approval_creates_one_shop_and_flags_the_owner() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;
    let application = ShopApplicationDraft::try_from_parts("Paws & Claws", None, None, None)
        .expect("valid draft")
        .into_application(ada.id, at());
    repos
        .shops
        .create_application(&application)
        .await
        .expect("application stored");

    let second = ShopApplicationDraft::try_from_parts("Second", None, None, None)
        .expect("valid draft")
        .into_application(ada.id, at());
    let err = repos
        .shops
        .create_application(&second)
        .await
        .expect_err("one pending application per applicant");
    assert!(matches!(err, ShopRepositoryError::Conflict { .. }));

    let reviewed_at = at() + Duration::hours(1);
    let ApprovalOutcome::Approved(shop) = repos
        .shops
        .approve_application(&application.id, reviewed_at)
        .await
        .expect("approval")
    else {
        panic!("expected approval");
    };
    assert_eq!(shop.owner_id, ada.id);
    assert_eq!(shop.name, "Paws & Claws");
    let owner = UserRepository::find_by_id(&repos.users, &ada.id)
        .await
        .expect("lookup")
        .expect("user exists");
    assert!(owner.is_shop_owner);

    let again = repos
        .shops
        .approve_application(&application.id, reviewed_at)
        .await
        .expect("second approval");
    assert_eq!(again, ApprovalOutcome::NotPending);

    let reapplication = ShopApplicationDraft::try_from_parts("Paws Two", None, None, None)
        .expect("valid draft")
        .into_application(ada.id, reviewed_at);
    repos
        .shops
        .create_application(&reapplication)
        .await
        .expect("application stored");
    let outcome = repos
        .shops
        .approve_application(&reapplication.id, reviewed_at)
        .await
        .expect("approval");
    assert_eq!(outcome, ApprovalOutcome::AlreadyShopOwner);
}

#[rstest]
#[tokio::test]
async fn deleting_a_shop_clears_the_owner_flag() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repos = Repositories::over(&db);
    let ada = repos.register("ada").await;
    let shop = approved_shop(&repos, &ada).await;
    let promotion = PromotionDraft::try_from_parts("Sale", "Half price treats", None)
        .expect("valid promotion")
        .into_promotion(shop.id, at());
    repos
        .shops
        .create_promotion(&promotion)
        .await
        .expect("promotion stored");

    let summary = repos
        .shops
        .delete_shop_cascade(&shop.id)
        .await
        .expect("cascade")
        .expect("shop existed");

    assert_eq!((summary.shops, summary.promotions), (1, 1));
    let owner = UserRepository::find_by_id(&repos.users, &ada.id)
        .await
        .expect("lookup")
        .expect("user exists");
    assert!(!owner.is_shop_owner);
    let promotions = repos.shops.list_promotions(None).await.expect("list");
    assert!(promotions.is_empty());
}
