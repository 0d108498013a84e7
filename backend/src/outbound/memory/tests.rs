//! Cascade and workflow coverage for the in-memory store.

use chrono::Duration;
use rstest::{fixture, rstest};

use super::MemoryStore;
use crate::domain::ports::{
    ApprovalOutcome, HealthRecordRepository, HealthRecordRepositoryError, PetRepository,
    PostRepository, PostRepositoryError, RejectionOutcome, ShopRepository, ShopRepositoryError,
    TaskRepository, TaskRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::test_fixtures::{fixture_timestamp, fixture_today, pet_of, post_by, user};
use crate::domain::{
    ApplicationStatus, Comment, CommentId, DeletionSummary, FeedQuery, MedicalRecordDraft,
    Reply, ReplyId, ShopApplicationDraft, TaskDraft, TaskFilter, User,
};

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::new()
}

async fn register(store: &MemoryStore, name: &str) -> User {
    let account = user(name);
    UserRepository::create(store, &account, "hash")
        .await
        .expect("user stored");
    account
}

fn comment_on(post: &crate::domain::Post, author: &User) -> Comment {
    Comment {
        id: CommentId::random(),
        post_id: post.id,
        author_id: author.id,
        content: "Lovely".to_owned(),
        created_at: fixture_timestamp(),
    }
}

fn reply_to(comment: &Comment, author: &User) -> Reply {
    Reply {
        id: ReplyId::random(),
        comment_id: comment.id,
        author_id: author.id,
        content: "Thanks".to_owned(),
        created_at: fixture_timestamp(),
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_accounts_name_the_clashing_field(store: MemoryStore) {
    let ada = register(&store, "ada").await;

    let same_email = User {
        username: user("grace").username,
        ..user("ada")
    };
    let err = UserRepository::create(&store, &same_email, "hash")
        .await
        .expect_err("email taken");
    assert_eq!(err, UserRepositoryError::duplicate("email"));

    let same_username = User {
        email: user("grace").email,
        ..ada
    };
    let err = UserRepository::create(&store, &same_username, "hash")
        .await
        .expect_err("username taken");
    assert_eq!(err, UserRepositoryError::duplicate("username"));
}

#[rstest]
#[tokio::test]
async fn likes_are_idempotent(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let post = post_by(&ada);
    store.create_post(&post).await.expect("post stored");

    let at = fixture_timestamp();
    assert_eq!(store.add_like(&post.id, &ada.id, at).await.expect("like"), 1);
    assert_eq!(store.add_like(&post.id, &ada.id, at).await.expect("like"), 1);
    assert_eq!(store.remove_like(&post.id, &ada.id).await.expect("unlike"), 0);
    assert_eq!(store.remove_like(&post.id, &ada.id).await.expect("unlike"), 0);
}

#[rstest]
#[tokio::test]
async fn feed_is_newest_first_with_viewer_likes(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let older = post_by(&ada);
    let newer = crate::domain::Post {
        created_at: fixture_timestamp() + Duration::minutes(5),
        ..post_by(&ada)
    };
    store.create_post(&older).await.expect("post stored");
    store.create_post(&newer).await.expect("post stored");
    store
        .add_like(&older.id, &ada.id, fixture_timestamp())
        .await
        .expect("like");

    let feed = store
        .list_feed(FeedQuery::default(), Some(ada.id))
        .await
        .expect("feed");

    let ids: Vec<_> = feed.iter().map(|view| view.post.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert!(!feed[0].liked_by_me);
    assert!(feed[1].liked_by_me);
    assert_eq!(feed[1].like_count, 1);
}

#[rstest]
#[tokio::test]
async fn deleting_a_pet_untags_posts_and_drops_records(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let pet = pet_of(&ada);
    PetRepository::create(&store, &pet).await.expect("pet stored");
    let tagged = crate::domain::Post {
        pet_id: Some(pet.id),
        ..post_by(&ada)
    };
    store.create_post(&tagged).await.expect("post stored");
    let record = MedicalRecordDraft::try_from_parts("Checkup", None, None, fixture_today())
        .expect("valid record")
        .into_record(pet.id, fixture_timestamp());
    store.create_medical(&record).await.expect("record stored");
    let task = TaskDraft::try_from_parts("Walk", None, None, Some(pet.id))
        .expect("valid task")
        .into_task(ada.id, fixture_timestamp());
    TaskRepository::create(&store, &task)
        .await
        .expect("task stored");

    let summary = PetRepository::delete_cascade(&store, &pet.id)
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
    let kept = store
        .find_post(&tagged.id)
        .await
        .expect("lookup")
        .expect("post kept");
    assert_eq!(kept.pet_id, None);
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_removes_everything_they_touched(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let grace = register(&store, "grace").await;

    let ada_post = post_by(&ada);
    let grace_post = post_by(&grace);
    store.create_post(&ada_post).await.expect("post stored");
    store.create_post(&grace_post).await.expect("post stored");

    // Grace comments on Ada's post; Ada comments and replies on Grace's.
    let on_ada = comment_on(&ada_post, &grace);
    let on_grace = comment_on(&grace_post, &ada);
    let grace_reply = reply_to(&on_grace, &grace);
    let ada_reply = reply_to(&on_ada, &ada);
    for comment in [&on_ada, &on_grace] {
        store.create_comment(comment).await.expect("comment stored");
    }
    for reply in [&grace_reply, &ada_reply] {
        store.create_reply(reply).await.expect("reply stored");
    }
    let at = fixture_timestamp();
    store.add_like(&grace_post.id, &ada.id, at).await.expect("like");
    store.add_like(&ada_post.id, &grace.id, at).await.expect("like");
    PetRepository::create(&store, &pet_of(&ada))
        .await
        .expect("pet stored");

    let summary = UserRepository::delete_cascade(&store, &ada.id)
        .await
        .expect("cascade")
        .expect("user existed");

    assert_eq!(summary.users, 1);
    assert_eq!(summary.posts, 1);
    assert_eq!(summary.pets, 1);
    assert_eq!(summary.likes, 2);
    assert_eq!(summary.comments, 2);
    assert_eq!(summary.replies, 2);

    let survivors = store
        .list_feed(FeedQuery::default(), Some(grace.id))
        .await
        .expect("feed");
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].like_count, 0);
    assert_eq!(survivors[0].comment_count, 0);
    let stats = store.stats().await.expect("stats");
    assert_eq!((stats.users, stats.comments), (1, 0));
}

#[rstest]
#[tokio::test]
async fn deleting_a_missing_user_reports_none(store: MemoryStore) {
    let ghost = user("ghost");
    let outcome = UserRepository::delete_cascade(&store, &ghost.id)
        .await
        .expect("cascade");
    assert!(outcome.is_none());
}

#[rstest]
#[tokio::test]
async fn approval_creates_one_shop_and_flags_the_owner(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let application = ShopApplicationDraft::try_from_parts("Paws & Claws", None, None, None)
        .expect("valid draft")
        .into_application(ada.id, fixture_timestamp());
    store
        .create_application(&application)
        .await
        .expect("application stored");

    let second = ShopApplicationDraft::try_from_parts("Second", None, None, None)
        .expect("valid draft")
        .into_application(ada.id, fixture_timestamp());
    let err = store
        .create_application(&second)
        .await
        .expect_err("one pending application per applicant");
    assert!(matches!(err, ShopRepositoryError::Conflict { .. }));

    let at = fixture_timestamp() + Duration::hours(1);
    let ApprovalOutcome::Approved(shop) = store
        .approve_application(&application.id, at)
        .await
        .expect("approval")
    else {
        panic!("expected approval");
    };
    assert_eq!(shop.owner_id, ada.id);
    assert_eq!(shop.name, "Paws & Claws");

    let owner = UserRepository::find_by_id(&store, &ada.id)
        .await
        .expect("lookup")
        .expect("user exists");
    assert!(owner.is_shop_owner);

    let again = store
        .approve_application(&application.id, at)
        .await
        .expect("second approval");
    assert_eq!(again, ApprovalOutcome::NotPending);
    let rejected = store
        .reject_application(&application.id, None, at)
        .await
        .expect("rejection");
    assert_eq!(rejected, RejectionOutcome::NotPending);

    let pending = store
        .list_applications(Some(ApplicationStatus::Pending))
        .await
        .expect("list");
    assert!(pending.is_empty());
}

#[rstest]
#[tokio::test]
async fn deleting_a_shop_clears_the_owner_flag(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let application = ShopApplicationDraft::try_from_parts("Paws", None, None, None)
        .expect("valid draft")
        .into_application(ada.id, fixture_timestamp());
    store
        .create_application(&application)
        .await
        .expect("application stored");
    let ApprovalOutcome::Approved(shop) = store
        .approve_application(&application.id, fixture_timestamp())
        .await
        .expect("approval")
    else {
        panic!("expected approval");
    };

    let summary = store
        .delete_shop_cascade(&shop.id)
        .await
        .expect("cascade")
        .expect("shop existed");

    assert_eq!(summary.shops, 1);
    let owner = UserRepository::find_by_id(&store, &ada.id)
        .await
        .expect("lookup")
        .expect("user exists");
    assert!(!owner.is_shop_owner);
}

#[rstest]
#[tokio::test]
async fn tasks_list_open_and_dated_first(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let now = fixture_timestamp();
    let draft = |title: &str, due: Option<chrono::DateTime<chrono::Utc>>| {
        TaskDraft::try_from_parts(title, None, due, None)
            .expect("valid task")
            .into_task(ada.id, now)
    };
    let mut done = draft("done", Some(now));
    done.completed = true;
    let undated = draft("undated", None);
    let soon = draft("soon", Some(now + Duration::hours(1)));
    for task in [&done, &undated, &soon] {
        TaskRepository::create(&store, task)
            .await
            .expect("task stored");
    }

    let titles: Vec<String> = TaskRepository::list(&store, &ada.id, TaskFilter::default())
        .await
        .expect("list")
        .into_iter()
        .map(|task| task.title)
        .collect();

    assert_eq!(titles, ["soon", "undated", "done"]);
}

#[rstest]
#[tokio::test]
async fn children_of_deleted_posts_are_rejected(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let post = post_by(&ada);
    store.create_post(&post).await.expect("post stored");
    let comment = comment_on(&post, &ada);
    store.create_comment(&comment).await.expect("comment stored");
    store
        .delete_post_cascade(&post.id)
        .await
        .expect("cascade")
        .expect("post existed");

    let late_comment = store.create_comment(&comment_on(&post, &ada)).await;
    let late_reply = store.create_reply(&reply_to(&comment, &ada)).await;
    let late_like = store.add_like(&post.id, &ada.id, fixture_timestamp()).await;

    assert!(matches!(late_comment, Err(PostRepositoryError::Query { .. })));
    assert!(matches!(late_reply, Err(PostRepositoryError::Query { .. })));
    assert!(matches!(late_like, Err(PostRepositoryError::Query { .. })));
}

#[rstest]
#[tokio::test]
async fn rows_for_deleted_pets_are_rejected(store: MemoryStore) {
    let ada = register(&store, "ada").await;
    let pet = pet_of(&ada);
    PetRepository::create(&store, &pet).await.expect("pet stored");
    PetRepository::delete_cascade(&store, &pet.id)
        .await
        .expect("cascade")
        .expect("pet existed");

    let task = TaskDraft::try_from_parts("Walk", None, None, Some(pet.id))
        .expect("valid task")
        .into_task(ada.id, fixture_timestamp());
    let record = MedicalRecordDraft::try_from_parts("Checkup", None, None, fixture_today())
        .expect("draft")
        .into_record(pet.id, fixture_timestamp());

    assert!(matches!(
        TaskRepository::create(&store, &task).await,
        Err(TaskRepositoryError::Query { .. })
    ));
    assert!(matches!(
        store.create_medical(&record).await,
        Err(HealthRecordRepositoryError::Query { .. })
    ));
}
