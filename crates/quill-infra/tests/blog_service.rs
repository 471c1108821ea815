//! Blog and authoring services running on the in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use url::Url;
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{INVALID_EMAIL_MESSAGE, NewPost, Post, PostChanges, PostStatus, ShareForm, ShareState};
use quill_core::ports::{BaseRepository, MailError, MailMessage, Mailer};
use quill_core::services::{AuthoringService, BlogService};
use quill_infra::{InMemoryMailer, InMemoryPostRepository};

const SENDER: &str = "noreply@quill.test";

struct Fixture {
    repo: Arc<InMemoryPostRepository>,
    mailer: Arc<InMemoryMailer>,
    blog: BlogService,
    authoring: AuthoringService,
}

fn fixture() -> Fixture {
    let repo = Arc::new(InMemoryPostRepository::new());
    let mailer = Arc::new(InMemoryMailer::new());
    Fixture {
        blog: BlogService::new(repo.clone(), mailer.clone(), SENDER),
        authoring: AuthoringService::new(repo.clone()),
        repo,
        mailer,
    }
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn site() -> Url {
    Url::parse("https://blog.example.com").unwrap()
}

async fn seed(repo: &InMemoryPostRepository, slug: &str, publish: DateTime<Utc>, status: PostStatus) -> Post {
    let mut post = Post::new(Uuid::new_v4(), format!("Title {slug}"), slug.to_string(), "Body".to_string());
    post.publish = publish;
    post.status = status;
    repo.create(post).await.unwrap()
}

/// Seven published posts, `p1` oldest through `p7` newest, plus one draft.
async fn seed_seven(repo: &InMemoryPostRepository) {
    for i in 1..=7 {
        seed(repo, &format!("p{i}"), at(i, 12), PostStatus::Published).await;
    }
    seed(repo, "draft", at(20, 12), PostStatus::Draft).await;
}

fn slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

fn valid_form() -> ShareForm {
    ShareForm {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        to: "grace@example.com".to_string(),
        comments: "You will like this.".to_string(),
    }
}

// --- listing -----------------------------------------------------------------

#[tokio::test]
async fn test_list_posts_with_no_posts_returns_one_empty_page() {
    let fx = fixture();
    seed(&fx.repo, "draft", at(1, 0), PostStatus::Draft).await;

    let page = fx.blog.list_posts(None).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.number, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_list_posts_pages_newest_first_and_skips_drafts() {
    let fx = fixture();
    seed_seven(&fx.repo).await;

    let first = fx.blog.list_posts(None).await.unwrap();
    assert_eq!(slugs(&first.items), ["p7", "p6", "p5"]);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_items, 7);
    assert!(first.has_next());
    assert!(!first.has_previous());

    let last = fx.blog.list_posts(Some("3")).await.unwrap();
    assert_eq!(slugs(&last.items), ["p1"]);
    assert!(!last.has_next());
    assert!(last.has_previous());
}

#[tokio::test]
async fn test_list_posts_falls_back_on_bad_page_numbers() {
    let fx = fixture();
    seed_seven(&fx.repo).await;

    let first = fx.blog.list_posts(Some("1")).await.unwrap();
    let last = fx.blog.list_posts(Some("3")).await.unwrap();

    assert_eq!(fx.blog.list_posts(Some("abc")).await.unwrap(), first);
    assert_eq!(fx.blog.list_posts(Some("999")).await.unwrap(), last);
}

// --- detail ------------------------------------------------------------------

#[tokio::test]
async fn test_post_detail_matches_date_and_slug() {
    let fx = fixture();
    let post = seed(&fx.repo, "my-slug", at(15, 23), PostStatus::Published).await;
    seed(&fx.repo, "my-slug", at(16, 1), PostStatus::Published).await;

    let found = fx.blog.post_detail(2024, 3, 15, "my-slug").await.unwrap();
    assert_eq!(found.id, post.id);

    let err = fx.blog.post_detail(2024, 3, 14, "my-slug").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_post_detail_never_returns_drafts() {
    let fx = fixture();
    seed(&fx.repo, "my-slug", at(15, 9), PostStatus::Draft).await;

    let err = fx.blog.post_detail(2024, 3, 15, "my-slug").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_post_detail_with_impossible_date_is_not_found() {
    let fx = fixture();
    let err = fx.blog.post_detail(2024, 13, 40, "anything").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

// --- share -------------------------------------------------------------------

#[tokio::test]
async fn test_share_read_request_shows_empty_form() {
    let fx = fixture();
    let post = seed(&fx.repo, "shared", at(15, 9), PostStatus::Published).await;

    let outcome = fx.blog.share_post(post.id, None, &site()).await.unwrap();

    assert_eq!(outcome.state, ShareState::Unsubmitted);
    assert!(!outcome.sent());
    assert_eq!(outcome.form, ShareForm::default());
    assert!(outcome.errors.is_empty());
    assert!(fx.mailer.outbox().await.is_empty());
}

#[tokio::test]
async fn test_share_with_invalid_email_sends_nothing() {
    let fx = fixture();
    let post = seed(&fx.repo, "shared", at(15, 9), PostStatus::Published).await;
    let form = ShareForm {
        email: "not-an-email".to_string(),
        ..valid_form()
    };

    let outcome = fx.blog.share_post(post.id, Some(form.clone()), &site()).await.unwrap();

    assert_eq!(outcome.state, ShareState::Unsubmitted);
    assert!(!outcome.sent());
    assert_eq!(outcome.errors.get("email").unwrap(), [INVALID_EMAIL_MESSAGE]);
    assert_eq!(outcome.form, form);
    assert!(fx.mailer.outbox().await.is_empty());
}

#[tokio::test]
async fn test_share_valid_form_sends_exactly_one_message() {
    let fx = fixture();
    let post = seed(&fx.repo, "shared-post", at(15, 9), PostStatus::Published).await;

    let outcome = fx.blog.share_post(post.id, Some(valid_form()), &site()).await.unwrap();

    assert!(outcome.sent());
    assert_eq!(outcome.state, ShareState::Submitted);

    let outbox = fx.mailer.outbox().await;
    assert_eq!(outbox.len(), 1);
    let message = &outbox[0];
    assert_eq!(message.subject, "Ada recommends you read Title shared-post");
    assert_eq!(
        message.body,
        "Read Title shared-post at https://blog.example.com/blog/2024/3/15/shared-post/\n\n\
         Ada's comments: You will like this."
    );
    assert!(message.body.contains(&post.title));
    assert!(message.body.contains("shared-post/"));
    assert_eq!(message.from, SENDER);
    assert_eq!(message.to, ["grace@example.com"]);
}

#[tokio::test]
async fn test_share_of_draft_or_unknown_post_is_not_found() {
    let fx = fixture();
    let draft = seed(&fx.repo, "hidden", at(15, 9), PostStatus::Draft).await;

    for id in [draft.id, Uuid::new_v4()] {
        let err = fx.blog.share_post(id, Some(valid_form()), &site()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
    assert!(fx.mailer.outbox().await.is_empty());
}

struct BrokenMailer;

#[async_trait]
impl Mailer for BrokenMailer {
    async fn send(&self, _message: &MailMessage) -> Result<usize, MailError> {
        Err(MailError::Transport("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_share_propagates_mail_transport_failure() {
    let repo = Arc::new(InMemoryPostRepository::new());
    let post = seed(&repo, "shared", at(15, 9), PostStatus::Published).await;
    let blog = BlogService::new(repo, Arc::new(BrokenMailer), SENDER);

    let err = blog.share_post(post.id, Some(valid_form()), &site()).await.unwrap_err();
    assert!(matches!(err, DomainError::Mail(_)));
}

// --- authoring ---------------------------------------------------------------

#[tokio::test]
async fn test_create_post_defaults_to_draft_and_rejects_duplicate_slug_on_same_day() {
    let fx = fixture();
    let author = Uuid::new_v4();

    let post = fx
        .authoring
        .create_post(
            author,
            NewPost {
                title: "Hello World".to_string(),
                body: "First".to_string(),
                publish: Some(at(15, 8)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Draft);
    assert_eq!(post.slug, "hello-world");

    let err = fx
        .authoring
        .create_post(
            author,
            NewPost {
                title: "Hello again".to_string(),
                slug: Some("hello-world".to_string()),
                publish: Some(at(15, 22)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    fx.authoring
        .create_post(
            author,
            NewPost {
                title: "Hello World".to_string(),
                publish: Some(at(16, 8)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_publish_makes_post_visible_to_visitors() {
    let fx = fixture();
    let author = Uuid::new_v4();
    let draft = fx
        .authoring
        .create_post(
            author,
            NewPost {
                title: "Soon".to_string(),
                publish: Some(at(10, 10)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(fx.blog.post_detail(2024, 3, 10, "soon").await.is_err());

    let published = fx.authoring.publish_post(author, draft.id).await.unwrap();
    assert_eq!(published.status, PostStatus::Published);
    assert!(published.updated_at >= draft.updated_at);
    assert_eq!(published.created_at, draft.created_at);

    let again = fx.authoring.publish_post(author, draft.id).await.unwrap();
    assert_eq!(again.status, PostStatus::Published);

    assert_eq!(fx.blog.post_detail(2024, 3, 10, "soon").await.unwrap().id, draft.id);
}

#[tokio::test]
async fn test_only_the_author_may_edit() {
    let fx = fixture();
    let author = Uuid::new_v4();
    let post = seed(&fx.repo, "mine", at(3, 3), PostStatus::Draft).await;
    let changes = PostChanges {
        title: Some("Stolen".to_string()),
        ..Default::default()
    };

    let err = fx.authoring.update_post(author, post.id, changes.clone()).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = fx.authoring.publish_post(author, post.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let updated = fx.authoring.update_post(post.author_id, post.id, changes).await.unwrap();
    assert_eq!(updated.title, "Stolen");
}

#[tokio::test]
async fn test_update_rejects_moving_onto_a_taken_slug() {
    let fx = fixture();
    let first = seed(&fx.repo, "taken", at(5, 5), PostStatus::Published).await;
    let mut second = Post::new(first.author_id, "Other".to_string(), "other".to_string(), String::new());
    second.publish = at(5, 6);
    let second = fx.repo.create(second).await.unwrap();

    let err = fx
        .authoring
        .update_post(
            first.author_id,
            second.id,
            PostChanges {
                slug: Some("taken".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let moved = fx
        .authoring
        .update_post(
            first.author_id,
            second.id,
            PostChanges {
                slug: Some("taken".to_string()),
                publish: Some(at(5, 6) + Duration::days(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.slug, "taken");
}

#[tokio::test]
async fn test_author_posts_lists_drafts_and_published() {
    let fx = fixture();
    let author = Uuid::new_v4();
    for (title, day) in [("One", 1), ("Two", 2)] {
        fx.authoring
            .create_post(
                author,
                NewPost {
                    title: title.to_string(),
                    publish: Some(at(day, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }
    seed(&fx.repo, "someone-else", at(3, 0), PostStatus::Published).await;

    let posts = fx.authoring.author_posts(author).await.unwrap();
    assert_eq!(slugs(&posts), ["two", "one"]);
}
