use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::sea_query::ForeignKeyAction;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RelationTrait, Value};
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostOrdering, PostQuery, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn model(slug: &str, status: post::Status) -> post::Model {
    let publish = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    post::Model {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        slug: slug.to_owned(),
        body: "Content".to_owned(),
        publish: publish.into(),
        created_at: publish.into(),
        updated_at: publish.into(),
        status,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let row = model("test-post", post::Status::Draft);
    let post_id = row.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_fetch_published_orders_by_publish_desc() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            model("second", post::Status::Published),
            model("first", post::Status::Published),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo
        .fetch(&PostQuery::published().slice(3, 3))
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(Post::is_published));

    let log = repo.db.into_transaction_log();
    let sql = &log[0].statements()[0].sql;
    assert!(sql.contains(r#""posts"."status" = "#), "{sql}");
    assert!(sql.contains(r#"ORDER BY "posts"."publish" DESC"#), "{sql}");
    assert!(sql.contains("LIMIT"), "{sql}");
    assert!(sql.contains("OFFSET"), "{sql}");
}

#[tokio::test]
async fn test_fetch_oldest_first_when_asked() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model("first", post::Status::Published)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    repo.fetch(&PostQuery::all().order_by(PostOrdering::PublishAsc))
        .await
        .unwrap();

    let log = repo.db.into_transaction_log();
    let sql = &log[0].statements()[0].sql;
    assert!(sql.contains(r#"ORDER BY "posts"."publish" ASC, "posts"."id" ASC"#), "{sql}");
}

#[tokio::test]
async fn test_fetch_by_date_and_slug_bounds_the_day() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model("my-slug", post::Status::Published)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let found = repo
        .fetch_one(&PostQuery::published().on_date(date).with_slug("my-slug"))
        .await
        .unwrap();

    assert_eq!(found.unwrap().slug, "my-slug");

    let log = repo.db.into_transaction_log();
    let sql = &log[0].statements()[0].sql;
    assert!(sql.contains(r#""posts"."publish" >= "#), "{sql}");
    assert!(sql.contains(r#""posts"."publish" < "#), "{sql}");
    assert!(sql.contains(r#""posts"."slug" = "#), "{sql}");
}

#[tokio::test]
async fn test_count_published() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(7)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert_eq!(repo.count(&PostQuery::published()).await.unwrap(), 7);
}

#[tokio::test]
async fn test_query_failure_surfaces_as_repo_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("boom".to_owned())])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let err = repo.fetch(&PostQuery::all()).await.unwrap_err();
    assert!(matches!(err, RepoError::Query(_)));
}

#[test]
fn test_author_relation_cascades_on_delete() {
    let relation = post::Relation::Author.def();
    assert!(matches!(relation.on_delete, Some(ForeignKeyAction::Cascade)));
}
