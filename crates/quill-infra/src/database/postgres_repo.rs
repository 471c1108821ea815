//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{Duration, NaiveTime};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::{PostOrdering, PostQuery, PostRepository, PostScope};

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, read_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Translate the scope and filters of `query` into a `WHERE` clause.
fn filtered(query: &PostQuery) -> Select<PostEntity> {
    let mut select = PostEntity::find();

    if query.scope == PostScope::Published {
        select = select.filter(post::Column::Status.eq(post::Status::Published));
    }
    if let Some(id) = query.id {
        select = select.filter(post::Column::Id.eq(id));
    }
    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(slug) = &query.slug {
        select = select.filter(post::Column::Slug.eq(slug.as_str()));
    }
    if let Some(date) = query.publish_date {
        // Half-open UTC day so the publish index stays usable.
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);
        select = select
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end));
    }

    select
}

fn ordered(select: Select<PostEntity>, ordering: PostOrdering) -> Select<PostEntity> {
    let select = match ordering {
        PostOrdering::PublishDesc => select.order_by_desc(post::Column::Publish),
        PostOrdering::PublishAsc => select.order_by_asc(post::Column::Publish),
    };
    select.order_by_asc(post::Column::Id)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn fetch(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(?query, "Fetching posts");

        let result = ordered(filtered(query), query.ordering)
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        filtered(query).count(&self.db).await.map_err(read_error)
    }
}
