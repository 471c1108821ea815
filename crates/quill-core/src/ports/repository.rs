use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Post, PostStatus};
use crate::error::RepoError;

/// Generic repository trait for entities with a client-assigned ID.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// Which posts a query may see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostScope {
    /// Every post regardless of status.
    #[default]
    All,
    /// Only posts with status `Published`.
    Published,
}

/// Result ordering. Ties are broken by id so pages are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostOrdering {
    /// Newest `publish` first.
    #[default]
    PublishDesc,
    PublishAsc,
}

impl PostOrdering {
    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        let primary = match self {
            Self::PublishDesc => b.publish.cmp(&a.publish),
            Self::PublishAsc => a.publish.cmp(&b.publish),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// A filtered, ordered and optionally sliced view over posts.
///
/// Start from one of the two scopes, [`PostQuery::all`] or
/// [`PostQuery::published`], and narrow it down:
///
/// ```
/// use quill_core::ports::PostQuery;
///
/// let query = PostQuery::published().with_slug("hello-world").slice(0, 1);
/// assert_eq!(query.limit, Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub scope: PostScope,
    pub ordering: PostOrdering,
    pub id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub slug: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub offset: u64,
    pub limit: Option<u64>,
}

impl PostQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn published() -> Self {
        Self {
            scope: PostScope::Published,
            ..Self::default()
        }
    }

    pub fn order_by(mut self, ordering: PostOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Restrict to posts whose `publish` falls on `date` (UTC).
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.publish_date = Some(date);
        self
    }

    pub fn slice(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Whether `post` passes the scope and filters. Ordering and slicing
    /// are not considered.
    pub fn matches(&self, post: &Post) -> bool {
        if self.scope == PostScope::Published && post.status != PostStatus::Published {
            return false;
        }
        if self.id.is_some_and(|id| id != post.id) {
            return false;
        }
        if self.author_id.is_some_and(|author| author != post.author_id) {
            return false;
        }
        if self.slug.as_deref().is_some_and(|slug| slug != post.slug) {
            return false;
        }
        if self
            .publish_date
            .is_some_and(|date| date != post.publish_date())
        {
            return false;
        }
        true
    }
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts matching `query`, ordered and sliced as it asks.
    async fn fetch(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `query`, ignoring its slice.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// First post matching `query`.
    async fn fetch_one(&self, query: &PostQuery) -> Result<Option<Post>, RepoError> {
        let query = query.clone().slice(query.offset, 1);
        Ok(self.fetch(&query).await?.into_iter().next())
    }
}
