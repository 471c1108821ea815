//! In-memory post repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostQuery, PostRepository};

/// Posts kept in a `HashMap` behind an async `RwLock`.
///
/// Enforces the same slug-per-publish-date uniqueness as the database index.
/// Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    fn slug_clash(store: &HashMap<Uuid, Post>, post: &Post) -> bool {
        store.values().any(|other| {
            other.id != post.id
                && other.slug == post.slug
                && other.publish_date() == post.publish_date()
        })
    }

    fn constraint(post: &Post) -> RepoError {
        RepoError::Constraint(format!(
            "slug '{}' already exists for {}",
            post.slug,
            post.publish_date()
        ))
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        if Self::slug_clash(&store, &post) {
            return Err(Self::constraint(&post));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if Self::slug_clash(&store, &post) {
            return Err(Self::constraint(&post));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn fetch(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|post| query.matches(post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| query.ordering.compare(a, b));

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(posts.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|post| query.matches(post)).count() as u64)
    }
}
