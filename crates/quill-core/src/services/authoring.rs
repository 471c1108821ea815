//! Author-facing operations: drafting, editing and publishing posts.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostChanges};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostQuery, PostRepository};

pub struct AuthoringService {
    posts: Arc<dyn PostRepository>,
}

impl AuthoringService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Every post written by `author_id`, drafts included, newest first.
    pub async fn author_posts(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.fetch(&PostQuery::all().by_author(author_id)).await?)
    }

    pub async fn create_post(&self, author_id: Uuid, input: NewPost) -> Result<Post, DomainError> {
        let post = input.into_post(author_id).map_err(DomainError::Validation)?;
        self.ensure_slug_free(&post).await?;

        let post = self.posts.create(post).await.map_err(duplicate_on_constraint)?;
        tracing::info!(post_id = %post.id, slug = %post.slug, status = post.status.label(), "Post created");
        Ok(post)
    }

    pub async fn update_post(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let mut post = self.owned_post(author_id, post_id).await?;
        if changes.is_empty() {
            return Ok(post);
        }
        changes.apply(&mut post).map_err(DomainError::Validation)?;
        self.ensure_slug_free(&post).await?;

        let post = self.posts.update(post).await.map_err(duplicate_on_constraint)?;
        tracing::info!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    /// `Draft -> Published`. Publishing a published post changes nothing.
    pub async fn publish_post(&self, author_id: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let mut post = self.owned_post(author_id, post_id).await?;
        if !post.mark_published() {
            return Ok(post);
        }
        let post = self.posts.update(post).await.map_err(duplicate_on_constraint)?;
        tracing::info!(post_id = %post.id, "Post published");
        Ok(post)
    }

    async fn owned_post(&self, author_id: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id.to_string()))?;
        if post.author_id != author_id {
            tracing::warn!(post_id = %post_id, "Edit attempted by a different author");
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    /// Reject `post` if another post already uses its slug on its publish date.
    async fn ensure_slug_free(&self, post: &Post) -> Result<(), DomainError> {
        let clash = PostQuery::all()
            .on_date(post.publish_date())
            .with_slug(post.slug.clone());
        let taken = self
            .posts
            .fetch(&clash)
            .await?
            .into_iter()
            .any(|other| other.id != post.id);

        if taken {
            return Err(slug_taken(post));
        }
        Ok(())
    }
}

fn slug_taken(post: &Post) -> DomainError {
    DomainError::Duplicate(format!(
        "slug '{}' is already used on {}",
        post.slug,
        post.publish_date()
    ))
}

fn duplicate_on_constraint(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(msg) => DomainError::Duplicate(msg),
        other => DomainError::Repository(other),
    }
}
