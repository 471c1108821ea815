//! Visitor-facing operations: the post index, post detail and sharing.

use std::sync::Arc;

use chrono::NaiveDate;
use url::Url;
use uuid::Uuid;

use crate::domain::{FieldErrors, POSTS_PER_PAGE, Page, Paginator, Post, ShareForm, ShareState};
use crate::error::DomainError;
use crate::ports::{MailMessage, Mailer, PostQuery, PostRepository};

/// What the share form looks like after a request.
#[derive(Debug, Clone)]
pub struct ShareOutcome {
    pub post: Post,
    /// The submitted data, or an empty form on a read request.
    pub form: ShareForm,
    pub errors: FieldErrors,
    pub state: ShareState,
}

impl ShareOutcome {
    pub fn sent(&self) -> bool {
        self.state == ShareState::Submitted
    }
}

/// Read side of the blog plus the share-by-email form.
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    mailer: Arc<dyn Mailer>,
    sender: String,
    per_page: u64,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        mailer: Arc<dyn Mailer>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            posts,
            mailer,
            sender: sender.into(),
            per_page: POSTS_PER_PAGE,
        }
    }

    /// One page of published posts, newest first.
    ///
    /// `page` is the raw query parameter; bad values never fail, see
    /// [`Paginator::resolve`].
    pub async fn list_posts(&self, page: Option<&str>) -> Result<Page<Post>, DomainError> {
        let scope = PostQuery::published();
        let total = self.posts.count(&scope).await?;
        let paginator = Paginator::new(total, self.per_page);
        let number = paginator.resolve(page);

        let (offset, limit) = paginator.bounds(number);
        let items = self.posts.fetch(&scope.slice(offset, limit)).await?;

        tracing::debug!(
            page = number,
            total_pages = paginator.num_pages(),
            items = items.len(),
            "Listed published posts"
        );
        Ok(paginator.page(number, items))
    }

    /// The published post with `slug` on the given publish date.
    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<Post, DomainError> {
        let key = || format!("{year}/{month}/{day}/{slug}");
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DomainError::post_not_found(key()))?;

        self.posts
            .fetch_one(&PostQuery::published().on_date(date).with_slug(slug))
            .await?
            .ok_or_else(|| DomainError::post_not_found(key()))
    }

    /// Show or process the share form for a published post.
    ///
    /// `submission` is `None` for a read request. A valid submission sends
    /// exactly one message to the `to` address; the link in it is the post's
    /// detail page resolved against `site`.
    pub async fn share_post(
        &self,
        post_id: Uuid,
        submission: Option<ShareForm>,
        site: &Url,
    ) -> Result<ShareOutcome, DomainError> {
        let post = self
            .posts
            .fetch_one(&PostQuery::published().with_id(post_id))
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id.to_string()))?;

        let Some(form) = submission else {
            return Ok(ShareOutcome {
                post,
                form: ShareForm::default(),
                errors: FieldErrors::default(),
                state: ShareState::Unsubmitted,
            });
        };

        let share = match form.clean() {
            Ok(share) => share,
            Err(errors) => {
                tracing::debug!(post_id = %post.id, fields = %errors, "Share form rejected");
                return Ok(ShareOutcome {
                    post,
                    form,
                    errors,
                    state: ShareState::Unsubmitted,
                });
            }
        };

        let post_url = site
            .join(&post.detail_path())
            .map_err(|e| DomainError::Internal(format!("cannot build post URL: {e}")))?;

        let message = MailMessage {
            subject: format!("{} recommends you read {}", share.name, post.title),
            body: format!(
                "Read {} at {}\n\n{}'s comments: {}",
                post.title, post_url, share.name, share.comments
            ),
            from: self.sender.clone(),
            to: vec![share.to],
        };
        self.mailer.send(&message).await?;

        tracing::info!(post_id = %post.id, "Post shared by email");
        Ok(ShareOutcome {
            post,
            form,
            errors: FieldErrors::default(),
            state: ShareState::Submitted,
        })
    }
}
