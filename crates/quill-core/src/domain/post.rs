use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use validator::Validate;

use super::slug::{SLUG_PATTERN, slugify};
use super::validation::FieldErrors;

pub const TITLE_MAX_CHARS: u64 = 250;
pub const SLUG_MAX_CHARS: u64 = 250;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
        }
    }
}

/// Post entity - a blog post written by a single author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: PostStatus,
}

impl Post {
    /// Create a new draft, published "now" unless told otherwise.
    pub fn new(author_id: Uuid, title: String, slug: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            body,
            publish: now,
            created_at: now,
            updated_at: now,
            status: PostStatus::Draft,
        }
    }

    /// Calendar date (UTC) the slug is unique within.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Canonical path of the detail page: `/blog/{year}/{month}/{day}/{slug}/`.
    pub fn detail_path(&self) -> String {
        let date = self.publish_date();
        format!(
            "/blog/{}/{}/{}/{}/",
            date.year(),
            date.month(),
            date.day(),
            self.slug
        )
    }

    /// Move the post to `Published`. Returns `false` when it already was.
    pub fn mark_published(&mut self) -> bool {
        if self.is_published() {
            return false;
        }
        self.status = PostStatus::Published;
        self.touch();
        true
    }

    /// Refresh `updated_at`; called on every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub slug: Option<String>,
    pub body: String,
    pub publish: Option<DateTime<Utc>>,
    pub status: Option<PostStatus>,
}

impl NewPost {
    /// Validate and build the draft for `author_id`.
    pub fn into_post(self, author_id: Uuid) -> Result<Post, FieldErrors> {
        let title = self.title.trim().to_string();
        let slug = match self.slug.map(|s| s.trim().to_string()) {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&title),
        };

        TextFields {
            title: Some(title.clone()),
            slug: Some(slug.clone()),
        }
        .check()?;

        let mut post = Post::new(author_id, title, slug, self.body);
        if let Some(publish) = self.publish {
            post.publish = publish;
        }
        post.status = self.status.unwrap_or_default();
        Ok(post)
    }
}

/// Partial edit of an existing post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub publish: Option<DateTime<Utc>>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.body.is_none() && self.publish.is_none()
    }

    /// Apply the changes to `post`, refreshing `updated_at` on success.
    pub fn apply(self, post: &mut Post) -> Result<(), FieldErrors> {
        let text = TextFields {
            title: self.title.map(|t| t.trim().to_string()),
            slug: self.slug.map(|s| s.trim().to_string()),
        };
        text.check()?;

        if let Some(title) = text.title {
            post.title = title;
        }
        if let Some(slug) = text.slug {
            post.slug = slug;
        }
        if let Some(body) = self.body {
            post.body = body;
        }
        if let Some(publish) = self.publish {
            post.publish = publish;
        }
        post.touch();
        Ok(())
    }
}

/// Title and slug as they will be stored. `None` leaves a field unchecked.
#[derive(Debug, Validate)]
struct TextFields {
    #[validate(length(min = 1, max = TITLE_MAX_CHARS))]
    title: Option<String>,
    #[validate(
        length(min = 1, max = SLUG_MAX_CHARS),
        regex(
            path = *SLUG_PATTERN,
            message = "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens."
        )
    )]
    slug: Option<String>,
}

impl TextFields {
    fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|report| {
            FieldErrors::from_report(&report, |field| match field {
                "title" => self.title.as_deref().unwrap_or_default(),
                _ => self.slug.as_deref().unwrap_or_default(),
            })
        })
    }
}
