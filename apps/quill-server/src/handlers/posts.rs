//! Authoring API. Every route requires a bearer token.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use quill_core::domain::{NewPost, PostChanges};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, UpdatePostRequest};
use uuid::Uuid;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.authoring.author_posts(identity.user_id).await?;
    let posts: Vec<_> = posts.into_iter().map(views::post_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let status = match body.status.as_deref() {
        None => None,
        Some(raw) => Some(views::parse_status(raw).ok_or_else(|| {
            AppError::Validation(BTreeMap::from([(
                "status".to_string(),
                vec![format!("Select a valid choice. {raw} is not one of the available choices.")],
            )]))
        })?),
    };

    let input = NewPost {
        title: body.title,
        slug: body.slug,
        body: body.body,
        publish: body.publish,
        status,
    };
    let post = state.authoring.create_post(identity.user_id, input).await?;
    tracing::debug!(author_id = %identity.user_id, post_id = %post.id, "Draft saved via API");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        views::post_response(post),
        "Post created",
    )))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let changes = PostChanges {
        title: body.title,
        slug: body.slug,
        body: body.body,
        publish: body.publish,
    };
    let post = state
        .authoring
        .update_post(identity.user_id, path.into_inner(), changes)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_response(post))))
}

/// POST /api/posts/{id}/publish
pub async fn publish_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .authoring
        .publish_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_response(post))))
}
