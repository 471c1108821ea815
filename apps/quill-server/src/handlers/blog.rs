//! Public blog pages: the index, a single post and the share form.

use actix_web::{HttpRequest, HttpResponse, web};
use quill_core::domain::ShareForm;
use quill_shared::ApiResponse;
use url::form_urlencoded;
use uuid::Uuid;

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// The last `page` value of a query string. Repeats and undecodable pairs
/// never fail the request.
fn page_param(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .last()
}

/// GET /blog/?page=N
pub async fn post_list(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let page = page_param(req.query_string());
    let page = state.blog.list_posts(page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_list_response(page))))
}

/// GET /blog/{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let post = state.blog.post_detail(year, month, day, &slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_response(post))))
}

/// GET /blog/{id}/share/
pub async fn share_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let site = views::site_url(&state, &req)?;
    let outcome = state.blog.share_post(path.into_inner(), None, &site).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::share_response(outcome))))
}

/// POST /blog/{id}/share/
///
/// Accepts a urlencoded form or a JSON body. An invalid form is echoed back
/// with its field errors and a 422 status.
pub async fn share_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Either<web::Form<ShareForm>, web::Json<ShareForm>>,
) -> AppResult<HttpResponse> {
    let form = match body {
        web::Either::Left(form) => form.into_inner(),
        web::Either::Right(json) => json.into_inner(),
    };
    let site = views::site_url(&state, &req)?;
    let outcome = state
        .blog
        .share_post(path.into_inner(), Some(form), &site)
        .await?;

    if outcome.sent() {
        Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
            views::share_response(outcome),
            "Post shared",
        )))
    } else {
        Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::rejected(
            views::share_response(outcome),
            "Please correct the errors below.",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::page_param;

    #[test]
    fn test_page_param_keeps_the_last_value() {
        assert_eq!(page_param("page=1&page=2").as_deref(), Some("2"));
        assert_eq!(page_param("sort=new&page=%33").as_deref(), Some("3"));
        assert_eq!(page_param("page="), Some(String::new()));
        assert_eq!(page_param("pages=2"), None);
        assert_eq!(page_param(""), None);
    }
}
