//! Route handler modules, one per page group.

pub mod certificates;
pub mod diaries;
pub mod files;
pub mod internships;
pub mod pages;
pub mod printable;

pub use certificates::configure_routes as configure_certificate_routes;
pub use diaries::configure_routes as configure_diary_routes;
pub use files::configure_routes as configure_file_routes;
pub use internships::configure_routes as configure_internship_routes;
pub use pages::configure_routes as configure_page_routes;
pub use printable::configure_routes as configure_printable_routes;

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse};
use minijinja::{Value, context};

use crate::error::AppResult;
use crate::flash;
use crate::views::Views;

/// How many records the diary and certificate list pages show.
pub(crate) const RECENT_UPLOADS_LIMIT: u32 = 50;

/// Render a page template, consuming any pending flash message.
pub(crate) fn render_page(
    views: &Views,
    req: &HttpRequest,
    template: &str,
    ctx: Value,
) -> AppResult<HttpResponse> {
    let flash = flash::take(req);
    let had_flash = flash.is_some();

    let html = views.render(template, context! { flash => flash, ..ctx })?;

    let mut builder = HttpResponse::Ok();
    builder.content_type(ContentType::html());
    if had_flash {
        flash::clear(&mut builder);
    }
    Ok(builder.body(html))
}
