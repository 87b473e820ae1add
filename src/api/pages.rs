//! Landing page and internship dashboard.

use actix_web::{HttpRequest, HttpResponse, get, web};
use minijinja::context;

use crate::db::{DbPool, queries};
use crate::error::AppResult;
use crate::views::Views;

use super::render_page;

#[get("/")]
async fn index(req: HttpRequest, views: web::Data<Views>) -> AppResult<HttpResponse> {
    render_page(&views, &req, "index.html", context! {})
}

/// Dashboard: every internship record, ordered by roll.
#[get("/dashboard")]
async fn dashboard(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    views: web::Data<Views>,
) -> AppResult<HttpResponse> {
    let internships = {
        let conn = pool.connection();
        queries::list_internships(&conn)?
    };

    render_page(&views, &req, "dashboard.html", context! { internships })
}

/// Configure landing and dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(dashboard);
}
