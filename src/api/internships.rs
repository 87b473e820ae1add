//! Internship creation form.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use minijinja::context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::{DbPool, queries};
use crate::error::AppResult;
use crate::flash::{self, Level};
use crate::models::NewInternship;
use crate::views::Views;

use super::render_page;

/// Form body for the add-internship POST.
#[derive(Debug, Deserialize)]
pub struct AddInternshipForm {
    #[serde(default)]
    pub roll: String,
    #[serde(default)]
    pub student_name: String,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub note: Option<String>,
}

#[get("/add")]
async fn add_internship_form(req: HttpRequest, views: web::Data<Views>) -> AppResult<HttpResponse> {
    render_page(&views, &req, "add_internship.html", context! {})
}

/// Create an internship record.
///
/// Missing roll or student name flashes an error and redirects back to the
/// form without creating anything; success redirects to the dashboard.
#[post("/add")]
async fn add_internship(
    form: web::Form<AddInternshipForm>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    if form.roll.trim().is_empty() || form.student_name.trim().is_empty() {
        warn!("Internship submission rejected: missing roll or student name");
        return Ok(flash::redirect_with_flash(
            "/add",
            Level::Danger,
            "Roll and Student name required",
        ));
    }

    let new = NewInternship::from_form(
        form.roll,
        form.student_name,
        form.company,
        form.start_date,
        form.end_date,
        form.note,
    );

    let id = {
        let conn = pool.connection();
        queries::insert_internship(&conn, &new)?
    };

    info!("Internship {} added for roll {}", id, new.roll.trim());

    Ok(flash::redirect_with_flash(
        "/dashboard",
        Level::Success,
        "Internship added",
    ))
}

/// Configure the internship form routes (one GET, one POST, same path).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(add_internship_form).service(add_internship);
}
