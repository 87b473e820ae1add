//! Printable roster views for the configured roll range.

use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, get, web};
use minijinja::context;
use serde::Serialize;

use crate::config::Config;
use crate::db::{DbPool, queries};
use crate::error::AppResult;
use crate::models::Certificate;
use crate::views::Views;

use super::render_page;

/// One checklist row on the printable certificate view.
#[derive(Debug, Clone, Serialize)]
pub struct RollPresence {
    pub roll: String,
    pub present: bool,
}

/// Build the certificate checklist for a roll range.
///
/// Every roll in the range gets exactly one entry, defaulting to absent;
/// any number of certificate records for a roll marks it present once.
pub fn certificate_presence(rolls: &[String], certificates: &[Certificate]) -> Vec<RollPresence> {
    let present: HashSet<&str> = certificates.iter().map(|c| c.roll.as_str()).collect();

    rolls
        .iter()
        .map(|roll| RollPresence {
            roll: roll.clone(),
            present: present.contains(roll.as_str()),
        })
        .collect()
}

/// Diary submissions for the printable roll range, ordered by roll.
#[get("/print/diary")]
async fn print_diary(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    views: web::Data<Views>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let rolls = config.print_rolls();
    let diaries = {
        let conn = pool.connection();
        queries::list_diaries_by_rolls(&conn, &rolls)?
    };

    render_page(&views, &req, "print_diary.html", context! { diaries })
}

/// Certificate checklist for the printable roll range.
#[get("/print/certificates")]
async fn print_certificates(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    views: web::Data<Views>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let rolls = config.print_rolls();
    let certificates = {
        let conn = pool.connection();
        queries::list_certificates_by_rolls(&conn, &rolls)?
    };

    let presence = certificate_presence(&rolls, &certificates);

    render_page(
        &views,
        &req,
        "print_certificates.html",
        context! { presence },
    )
}

/// Configure printable view routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(print_diary).service(print_certificates);
}
