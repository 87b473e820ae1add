//! Diary upload form and recent-uploads list.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use minijinja::context;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{DbPool, queries};
use crate::error::{AppError, AppResult};
use crate::flash::{self, Level};
use crate::models::NewDiary;
use crate::services::{Category, FileStore, parse_upload_form};
use crate::views::Views;

use super::{RECENT_UPLOADS_LIMIT, render_page};

#[get("/diary")]
async fn diary_page(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    views: web::Data<Views>,
) -> AppResult<HttpResponse> {
    let diaries = {
        let conn = pool.connection();
        queries::list_diaries(&conn, RECENT_UPLOADS_LIMIT)?
    };

    render_page(&views, &req, "diary.html", context! { diaries })
}

/// Accept a diary upload: validate, write the file, then insert the record.
#[post("/diary")]
async fn upload_diary(
    mut payload: Multipart,
    pool: web::Data<DbPool>,
    store: web::Data<FileStore>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let form = match parse_upload_form(&mut payload, config.max_upload_size).await {
        Ok(form) => form,
        Err(AppError::Validation(msg)) | Err(AppError::InvalidFile(msg)) => {
            warn!("Diary upload rejected: {}", msg);
            return Ok(flash::redirect_with_flash("/diary", Level::Danger, &msg));
        }
        Err(e) => return Err(e),
    };

    let (Some(roll), Some(file)) = (form.field("roll"), form.file.as_ref()) else {
        warn!("Diary upload rejected: missing roll or file");
        return Ok(flash::redirect_with_flash(
            "/diary",
            Level::Danger,
            "Valid roll and file required (png/jpg/pdf)",
        ));
    };

    if store.check_extension(&file.original_name).is_err() {
        warn!(
            "Diary upload rejected: disallowed file '{}'",
            file.original_name
        );
        return Ok(flash::redirect_with_flash(
            "/diary",
            Level::Danger,
            "Valid roll and file required (png/jpg/pdf)",
        ));
    }

    // File first, record second: a record never references a missing file
    let stored = store
        .save(Category::Diaries, &roll, &file.original_name, &file.data)
        .await?;

    let new = NewDiary::from_form(roll, form.field("title"), form.field("date"), stored);
    let id = {
        let conn = pool.connection();
        queries::insert_diary(&conn, &new)?
    };

    info!("Diary {} recorded for roll {}", id, new.roll.trim());

    Ok(flash::redirect_with_flash(
        "/diary",
        Level::Success,
        "Diary uploaded",
    ))
}

/// Configure diary routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(diary_page).service(upload_diary);
}
