//! Certificate upload form and recent-uploads list.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use minijinja::context;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{DbPool, queries};
use crate::error::{AppError, AppResult};
use crate::flash::{self, Level};
use crate::models::NewCertificate;
use crate::services::{Category, FileStore, parse_upload_form};
use crate::views::Views;

use super::{RECENT_UPLOADS_LIMIT, render_page};

#[get("/certificates")]
async fn certificates_page(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    views: web::Data<Views>,
) -> AppResult<HttpResponse> {
    let certificates = {
        let conn = pool.connection();
        queries::list_certificates(&conn, RECENT_UPLOADS_LIMIT)?
    };

    render_page(&views, &req, "certificates.html", context! { certificates })
}

/// Accept a certificate upload: validate, write the file, then insert the record.
#[post("/certificates")]
async fn upload_certificate(
    mut payload: Multipart,
    pool: web::Data<DbPool>,
    store: web::Data<FileStore>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let form = match parse_upload_form(&mut payload, config.max_upload_size).await {
        Ok(form) => form,
        Err(AppError::Validation(msg)) | Err(AppError::InvalidFile(msg)) => {
            warn!("Certificate upload rejected: {}", msg);
            return Ok(flash::redirect_with_flash(
                "/certificates",
                Level::Danger,
                &msg,
            ));
        }
        Err(e) => return Err(e),
    };

    let (Some(roll), Some(file)) = (form.field("roll"), form.file.as_ref()) else {
        warn!("Certificate upload rejected: missing roll or file");
        return Ok(flash::redirect_with_flash(
            "/certificates",
            Level::Danger,
            "Valid roll and file required (png/jpg/pdf)",
        ));
    };

    if store.check_extension(&file.original_name).is_err() {
        warn!(
            "Certificate upload rejected: disallowed file '{}'",
            file.original_name
        );
        return Ok(flash::redirect_with_flash(
            "/certificates",
            Level::Danger,
            "Valid roll and file required (png/jpg/pdf)",
        ));
    }

    let stored = store
        .save(Category::Certificates, &roll, &file.original_name, &file.data)
        .await?;

    let new = NewCertificate::from_form(
        roll,
        form.field("cert_type"),
        form.field("issued_by"),
        form.field("date"),
        stored,
    );
    let id = {
        let conn = pool.connection();
        queries::insert_certificate(&conn, &new)?
    };

    info!("Certificate {} recorded for roll {}", id, new.roll.trim());

    Ok(flash::redirect_with_flash(
        "/certificates",
        Level::Success,
        "Certificate uploaded",
    ))
}

/// Configure certificate routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(certificates_page).service(upload_certificate);
}
