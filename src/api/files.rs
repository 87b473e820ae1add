//! Serving stored upload files.

use actix_files::NamedFile;
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::{Category, FileStore};

/// Stream a stored file with inferred content type.
///
/// The store resolves the name inside the category directory and refuses
/// anything that could escape it; unknown categories and missing files are
/// both a plain 404.
#[get("/uploads/{category}/{filename}")]
async fn serve_upload(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    store: web::Data<FileStore>,
) -> AppResult<HttpResponse> {
    let (category, filename) = path.into_inner();

    let category =
        Category::parse(&category).ok_or_else(|| AppError::NotFound("File".to_string()))?;
    let path = store.resolve(category, &filename)?;

    debug!("Serving {} file: {}", category, filename);

    let file = NamedFile::open_async(&path)
        .await
        .map_err(|_| AppError::NotFound("File".to_string()))?;

    Ok(file.into_response(&req))
}

/// Configure upload-serving routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(serve_upload);
}
