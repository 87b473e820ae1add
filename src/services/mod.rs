//! Business logic services.

pub mod storage;
pub mod upload;

pub use storage::{Category, FileStore};
pub use upload::{UploadForm, parse_upload_form};
