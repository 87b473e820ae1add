//! End-to-end route tests.
//!
//! Each test builds the full app against a temporary database and upload
//! directory, then drives it through the HTTP surface.

use std::collections::HashSet;
use std::path::PathBuf;

use actix_web::http::{StatusCode, header};
use actix_web::{App, cookie::Cookie, test, web};
use tempfile::TempDir;

use internship_registry::api;
use internship_registry::config::{Config, Environment};
use internship_registry::db::{DbPool, migrations, queries};
use internship_registry::services::{Category, FileStore};
use internship_registry::views::Views;

const MULTIPART_BOUNDARY: &str = "----registry-test-boundary";

struct TestContext {
    pool: DbPool,
    store: FileStore,
    config: web::Data<Config>,
    views: web::Data<Views>,
    _dir: TempDir,
}

impl TestContext {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let allowed: HashSet<String> = ["png", "jpg", "jpeg", "pdf"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let config = Config {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: format!("file:{}", dir.path().join("test.db").display()),
            data_dir: dir.path().join("uploads"),
            allowed_extensions: allowed.clone(),
            print_roll_start: 37,
            print_roll_end: 54,
            max_upload_size: 1024 * 1024,
        };

        let pool = DbPool::new(&config).unwrap();
        migrations::run_migrations(&pool).unwrap();

        let store = FileStore::new(config.data_dir.clone(), allowed);
        store.ensure_dirs().await.unwrap();

        TestContext {
            pool,
            store,
            config: web::Data::new(config),
            views: web::Data::new(Views::new()),
            _dir: dir,
        }
    }
}

macro_rules! test_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.pool.clone()))
                .app_data(web::Data::new($ctx.store.clone()))
                .app_data($ctx.views.clone())
                .app_data($ctx.config.clone())
                .configure(api::configure_page_routes)
                .configure(api::configure_internship_routes)
                .configure(api::configure_diary_routes)
                .configure(api::configure_certificate_routes)
                .configure(api::configure_file_routes)
                .configure(api::configure_printable_routes),
        )
        .await
    };
}

/// Build a multipart/form-data body with text fields and an optional file part.
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}

fn location(resp: &actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn stored_files(dir: PathBuf) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[actix_web::test]
async fn landing_page_renders() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn add_internship_redirects_to_dashboard_and_lists_by_roll() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    for (roll, name) in [("40", "Asha"), ("38", "Binod"), ("9", "Chitra")] {
        let req = test::TestRequest::post()
            .uri("/add")
            .set_form([("roll", roll), ("student_name", name)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/dashboard");
    }

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    // Lexicographic roll order: "38" < "40" < "9"
    let binod = body.find("Binod").unwrap();
    let asha = body.find("Asha").unwrap();
    let chitra = body.find("Chitra").unwrap();
    assert!(binod < asha && asha < chitra);
}

#[actix_web::test]
async fn add_internship_missing_fields_creates_nothing() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    for form in [
        vec![("roll", ""), ("student_name", "Asha")],
        vec![("roll", "  "), ("student_name", "Asha")],
        vec![("roll", "40"), ("student_name", "")],
    ] {
        let req = test::TestRequest::post()
            .uri("/add")
            .set_form(form)
            .to_request();
        let resp = test::call_service(&app, req).await;

        // Back to the form, with a flash error attached
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/add");
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("flash=danger:"));
    }

    let conn = ctx.pool.connection();
    assert!(queries::list_internships(&conn).unwrap().is_empty());
}

#[actix_web::test]
async fn flash_message_shows_once_then_clears() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/add")
        .cookie(Cookie::new(
            "flash",
            "danger:Roll%20and%20Student%20name%20required",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The response clears the cookie
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("flash="));
    assert!(set_cookie.contains("Max-Age=0"));

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Roll and Student name required"));
}

#[actix_web::test]
async fn diary_upload_stores_file_and_record() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    let bytes = b"png bytes for the diary scan";
    let (content_type, body) = multipart_body(&[("roll", "45")], Some(("scan.png", bytes)));
    let req = test::TestRequest::post()
        .uri("/diary")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/diary");

    // Exactly one record, referencing a file that exists on disk
    let diaries = {
        let conn = ctx.pool.connection();
        queries::list_diaries(&conn, 50).unwrap()
    };
    assert_eq!(diaries.len(), 1);
    assert_eq!(diaries[0].roll, "45");
    let stored = diaries[0].filename.clone();
    assert!(stored.starts_with("45_"));
    assert!(stored.ends_with("_scan.png"));

    let on_disk = stored_files(ctx.store.category_dir(Category::Diaries));
    assert_eq!(on_disk, vec![stored.clone()]);

    // Fetching the stored name returns the exact uploaded bytes
    let req = test::TestRequest::get()
        .uri(&format!("/uploads/diaries/{stored}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = test::read_body(resp).await;
    assert_eq!(fetched.as_ref(), bytes);

    // The diary page lists the upload
    let resp = test::call_service(&app, test::TestRequest::get().uri("/diary").to_request()).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(&stored));
}

#[actix_web::test]
async fn diary_upload_rejects_disallowed_extension() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    let (content_type, body) =
        multipart_body(&[("roll", "45")], Some(("notes.txt", b"plain text")));
    let req = test::TestRequest::post()
        .uri("/diary")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/diary");

    let conn = ctx.pool.connection();
    assert!(queries::list_diaries(&conn, 50).unwrap().is_empty());
    assert!(stored_files(ctx.store.category_dir(Category::Diaries)).is_empty());
}

#[actix_web::test]
async fn diary_upload_requires_roll_and_file() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    // No file part
    let (content_type, body) = multipart_body(&[("roll", "45"), ("title", "Week 1")], None);
    let req = test::TestRequest::post()
        .uri("/diary")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/diary");

    // Blank roll
    let (content_type, body) = multipart_body(&[("roll", "  ")], Some(("scan.png", b"bytes")));
    let req = test::TestRequest::post()
        .uri("/diary")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let conn = ctx.pool.connection();
    assert!(queries::list_diaries(&conn, 50).unwrap().is_empty());
    assert!(stored_files(ctx.store.category_dir(Category::Diaries)).is_empty());
}

#[actix_web::test]
async fn certificate_upload_stores_file_and_record() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    let bytes = b"%PDF-1.4 fake certificate";
    let (content_type, body) = multipart_body(
        &[("roll", "40"), ("cert_type", "completion"), ("issued_by", "Acme")],
        Some(("cert.pdf", bytes)),
    );
    let req = test::TestRequest::post()
        .uri("/certificates")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/certificates");

    let certs = {
        let conn = ctx.pool.connection();
        queries::list_certificates(&conn, 50).unwrap()
    };
    assert_eq!(certs.len(), 1);
    assert_eq!(certs[0].cert_type.as_deref(), Some("completion"));

    let req = test::TestRequest::get()
        .uri(&format!("/uploads/certificates/{}", certs[0].filename))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), bytes);
}

#[actix_web::test]
async fn serving_refuses_path_traversal() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    // A file outside the category directories must stay unreachable
    std::fs::write(ctx.config.data_dir.join("secret.txt"), b"secret").unwrap();

    for uri in [
        "/uploads/certificates/..%2F..%2Fetc%2Fpasswd",
        "/uploads/certificates/..%2Fsecret.txt",
        "/uploads/diaries/..%5C..%5Csecret.txt",
        "/uploads/attachments/anything.png",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri: {uri}");
    }
}

#[actix_web::test]
async fn serving_unknown_file_is_not_found() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/uploads/diaries/45_1_missing.png")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn printable_diary_filters_to_roll_range() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    for roll in ["45", "12"] {
        let (content_type, body) =
            multipart_body(&[("roll", roll)], Some(("scan.png", b"bytes")));
        let req = test::TestRequest::post()
            .uri("/diary")
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/print/diary").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    assert!(body.contains("<td>45</td>"));
    assert!(!body.contains("<td>12</td>"));
}

#[actix_web::test]
async fn printable_certificates_checklist_marks_presence_once() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    // Two certificates for roll 40 still check a single entry
    for _ in 0..2 {
        let (content_type, body) =
            multipart_body(&[("roll", "40")], Some(("cert.pdf", b"bytes")));
        let req = test::TestRequest::post()
            .uri("/certificates")
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/print/certificates").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    // 18 checklist rows, exactly one marked present
    assert_eq!(body.matches("class=\"absent\"").count(), 17);
    assert_eq!(body.matches("class=\"present\"").count(), 1);
    assert!(body.contains("<td>37</td>"));
    assert!(body.contains("<td>54</td>"));
}
