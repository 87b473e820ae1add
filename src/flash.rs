//! One-shot flash messages carried across a redirect in a cookie.
//!
//! POST handlers set the cookie on their 303 response; the next rendered
//! page takes the message into its template context and clears the cookie.
//! The payload is URL-encoded user-visible status text only.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, time::Duration};
use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::Serialize;

const FLASH_COOKIE: &str = "flash";

/// Flash severity, mapped to a styling class by the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Danger,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }
}

/// A message taken from the flash cookie, ready for template context.
#[derive(Debug, Clone, Serialize)]
pub struct FlashMessage {
    pub level: String,
    pub message: String,
}

/// 303 redirect with a flash message attached.
pub fn redirect_with_flash(location: &str, level: Level, message: &str) -> HttpResponse {
    let payload = urlencoding::encode(message);
    let cookie = Cookie::build(FLASH_COOKIE, format!("{}:{}", level.as_str(), payload))
        .path("/")
        .http_only(true)
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

/// Plain 303 redirect.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Take the pending flash message from the request, if any.
pub fn take(req: &HttpRequest) -> Option<FlashMessage> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    let (level, payload) = cookie.value().split_once(':')?;
    let level = Level::parse(level)?;
    let message = urlencoding::decode(payload).ok()?.into_owned();

    Some(FlashMessage {
        level: level.as_str().to_string(),
        message,
    })
}

/// Attach a removal cookie so a consumed message does not show twice.
pub fn clear(builder: &mut HttpResponseBuilder) {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.set_max_age(Duration::ZERO);
    builder.cookie(cookie);
}
