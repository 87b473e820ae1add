//! Server-side view rendering over embedded templates.

use minijinja::{Environment, Value};

use crate::error::AppResult;

/// Templates compiled into the binary. Names match the route views.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    (
        "add_internship.html",
        include_str!("../templates/add_internship.html"),
    ),
    ("diary.html", include_str!("../templates/diary.html")),
    (
        "certificates.html",
        include_str!("../templates/certificates.html"),
    ),
    (
        "print_diary.html",
        include_str!("../templates/print_diary.html"),
    ),
    (
        "print_certificates.html",
        include_str!("../templates/print_certificates.html"),
    ),
];

/// Template environment shared across requests via `web::Data`.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Build the environment from the embedded templates. Called once at
    /// startup; embedded templates failing to parse is a build defect.
    pub fn new() -> Self {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .expect("embedded template failed to parse");
        }
        Views { env }
    }

    /// Render a named view with the given context.
    pub fn render(&self, name: &str, ctx: Value) -> AppResult<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}
