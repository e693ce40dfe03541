//! HTML views for the document screen, rendered with minijinja.
//!
//! Templates live in `templates/views/` and are compiled into the binary.
//! Auto-escaping is on for every template.

use minijinja::{context, AutoEscape, Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

use crate::features::documents::dtos::ACCEPTED_UPLOAD_TYPES;
use crate::features::workspace::services::ViewSnapshot;

static VIEW_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const PAGE_TEMPLATE: &str = "page.html";

const TEMPLATES: &[(&str, &str)] = &[
    (
        "page.html",
        include_str!("../../../../templates/views/page.html"),
    ),
    (
        "sidebar.html",
        include_str!("../../../../templates/views/sidebar.html"),
    ),
    (
        "main_content.html",
        include_str!("../../../../templates/views/main_content.html"),
    ),
];

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_filter("path_segment", |value: String| {
        urlencoding::encode(&value).into_owned()
    });

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load view template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded view template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    VIEW_ENV.get_or_init(init_environment)
}

/// Render the full two-pane page
pub fn render_page(snapshot: &ViewSnapshot) -> Result<String, ViewError> {
    let template = get_environment()
        .get_template(PAGE_TEMPLATE)
        .map_err(|_| ViewError::NotFound(PAGE_TEMPLATE.to_string()))?;

    template
        .render(context! {
            files => &snapshot.files,
            selected => &snapshot.selected,
            uploading => snapshot.uploading,
            notice => &snapshot.notice,
            accept => Value::from_safe_string(ACCEPTED_UPLOAD_TYPES.to_string()),
        })
        .map_err(|e| ViewError::RenderError(e.to_string()))
}
