//! Tera-backed renderer for the closure notice template.

use std::path::Path;

use tera::Tera;

use closura_application::{MessageContext, TemplateRenderer};
use closura_core::{AppError, AppResult};

/// Renders the configured notice template with per-record context.
///
/// The template is read and parsed once at startup, so a broken template
/// fails the run before any account is fetched.
#[derive(Clone)]
pub struct TeraTemplateRenderer {
    engine: Tera,
    template_name: String,
}

impl TeraTemplateRenderer {
    /// Loads and parses the template file from the configured directory.
    pub fn load(directory: &Path, file_name: &str) -> AppResult<Self> {
        let path = directory.join(file_name);
        let source = std::fs::read_to_string(&path).map_err(|error| {
            AppError::Template(format!(
                "failed to read template {}: {error}",
                path.display()
            ))
        })?;

        let mut engine = Tera::default();
        engine.add_raw_template(file_name, &source).map_err(|error| {
            AppError::Template(format!("failed to parse template {file_name}: {error}"))
        })?;

        Ok(Self {
            engine,
            template_name: file_name.to_owned(),
        })
    }
}

impl TemplateRenderer for TeraTemplateRenderer {
    fn render(&self, context: &MessageContext<'_>) -> AppResult<String> {
        let mut values = tera::Context::new();
        values.insert("membername", context.member_name);
        values.insert("emaildate", &context.email_date);
        values.insert("year", &context.year);

        self.engine
            .render(&self.template_name, &values)
            .map_err(|error| {
                AppError::Template(format!(
                    "failed to render template {}: {error}",
                    self.template_name
                ))
            })
    }
}
