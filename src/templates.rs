use tera::Tera;

use crate::config::UiConfig;
use crate::error::AppError;
use crate::page::StatusView;

/// Template rendering the status page
pub const STATUS_TEMPLATE: &str = "status.html";

/// Initialize the Tera template engine from `dir`
pub fn init_templates(dir: &str) -> Result<Tera, AppError> {
    let glob = format!("{}/**/*.html", dir.trim_end_matches('/'));
    let tera = Tera::new(&glob)?;

    if !tera.get_template_names().any(|name| name == STATUS_TEMPLATE) {
        return Err(AppError::Internal(format!(
            "Template '{}' not found under '{}'",
            STATUS_TEMPLATE, dir
        )));
    }

    Ok(tera)
}

/// Render the status page for one view of a mounted page.
///
/// Pure given its inputs: the same view always produces the same markup.
pub fn render_status(tera: &Tera, ui: &UiConfig, view: &StatusView) -> Result<String, AppError> {
    let mut context = tera::Context::new();
    context.insert("config", ui);
    context.insert("view", view);
    Ok(tera.render(STATUS_TEMPLATE, &context)?)
}
