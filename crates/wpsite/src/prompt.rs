//! Interactive prompts: folder name, site title, database name.

use dialoguer::Input;
use dialoguer::theme::Theme;

use wpsite_core::{SiteRequest, SiteSlug};

use crate::error::{CliError, prompt_err};

/// Reject input that does not yield a site slug.
#[allow(clippy::ptr_arg)] // dialoguer validators receive `&T`
pub fn validate_folder_name(input: &String) -> Result<(), String> {
    SiteSlug::parse(input).map(|_| ()).map_err(|e| e.to_string())
}

/// Ask for the three site values. Title and database name come pre-filled
/// with defaults derived from the folder name and can be edited.
pub fn collect_site(theme: &dyn Theme) -> Result<SiteRequest, CliError> {
    let raw: String = Input::with_theme(theme)
        .with_prompt("Folder name (e.g. My Blog Name)")
        .validate_with(validate_folder_name)
        .interact_text()
        .map_err(prompt_err)?;

    let defaults = SiteRequest::with_defaults(SiteSlug::parse(&raw)?);
    tracing::debug!(slug = %defaults.slug, "folder name normalized");

    let title: String = Input::with_theme(theme)
        .with_prompt("Site title")
        .with_initial_text(defaults.title.as_str())
        .interact_text()
        .map_err(prompt_err)?;

    let database: String = Input::with_theme(theme)
        .with_prompt("Database name")
        .with_initial_text(defaults.database.as_str())
        .interact_text()
        .map_err(prompt_err)?;

    Ok(SiteRequest::new(defaults.slug, title, database))
}
