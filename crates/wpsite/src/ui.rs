//! Terminal presentation: banner, per-stage progress lines, summary.
//!
//! Everything is written to stderr, alongside the prompts.

use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::Duration;

use dialoguer::console::{self, Term};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use wpsite_core::{CoreError, ProvisionReport, Stage, StageReporter};

use crate::cli::ColorMode;

const BANNER: &str = " WP Cli - Site Installer ";

// ── Color ────────────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Resolve the color mode and apply it to the prompt theme as well.
pub fn apply_color_mode(mode: ColorMode) -> bool {
    let enabled = should_color(mode);
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
    enabled
}

// ── Banner / outro ───────────────────────────────────────────────────

pub fn clear_screen() {
    let term = Term::stderr();
    if term.is_term() {
        // Cosmetic only.
        let _ = term.clear_screen();
    }
}

pub fn intro(color: bool) {
    if color {
        eprintln!("{}\n", BANNER.black().on_magenta());
    } else {
        eprintln!("{BANNER}\n");
    }
}

pub fn outro(report: &ProvisionReport, color: bool) {
    let url = if color {
        report.url.cyan().underline().to_string()
    } else {
        report.url.clone()
    };
    eprintln!();
    eprintln!("Done");
    eprintln!("  Site:   {url}");
    eprintln!("  Folder: {}", report.path.display());
}

// ── Progress ─────────────────────────────────────────────────────────

/// Shows a spinner while a stage runs and leaves one status line per stage.
pub struct ProgressReporter {
    current: Mutex<Option<ProgressBar>>,
    color: bool,
    quiet: bool,
}

impl ProgressReporter {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self {
            current: Mutex::new(None),
            color,
            quiet,
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut slot) = self.current.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn status_line(&self, marker: Marker, stage: Stage, detail: Option<&str>) -> String {
        let symbol = match (marker, self.color) {
            (Marker::Done, true) => "✓".green().to_string(),
            (Marker::Skipped, true) => "–".dimmed().to_string(),
            (Marker::Failed, true) => "✗".red().to_string(),
            (Marker::Done, false) => "✓".to_owned(),
            (Marker::Skipped, false) => "–".to_owned(),
            (Marker::Failed, false) => "✗".to_owned(),
        };
        match detail {
            Some(detail) if self.color => format!("{symbol} {stage}  {}", detail.dimmed()),
            Some(detail) => format!("{symbol} {stage}  {detail}"),
            None => format!("{symbol} {stage}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Done,
    Skipped,
    Failed,
}

impl StageReporter for ProgressReporter {
    fn stage_started(&self, stage: Stage) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.magenta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("{stage}..."));
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.current.lock() {
            *slot = Some(bar);
        }
    }

    fn stage_finished(&self, stage: Stage, summary: Option<&str>) {
        self.clear_spinner();
        if !self.quiet {
            eprintln!("{}", self.status_line(Marker::Done, stage, summary));
        }
    }

    fn stage_skipped(&self, stage: Stage) {
        if !self.quiet {
            eprintln!(
                "{}",
                self.status_line(Marker::Skipped, stage, Some("disabled in config"))
            );
        }
    }

    fn stage_failed(&self, stage: Stage, _error: &CoreError) {
        self.clear_spinner();
        eprintln!("{}", self.status_line(Marker::Failed, stage, None));
    }
}
