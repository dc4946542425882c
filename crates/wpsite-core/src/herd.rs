// ── Laravel Herd ──
//
// Herd serves every folder under its parked paths as `<folder>.test`;
// `herd secure` issues a local TLS certificate for the current folder.

use std::path::Path;

use crate::process::CommandSpec;

#[derive(Debug, Clone)]
pub struct Herd {
    program: String,
}

impl Herd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `herd secure`, run from inside the site folder.
    pub fn secure(&self, site_dir: &Path) -> CommandSpec {
        CommandSpec::new(self.program.as_str())
            .arg("secure")
            .current_dir(site_dir)
    }
}
