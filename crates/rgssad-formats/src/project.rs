//! Editor project stubs
//!
//! RPG Maker only reopens an extracted game once a project file sits next
//! to `Game.ini`. The file content is a fixed per-generation string; nothing
//! from the archive table is needed.

use crate::error::{Result, RgssadError};
use crate::header::ArchiveFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Project file name and content for a format
pub fn project_template(format: ArchiveFormat) -> Option<(&'static str, &'static str)> {
    match format {
        ArchiveFormat::Xp => Some(("Game.rxproj", "RPGXP 1.02")),
        ArchiveFormat::Vx => Some(("Game.rvproj", "RPGVX 1.02")),
        ArchiveFormat::VxAce => Some(("Game.rvproj2", "RPGVXAce 1.02")),
        ArchiveFormat::Invalid => None,
    }
}

/// Write the project stub for `format` into `output_dir`.
///
/// Creates `output_dir` when missing and replaces an existing stub.
pub fn generate_project(format: ArchiveFormat, output_dir: &Path) -> Result<PathBuf> {
    let (file_name, content) = project_template(format)
        .ok_or_else(|| RgssadError::invalid("cannot generate a project for an invalid archive"))?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    fs::write(&path, content)?;

    info!("Generated {} project file {}", format, path.display());
    Ok(path)
}
