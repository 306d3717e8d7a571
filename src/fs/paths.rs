//! Download path and filename management.

use std::path::{Path, PathBuf};

use directories::UserDirs;

use crate::error::Result;

/// Folder created under a custom output base for all downloads.
const DOWNLOAD_FOLDER: &str = "Downloads";

/// Replace path-hostile characters in a directory name with underscores.
pub fn sanitize_directory_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        "untitled".to_string()
    } else {
        sanitized
    }
}

/// Create (if absent) and return the directory the episode file is written
/// into: `<base>/<sanitized title>`.
///
/// The base is `<custom>/Downloads` when a custom path is given, otherwise
/// the user's Downloads directory.
pub fn create_download_directory(title: &str, custom_base: Option<&Path>) -> Result<PathBuf> {
    let base = match custom_base {
        Some(base) => base.join(DOWNLOAD_FOLDER),
        None => UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from(DOWNLOAD_FOLDER)),
    };

    let path = base.join(sanitize_directory_name(title));
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Episode file name: `<slug>-<height>p.mp4`.
pub fn episode_filename(slug: &str, height: u32) -> String {
    format!("{}-{}p.mp4", slug, height)
}
