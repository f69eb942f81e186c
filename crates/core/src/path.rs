//! Folder paths and object keys
//!
//! Folder paths use the bare convention: no leading or trailing slash, and the
//! bucket root is the empty string. Object keys are what the store sees, so a
//! folder marker key ends with `/` and a folder listing prefix is the folder
//! path followed by `/`.

use crate::error::{Error, Result};

/// Normalize a user or store supplied folder path
///
/// Leading, trailing and repeated slashes are dropped, so `/a//b/` becomes
/// `a/b` and `/` becomes the root path `""`.
pub fn normalize_folder_path(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

/// Non-empty `/`-separated segments of a key or path
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Parent of a normalized folder path, `None` for the root
pub fn parent_path(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    match path.rfind('/') {
        Some(pos) => Some(&path[..pos]),
        None => Some(""),
    }
}

/// Last segment of a normalized path (the whole path when it has one segment)
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Join a child name onto a normalized folder path
pub fn join_path(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

/// Prefix under which every object of `folder` is stored
///
/// `""` for the root, `"{folder}/"` otherwise.
pub fn folder_prefix(folder: &str) -> String {
    let folder = normalize_folder_path(folder);
    if folder.is_empty() {
        folder
    } else {
        format!("{folder}/")
    }
}

/// Key of the zero-byte marker object that represents an empty folder
pub fn folder_marker_key(folder: &str, name: &str) -> Result<String> {
    let name = validate_name(name)?;
    Ok(format!("{}{name}/", folder_prefix(folder)))
}

/// Key for uploading `relative` (a file name or a relative path) into `folder`
///
/// Windows separators in `relative` are converted to `/`.
pub fn upload_key(folder: &str, relative: &str) -> Result<String> {
    let relative = relative.replace('\\', "/");
    let relative = normalize_folder_path(&relative);
    if relative.is_empty() {
        return Err(Error::InvalidPath("Upload name cannot be empty".into()));
    }
    if segments(&relative).any(|s| s == "." || s == "..") {
        return Err(Error::InvalidPath(format!(
            "Upload path '{relative}' must not contain '.' or '..' segments"
        )));
    }
    Ok(format!("{}{relative}", folder_prefix(folder)))
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim_end_matches('/');
    if name.is_empty() {
        return Err(Error::InvalidPath("Folder name cannot be empty".into()));
    }
    if name.contains('/') {
        return Err(Error::InvalidPath(format!(
            "Folder name '{name}' must not contain '/'"
        )));
    }
    Ok(name)
}
