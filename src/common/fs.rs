use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result, bail};
use tempfile::Builder;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Error unless the file already exists.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File does not exist: {} (run `covidmap download` first?)", path.display());
    }
    if !path.is_file() {
        bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Directory a sibling temp file for `path` should live in.
pub(crate) fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Produce `path` through `write`, which receives a temporary path next to the target
/// carrying the same extension. The temp file replaces `path` only if `write` succeeds.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let suffix = path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    write_atomically_with_suffix(path, &suffix, write)
}

/// Same as [`write_atomically`], but the temporary path ends in `suffix`
/// whatever the extension of `path`.
pub(crate) fn write_atomically_with_suffix<F>(path: &Path, suffix: &str, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let dir = parent_or_cwd(path);
    ensure_dir_exists(dir)?;

    let tmp = Builder::new()
        .prefix(".covidmap-")
        .suffix(suffix)
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    write(tmp.path())?;

    tmp.persist(path)
        .with_context(|| format!("Failed to move output into place at {}", path.display()))?;
    Ok(())
}

/// Extracts the given `.zip` file to the target directory.
/// If `delete_after` is `true`, removes the `.zip` file after a successful extraction.
pub(crate) fn extract_zip(zip_path: &Path, dest_dir: &Path, delete_after: bool) -> Result<()> {
    let file = fs::File::open(zip_path)
        .map_err(|e| anyhow::anyhow!("failed to open {:?}: {}", zip_path, e))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| anyhow::anyhow!("failed to read zip archive {:?}: {}", zip_path, e))?;

    archive
        .extract(dest_dir)
        .map_err(|e| anyhow::anyhow!("failed to extract {:?} to {:?}: {}", zip_path, dest_dir, e))?;

    if delete_after {
        fs::remove_file(zip_path)
            .map_err(|e| anyhow::anyhow!("failed to delete {:?}: {}", zip_path, e))?;
    }

    Ok(())
}

/// Find the first `.shp` file under `dir` whose file name contains `fragment`
/// (case-insensitive). Candidates are visited in sorted order.
pub(crate) fn find_shapefile(dir: &Path, fragment: &str) -> Result<PathBuf> {
    let fragment = fragment.to_ascii_lowercase();
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| {
            let is_shp = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("shp"));
            let name = path.file_name().map(|n| n.to_string_lossy().to_ascii_lowercase()).unwrap_or_default();
            is_shp && name.contains(&fragment)
        })
        .with_context(|| format!("No .shp file matching {:?} under {}", fragment, dir.display()))
}
