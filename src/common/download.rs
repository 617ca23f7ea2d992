use std::{fs::File, io::{Seek, Write}, path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result, bail};
use reqwest::{blocking::Client, redirect::Policy};
use tempfile::NamedTempFile;

/// Write-then-rename wrapper for atomic big-file outputs
struct PendingWrite {
    target: PathBuf,
    tmp: Option<NamedTempFile>,
}

impl PendingWrite {
    /// Open a file for a big write.
    fn open(target: &Path, force: bool) -> Result<Self> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        if !force && target.exists() {
            bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let tmp = NamedTempFile::new_in(super::parent_or_cwd(target))
            .context("create temp file")?;

        Ok(Self { target: target.to_path_buf(), tmp: Some(tmp) })
    }

    /// Finalize the big write.
    fn finalize(mut self) -> Result<()> {
        let tmp = self.tmp.take().context("download already finalized")?;
        tmp.as_file().sync_all().ok(); // best-effort fsync file
        tmp.persist(&self.target)
            .with_context(|| format!("rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }

    fn file(&mut self) -> std::io::Result<&mut File> {
        self.tmp.as_mut()
            .map(|tmp| tmp.as_file_mut())
            .ok_or_else(|| std::io::Error::other("write after finalize"))
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.file()?.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.file()?.flush() }
}

impl Seek for PendingWrite {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> { self.file()?.seek(pos) }
}

fn client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("covidmap/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::limited(10))
        .connect_timeout(Duration::from_secs(30))
        .build()?)
}

/// Download a large file from `file_url` to `out_path`.
pub(crate) fn download_big_file(file_url: &str, out_path: &Path, force: bool) -> Result<()> {
    // Safe big-file write (tempfile -> atomic rename), no accidental overwrite unless --force
    let mut sink = PendingWrite::open(out_path, force)?;

    let mut resp = client()?
        .get(file_url)
        .send()
        .with_context(|| format!("GET {file_url}"))?
        .error_for_status()
        .with_context(|| format!("GET {file_url} returned error status"))?;

    let bytes = std::io::copy(&mut resp, &mut sink)
        .with_context(|| format!("write {}", out_path.display()))?;

    sink.finalize()?;
    log::debug!("[download] {bytes} bytes -> {}", out_path.display());
    Ok(())
}
