use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Write-then-rename output file: readers never see a half-written result.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temporary sibling of `target`; refuses an existing target unless `force`.
    pub(crate) fn open(target: &Path, force: bool) -> Result<Self> {
        if target == Path::new("-") {
            bail!("[io::fs] stdout is not supported; provide a real file path");
        }
        let parent = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("[io::fs] create dir {}", parent.display()))?;
        if !force && target.exists() {
            bail!("[io::fs] refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let tmp = NamedTempFile::new_in(parent).context("[io::fs] create temp file")?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Flush, fsync and move the temporary file onto the target.
    pub(crate) fn finalize(mut self) -> Result<()> {
        self.tmp.flush().context("[io::fs] flush temp file")?;
        self.tmp.as_file().sync_all().ok();
        let target = self.target;
        self.tmp.persist(&target)
            .with_context(|| format!("[io::fs] rename to {}", target.display()))?;
        if let Some(dir) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        log::debug!("wrote {}", target.display());
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> io::Result<()> { self.tmp.flush() }
}

/// Write `bytes` to `target` atomically.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8], force: bool) -> Result<()> {
    let mut sink = PendingWrite::open(target, force)?;
    sink.write_all(bytes)
        .with_context(|| format!("[io::fs] write {}", target.display()))?;
    sink.finalize()
}
