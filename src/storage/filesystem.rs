//! The filesystem backing the server: a root directory on local disk that
//! no client-supplied path can escape.

use super::{Error, ErrorKind, Fileinfo, Result};

use std::ffi::OsString;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::io::AsyncSeekExt;

/// Serves files from a root directory. When the root is `/srv/ftp` and a
/// client asks for `hello.txt`, it gets `/srv/ftp/hello.txt`; paths that
/// resolve outside the root are refused before any filesystem call.
#[derive(Debug)]
pub(crate) struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Filesystem { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a client-supplied path against the session working
    /// directory and returns the host path, or `AccessDenied` when the
    /// result would leave the root.
    ///
    /// The resolution is purely textual: separators are normalized, `.`
    /// segments are dropped and `..` pops one level, clamping at the root.
    /// Nothing here touches the filesystem.
    pub fn resolve(&self, cwd: &Path, arg: &str) -> Result<PathBuf> {
        let arg = arg.replace('\\', "/");
        let mut stack: Vec<OsString> = if arg.starts_with('/') {
            Vec::new()
        } else {
            cwd.strip_prefix(&self.root)
                .map_err(|_| Error::from(ErrorKind::AccessDenied))?
                .components()
                .map(|c| c.as_os_str().to_os_string())
                .collect()
        };
        for segment in arg.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    // Popping an empty stack means `..` at the root: stay put.
                    stack.pop();
                }
                name => stack.push(name.into()),
            }
        }
        let mut path = self.root.clone();
        path.extend(&stack);
        if !path.starts_with(&self.root) {
            return Err(ErrorKind::AccessDenied.into());
        }
        Ok(path)
    }

    pub async fn metadata(&self, path: &Path) -> Result<std::fs::Metadata> {
        tokio::fs::symlink_metadata(path).await.map_err(Error::from)
    }

    /// Lists a directory, sorted by name. Entries whose metadata cannot be
    /// read are skipped rather than failing the whole listing.
    pub async fn list(&self, path: &Path) -> Result<Vec<Fileinfo>> {
        let mut rd = tokio::fs::read_dir(path).await?;
        let mut entries: Vec<Fileinfo> = Vec::new();
        while let Some(entry) = rd.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(Fileinfo { name, metadata });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub async fn open_read(&self, path: &Path, offset: u64) -> Result<tokio::fs::File> {
        let mut file = tokio::fs::File::open(path).await?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset)).await?;
        }
        Ok(file)
    }

    /// Opens a file for writing, creating missing parent directories.
    /// Without an offset the file is truncated; with one it is cut to the
    /// offset and positioned there, which is what REST + STOR wants.
    pub async fn create_write(&self, path: &Path, offset: u64) -> Result<tokio::fs::File> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if offset == 0 {
            return Ok(tokio::fs::File::create(path).await?);
        }
        let mut file = tokio::fs::OpenOptions::new().write(true).create(true).open(path).await?;
        file.set_len(offset).await?;
        file.seek(SeekFrom::Start(offset)).await?;
        Ok(file)
    }

    pub async fn open_append(&self, path: &Path) -> Result<tokio::fs::File> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::OpenOptions::new().append(true).create(true).open(path).await?;
        Ok(file)
    }

    pub async fn del(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path).await.map_err(Error::from)
    }

    pub async fn mkd(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await.map_err(Error::from)
    }

    /// Removes a directory, refusing when it still has entries.
    pub async fn rmd(&self, path: &Path) -> Result<()> {
        let mut rd = tokio::fs::read_dir(path).await?;
        if rd.next_entry().await?.is_some() {
            return Err(ErrorKind::DirectoryNotEmpty.into());
        }
        tokio::fs::remove_dir(path).await.map_err(Error::from)
    }

    pub async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        tokio::fs::rename(from, to).await.map_err(Error::from)
    }
}
