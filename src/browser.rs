//! A small file browser for picking `*.txt` files to import.
//!
//! The browser owns its working directory instead of changing the process's,
//! so several browsers (or tests) can coexist.

use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    pub fn describe(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symbolic link",
            EntryKind::Other => "unknown file type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone)]
pub struct FileBrowser {
    cwd: PathBuf,
}

impl FileBrowser {
    /// Start in the process's current directory.
    pub fn new() -> Result<Self> {
        Self::at(env::current_dir()?)
    }

    /// Start in `dir`, which must exist.
    pub fn at(dir: impl AsRef<Path>) -> Result<Self> {
        let cwd = fs::canonicalize(dir)?;
        if !cwd.is_dir() {
            return Err(Error::NotADirectory {
                name: cwd.display().to_string(),
            });
        }
        Ok(Self { cwd })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Every entry in the working directory, sorted by name.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(&self.cwd)? {
            let dirent = dirent?;
            let file_type = dirent.file_type()?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(Entry {
                name: dirent.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// `.` (stay put), `..` (unless at the filesystem root), then the
    /// sub-directories.
    pub fn directories(&self) -> Result<Vec<String>> {
        let mut dirs = vec![".".to_owned()];
        if self.cwd.parent().is_some() {
            dirs.push("..".to_owned());
        }
        dirs.extend(
            self.entries()?
                .into_iter()
                .filter(|e| e.kind == EntryKind::Directory)
                .map(|e| e.name),
        );
        Ok(dirs)
    }

    /// Regular files whose name ends in `.txt`.
    pub fn text_files(&self) -> Result<Vec<String>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.kind == EntryKind::File && e.name.ends_with(".txt"))
            .map(|e| e.name)
            .collect())
    }

    /// Move into one of the names listed by [`directories`](Self::directories).
    pub fn change_dir(&mut self, name: &str) -> Result<()> {
        if !self.directories()?.iter().any(|d| d == name) {
            return Err(Error::NotADirectory {
                name: name.to_owned(),
            });
        }
        if name == "." {
            return Ok(());
        }
        if name == ".." {
            if let Some(parent) = self.cwd.parent() {
                self.cwd = parent.to_path_buf();
            }
        } else {
            self.cwd.push(name);
        }
        Ok(())
    }

    /// Open one of the names listed by [`text_files`](Self::text_files).
    pub fn open(&self, name: &str) -> Result<BufReader<File>> {
        if !self.text_files()?.iter().any(|f| f == name) {
            return Err(Error::NotATextFile {
                name: name.to_owned(),
            });
        }
        Ok(BufReader::new(File::open(self.cwd.join(name))?))
    }
}
