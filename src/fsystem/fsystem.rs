// Definition of the in-memory directory tree. Directories own their files and
// subdirectories outright; the parent link and the cursor are weak references,
// used only for upward navigation and never for freeing anything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::instrument;

use crate::fsystem::errors::{FSErrorType, FileSystemError, Result};

type DirRef = Rc<RefCell<Directory>>;

/// A named file. Files carry no contents, only a creation counter that is
/// bumped each time the same name is touched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub timestamp: u64,
}

/// One row of a directory listing. Subdirectories are flagged so a renderer
/// can append the trailing separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

impl ListingEntry {
    fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: false,
        }
    }

    fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: true,
        }
    }
}

/// What `ls` produced: the merged contents of a directory, or a single-file
/// report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Directory(Vec<ListingEntry>),
    File(FileEntry),
}

#[derive(Debug)]
struct Directory {
    name: String,
    // Full path from the root, segments joined by '/'. The root's path is the
    // empty string so child paths compose without a special case.
    path: String,
    // Both sibling collections are kept in ascending lexicographic name order
    // at all times; insertion splices into place rather than sorting on read.
    files: Vec<FileEntry>,
    subdirs: Vec<DirRef>,
    parent: Option<Weak<RefCell<Directory>>>,
}

impl Directory {
    fn new_root() -> DirRef {
        Rc::new(RefCell::new(Directory {
            name: "root".to_string(),
            path: String::new(),
            files: Vec::new(),
            subdirs: Vec::new(),
            parent: None,
        }))
    }

    fn new_child(name: &str, parent: &DirRef) -> DirRef {
        let path = format!("{}/{}", parent.borrow().path, name);
        Rc::new(RefCell::new(Directory {
            name: name.to_string(),
            path,
            files: Vec::new(),
            subdirs: Vec::new(),
            parent: Some(Rc::downgrade(parent)),
        }))
    }

    fn file_position(&self, name: &str) -> std::result::Result<usize, usize> {
        self.files.binary_search_by(|f| f.name.as_str().cmp(name))
    }

    fn subdir_position(&self, name: &str) -> std::result::Result<usize, usize> {
        self.subdirs
            .binary_search_by(|d| d.borrow().name.as_str().cmp(name))
    }

    fn find_subdir(&self, name: &str) -> Option<DirRef> {
        self.subdir_position(name)
            .ok()
            .map(|i| Rc::clone(&self.subdirs[i]))
    }

    // Merge the two sorted sibling collections into one combined sequence
    // ordered by raw name. On a file/directory name tie the file comes first,
    // matching the order the names were historically collected in.
    fn listing(&self) -> Vec<ListingEntry> {
        let mut entries = Vec::with_capacity(self.files.len() + self.subdirs.len());
        let mut files = self.files.iter().peekable();
        let mut dirs = self.subdirs.iter().peekable();
        loop {
            match (files.peek(), dirs.peek()) {
                (Some(f), Some(d)) => {
                    if f.name.as_str() <= d.borrow().name.as_str() {
                        entries.push(ListingEntry::file(&f.name));
                        files.next();
                    } else {
                        entries.push(ListingEntry::dir(&d.borrow().name));
                        dirs.next();
                    }
                }
                (Some(f), None) => {
                    entries.push(ListingEntry::file(&f.name));
                    files.next();
                }
                (None, Some(d)) => {
                    entries.push(ListingEntry::dir(&d.borrow().name));
                    dirs.next();
                }
                (None, None) => break,
            }
        }
        entries
    }

    // Free a subtree post-order: files first, then each subdirectory
    // recursively. The nodes themselves are dropped as their owning
    // references go out of scope.
    fn clear(dir: &DirRef) {
        let subdirs = {
            let mut d = dir.borrow_mut();
            d.files.clear();
            std::mem::take(&mut d.subdirs)
        };
        for sub in &subdirs {
            Directory::clear(sub);
        }
    }
}

/// One independent file system instance: a tree of directories plus a cursor
/// marking the current directory. Instances share no state, so any number of
/// them can coexist.
pub struct FileSystem {
    root: DirRef,
    cursor: Weak<RefCell<Directory>>,
}

// Names a caller may never create, remove, or treat as a literal entry.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(FileSystemError::new(
            FSErrorType::InvalidName,
            format!("`{name}` is not a usable name"),
        ));
    }
    Ok(())
}

impl FileSystem {
    /// Creates an empty file system with the cursor at its root.
    #[instrument]
    pub fn new() -> FileSystem {
        let root = Directory::new_root();
        let cursor = Rc::downgrade(&root);
        FileSystem { root, cursor }
    }

    // The cursor is a weak reference, so it can outlive the directory it
    // points at. Every operation resolves it through here and fails safely
    // when the directory is gone instead of touching freed state.
    fn current(&self) -> Result<DirRef> {
        self.cursor.upgrade().ok_or_else(|| {
            FileSystemError::new(
                FSErrorType::StaleCursor,
                "the current directory has been removed".to_string(),
            )
        })
    }

    /// Creates a file in the current directory, or bumps its timestamp if it
    /// already exists. An existing subdirectory of the same name shadows the
    /// file: the call succeeds but changes nothing.
    #[instrument(skip(self))]
    pub fn touch(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        let cur = self.current()?;
        let mut dir = cur.borrow_mut();
        if dir.subdir_position(name).is_ok() {
            tracing::info!("subdirectory `{}` shadows the file, nothing to do", name);
            return Ok(());
        }
        match dir.file_position(name) {
            Ok(i) => {
                dir.files[i].timestamp += 1;
                tracing::debug!("bumped `{}` to timestamp {}", name, dir.files[i].timestamp);
            }
            Err(i) => {
                dir.files.insert(
                    i,
                    FileEntry {
                        name: name.to_string(),
                        timestamp: 1,
                    },
                );
                tracing::info!("created file `{}` in `{}`", name, dir.name);
            }
        }
        Ok(())
    }

    /// Creates a subdirectory in the current directory. Creating a name that
    /// already exists as a subdirectory is a no-op, not an error. The file
    /// namespace is not consulted.
    #[instrument(skip(self))]
    pub fn mkdir(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        let cur = self.current()?;
        let position = cur.borrow().subdir_position(name);
        match position {
            Ok(_) => Ok(()),
            Err(i) => {
                let child = Directory::new_child(name, &cur);
                tracing::info!("created directory `{}`", child.borrow().path);
                cur.borrow_mut().subdirs.insert(i, child);
                Ok(())
            }
        }
    }

    /// Moves the cursor. `.` is a no-op, `..` moves to the parent (a no-op at
    /// the root), `/` jumps to the root, and any other name must be an
    /// existing subdirectory of the current directory.
    #[instrument(skip(self))]
    pub fn cd(&mut self, name: &str) -> Result<()> {
        match name {
            "." => Ok(()),
            ".." => {
                let cur = self.current()?;
                let parent = cur.borrow().parent.clone();
                if let Some(parent) = parent {
                    self.cursor = parent;
                }
                Ok(())
            }
            "/" => {
                self.cursor = Rc::downgrade(&self.root);
                Ok(())
            }
            _ => {
                if name.is_empty() || name.contains('/') {
                    return Err(FileSystemError::new(
                        FSErrorType::InvalidName,
                        format!("`{name}` is not a valid directory name"),
                    ));
                }
                let cur = self.current()?;
                let target = cur.borrow().find_subdir(name).ok_or_else(|| {
                    FileSystemError::new(
                        FSErrorType::NotFound,
                        format!("no subdirectory named `{name}`"),
                    )
                })?;
                self.cursor = Rc::downgrade(&target);
                Ok(())
            }
        }
    }

    /// Produces a listing without mutating anything. An empty name or `.`
    /// lists the current directory, `..` the parent (empty at the root), `/`
    /// the root. Any other name is looked up as a subdirectory first and as a
    /// file second; a file yields a single-file report.
    #[instrument(skip(self))]
    pub fn ls(&self, name: &str) -> Result<Listing> {
        match name {
            "" | "." => Ok(Listing::Directory(self.current()?.borrow().listing())),
            ".." => {
                let cur = self.current()?;
                let parent = cur.borrow().parent.as_ref().and_then(Weak::upgrade);
                match parent {
                    Some(parent) => Ok(Listing::Directory(parent.borrow().listing())),
                    None => Ok(Listing::Directory(Vec::new())),
                }
            }
            "/" => Ok(Listing::Directory(self.root.borrow().listing())),
            _ => {
                if name.contains('/') {
                    return Err(FileSystemError::new(
                        FSErrorType::InvalidName,
                        format!("`{name}` is not a valid name"),
                    ));
                }
                let cur = self.current()?;
                let dir = cur.borrow();
                if let Some(subdir) = dir.find_subdir(name) {
                    return Ok(Listing::Directory(subdir.borrow().listing()));
                }
                if let Ok(i) = dir.file_position(name) {
                    return Ok(Listing::File(dir.files[i].clone()));
                }
                Err(FileSystemError::new(
                    FSErrorType::NotFound,
                    format!("no file or subdirectory named `{name}`"),
                ))
            }
        }
    }

    /// Returns the absolute path of the current directory. The root's empty
    /// path renders as `/`.
    pub fn pwd(&self) -> Result<String> {
        let cur = self.current()?;
        let path = cur.borrow().path.clone();
        if path.is_empty() {
            Ok("/".to_string())
        } else {
            Ok(path)
        }
    }

    /// Removes a file or subdirectory of the current directory. Removing a
    /// subdirectory frees its entire subtree.
    #[instrument(skip(self))]
    pub fn rm(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        let cur = self.current()?;
        let mut dir = cur.borrow_mut();
        if let Ok(i) = dir.subdir_position(name) {
            let removed = dir.subdirs.remove(i);
            drop(dir);
            tracing::info!("removing directory `{}` and its subtree", removed.borrow().path);
            Directory::clear(&removed);
            return Ok(());
        }
        if let Ok(i) = dir.file_position(name) {
            dir.files.remove(i);
            tracing::info!("removed file `{}` from `{}`", name, dir.name);
            return Ok(());
        }
        Err(FileSystemError::new(
            FSErrorType::NotFound,
            format!("no file or subdirectory named `{name}`"),
        ))
    }

    /// Frees the whole tree, post-order. Taking the handle by value makes it
    /// unusable afterwards.
    pub fn teardown(self) {
        Directory::clear(&self.root);
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}
