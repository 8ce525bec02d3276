// The directory tree engine. Everything the rest of the crate knows about
// files and directories goes through the `FileSystem` handle defined here.

mod errors;
#[allow(clippy::module_inception)]
mod fsystem;

pub use errors::{FSErrorType, FileSystemError, Result};
pub use fsystem::{FileEntry, FileSystem, Listing, ListingEntry};
