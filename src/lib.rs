//! Ournix: an in-memory simulation of a UNIX-like file system.
//!
//! The crate is split into the directory tree engine ([`fsystem`]), which
//! owns all file system semantics, and a thin interactive shell
//! ([`shell`] + [`commands`]) that drives it.

pub mod commands;
pub mod fsystem;
pub mod log;
pub mod shell;

pub use fsystem::{FileEntry, FileSystem, Listing, ListingEntry};
