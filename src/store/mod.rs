//! Map persistence.
//!
//! - [`local`] – a single local map slot (one JSON file)
//! - [`backend`] – raw document storage: directory of files or memory
//! - [`project`] – named, per-user projects on top of a backend

pub mod backend;
pub mod local;
pub mod project;

pub use backend::{FsBackend, MemBackend, ProjectBackend};
pub use local::{LOCAL_SLOT_FILE, LocalSlot};
pub use project::{Project, ProjectStore};
