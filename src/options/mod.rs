//! Option lists offered by the prompt form's dropdowns.
//!
//! Each surface keeps its own [`OptionStore`]; writes go through the shared
//! [`PersistenceAdapter`] and a [`SyncBridge`] reloads stale copies when the
//! [`VersionToken`] advances.

pub mod filter;
pub mod model;
pub mod persistence;
pub mod store;
pub mod sync;

pub use filter::filter;
pub use model::{ListKind, OptionEntry, OptionList};
pub use persistence::{Fallback, FileStore, KeyValueStore, Loaded, MemoryStore, PersistenceAdapter};
pub use store::OptionStore;
pub use sync::{SyncBridge, VersionToken};
