//! Key-value persistence with cross-session change notifications
//!
//! - [`KeyValueStore`] is the storage seam; [`MemoryStore`] is the bundled
//!   implementation.
//! - [`StoreHandle`] is the injected handle sessions share; it broadcasts a
//!   [`StorageEvent`] for every write.
//! - [`SyncedEntry`] is a typed view of one key; [`ThemePreference`] is one
//!   such view.

mod backend;
mod entry;
mod error;
mod handle;
mod memory;
mod theme;

pub use backend::KeyValueStore;
pub use entry::SyncedEntry;
pub use error::StoreError;
pub use handle::StorageEvent;
pub use handle::StoreHandle;
pub use memory::MemoryStore;
pub use theme::THEME_KEY;
pub use theme::Theme;
pub use theme::ThemePreference;
