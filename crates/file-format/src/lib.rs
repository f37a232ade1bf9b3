//! Versioned JSON files: scene projects and export settings.

pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;
pub mod settings;

pub use errors::{LoadError, SaveError};
pub use load::{load_project, LoadedProject};
pub use metadata::ProjectMetadata;
pub use save::{save_project, FORMAT_ID, FORMAT_VERSION};
pub use settings::{load_settings, save_settings};
