//! File-backed content core for a marketing site.
//!
//! One canonical JSON document holds all site copy. Every overwrite snapshots
//! the previous document into a version directory; previews live beside it as
//! short-lived files; a static template registry decides which page shell a
//! request is rendered with.

pub mod document;
pub mod error;
pub mod store;
pub mod template;

pub use document::model::ContentDocument;
pub use error::{StoreError, StoreResult};
pub use store::content::ContentStore;
pub use store::diff::VersionDiff;
pub use store::preview::{PreviewSnapshot, PreviewStore};
pub use store::versions::{PruneReport, VersionInfo, VersionPruner};
pub use template::registry::{TemplateMeta, TemplateRegistry};
pub use template::resolve::{QueryParams, TemplateResolver};
