//! On-disk stores rooted at one content directory.
//!
//! ```text
//! <root>/content.json                  canonical document
//! <root>/versions/content-<ts>Z.json   version snapshots
//! <root>/previews/<id>.json            preview snapshots
//! <root>/templates/<key>.json          template-scoped content
//! ```

pub mod content;
pub mod diff;
pub mod preview;
pub mod versions;

mod files;

pub const CANONICAL_FILE: &str = "content.json";
pub const VERSIONS_DIR: &str = "versions";
pub const PREVIEWS_DIR: &str = "previews";
pub const TEMPLATES_DIR: &str = "templates";
