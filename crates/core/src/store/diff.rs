use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::document::model::ContentDocument;
use crate::error::StoreResult;

/// One changed line between two pretty-printed documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    /// `"delete"` (only in the snapshot) or `"insert"` (only in the current document).
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line: Option<usize>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDiff {
    pub filename: String,
    pub unchanged: usize,
    pub changes: Vec<DiffLine>,
}

/// Line diff of `old` against `new`, both rendered as pretty JSON.
pub fn diff_documents(
    filename: &str,
    old: &ContentDocument,
    new: &ContentDocument,
) -> StoreResult<VersionDiff> {
    let old_text = serde_json::to_string_pretty(old)?;
    let new_text = serde_json::to_string_pretty(new)?;
    let diff = TextDiff::from_lines(&old_text, &new_text);

    let mut unchanged = 0;
    let mut changes = Vec::new();
    for change in diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Equal => {
                unchanged += 1;
                continue;
            }
            ChangeTag::Delete => "delete",
            ChangeTag::Insert => "insert",
        };
        changes.push(DiffLine {
            tag: tag.to_string(),
            old_line: change.old_index().map(|i| i + 1),
            new_line: change.new_index().map(|i| i + 1),
            text: change.value().trim_end_matches('\n').to_string(),
        });
    }

    Ok(VersionDiff {
        filename: filename.to_string(),
        unchanged,
        changes,
    })
}
