//! Document viewer links.
//!
//! Folder references are opaque; they are forwarded to the viewer service
//! verbatim and never inspected.

use serde::{Deserialize, Serialize};
use shared_types::FolderRef;

/// Default embedded folder viewer.
pub const DEFAULT_EMBED_BASE: &str = "https://drive.google.com/embeddedfolderview";

/// Default folder page used by admin links.
pub const DEFAULT_FOLDER_BASE: &str = "https://drive.google.com/drive/folders";

/// Viewer service endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub embed_base: String,
    pub folder_base: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            embed_base: DEFAULT_EMBED_BASE.to_string(),
            folder_base: DEFAULT_FOLDER_BASE.to_string(),
        }
    }
}

/// Embedded grid view of `folder`.
pub fn viewer_url(folder: &FolderRef, config: &ViewerConfig) -> String {
    format!(
        "{}?id={}#grid",
        config.embed_base.trim_end_matches('/'),
        folder.as_str()
    )
}

/// Full folder page, for admin links.
pub fn folder_url(folder: &FolderRef, config: &ViewerConfig) -> String {
    format!(
        "{}/{}",
        config.folder_base.trim_end_matches('/'),
        folder.as_str()
    )
}
