use serde::{Deserialize, Serialize};

/// Like state of a record as seen by the current viewer, derived per
/// request from the authoritative like tables.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeMeta {
    pub count: usize,
    pub liked_by_viewer: bool,
}
