//! Course landing pages and their ordered project associations.

use serde::{Deserialize, Serialize};

use crate::domain::types::{CourseSlug, ProjectId};

/// Association of a project with a course landing page. Consumers sort
/// strictly by the persisted 0-based `position`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseProject {
    pub course_slug: CourseSlug,
    pub project_id: ProjectId,
    pub position: i32,
}

/// Remove the item at `from` and reinsert it at `to`. Returns `false` when
/// either index is out of bounds, leaving the list untouched. After a
/// successful move the caller must persist fresh ordinals for every item,
/// not just the moved one.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
