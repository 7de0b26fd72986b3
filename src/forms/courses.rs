use serde::Deserialize;
use validator::Validate;

/// Associate a project with a course page.
#[derive(Debug, Deserialize, Validate)]
pub struct AttachProjectForm {
    #[validate(range(min = 1))]
    pub project_id: i32,
}

/// Remove a project association from a course page.
#[derive(Debug, Deserialize, Validate)]
pub struct DetachProjectForm {
    #[validate(range(min = 1))]
    pub project_id: i32,
}

/// Move the item at `from` to `to` within the course ordering.
#[derive(Debug, Deserialize)]
pub struct ReorderForm {
    pub from: usize,
    pub to: usize,
}
