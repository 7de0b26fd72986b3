use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::domain::profile::NewProfile;
use crate::domain::types::{DisplayName, Subcategory, TypeConstraintError, UserId};

/// Profile settings form: display name plus the default subcategory used
/// as the listing filter fallback.
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[serde(default)]
    pub subcategory: String,
}

impl ProfileForm {
    pub fn into_new_profile(self, user_id: UserId) -> Result<NewProfile, TypeConstraintError> {
        let subcategory = match self.subcategory.trim() {
            "" => None,
            value => Some(Subcategory::new(value)?),
        };
        Ok(NewProfile {
            user_id,
            display_name: DisplayName::new(self.display_name)?,
            subcategory,
            created_at: Utc::now().naive_utc(),
        })
    }
}
