use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DisplayName, Subcategory, UserId};

/// Public profile of an academy member. The user itself lives in the
/// external auth service; the profile only carries display data and the
/// default subcategory used as a fallback by the listing filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: DisplayName,
    pub subcategory: Option<Subcategory>,
    pub created_at: NaiveDateTime,
}

/// Information required to create or refresh a [`Profile`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProfile {
    pub user_id: UserId,
    pub display_name: DisplayName,
    pub subcategory: Option<Subcategory>,
    pub created_at: NaiveDateTime,
}
