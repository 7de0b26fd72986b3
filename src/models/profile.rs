use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::profile::{NewProfile as DomainNewProfile, Profile as DomainProfile};
use crate::domain::types::{DisplayName, Subcategory, TypeConstraintError, UserId};

/// Diesel model representing a row in the `profiles` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::profiles, primary_key(user_id))]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub subcategory: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Profile`] used for creating new rows.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile<'a> {
    pub user_id: &'a str,
    pub display_name: &'a str,
    pub subcategory: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(profile.user_id)?,
            display_name: DisplayName::new(profile.display_name)?,
            subcategory: profile.subcategory.map(Subcategory::new).transpose()?,
            created_at: profile.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewProfile> for NewProfile<'a> {
    fn from(profile: &'a DomainNewProfile) -> Self {
        Self {
            user_id: profile.user_id.as_str(),
            display_name: profile.display_name.as_str(),
            subcategory: profile.subcategory.as_ref().map(Subcategory::as_str),
            created_at: profile.created_at,
        }
    }
}
