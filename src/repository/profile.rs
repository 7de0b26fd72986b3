use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::profile::{NewProfile, Profile};
use crate::domain::types::UserId;
use crate::models::profile::{NewProfile as DbNewProfile, Profile as DbProfile};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProfileReader, ProfileWriter};

impl ProfileReader for DieselRepository {
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;

        let profile = profiles::table
            .filter(profiles::user_id.eq(user_id.as_str()))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        Ok(profile.map(TryInto::try_into).transpose()?)
    }

    fn list_profiles(&self, user_ids: &[UserId]) -> RepositoryResult<HashMap<UserId, Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let raw_ids: Vec<&str> = user_ids.iter().map(|id| id.as_str()).collect();

        let rows = profiles::table
            .filter(profiles::user_id.eq_any(raw_ids))
            .load::<DbProfile>(&mut conn)?;

        rows.into_iter()
            .map(|row| {
                let profile: Profile = row.try_into()?;
                Ok((profile.user_id.clone(), profile))
            })
            .collect()
    }
}

impl ProfileWriter for DieselRepository {
    fn upsert_profile(&self, profile: &NewProfile) -> RepositoryResult<usize> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let db_profile: DbNewProfile = profile.into();

        let affected = diesel::insert_into(profiles::table)
            .values(&db_profile)
            .on_conflict(profiles::user_id)
            .do_update()
            .set((
                profiles::display_name.eq(profile.display_name.as_str()),
                profiles::subcategory.eq(profile.subcategory.as_ref().map(|s| s.as_str())),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
