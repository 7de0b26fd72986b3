use crate::domain::auth::ViewerContext;
use crate::domain::profile::{NewProfile, Profile};
use crate::repository::{ProfileReader, ProfileWriter};

use super::{ServiceError, ServiceResult};

/// The current viewer's profile, if one has been saved yet.
pub fn show_profile<R>(viewer: &ViewerContext, repo: &R) -> ServiceResult<Option<Profile>>
where
    R: ProfileReader,
{
    let user_id = viewer
        .user_id
        .as_ref()
        .ok_or(ServiceError::Unauthorized)?;

    repo.get_profile(user_id).map_err(|e| {
        log::error!("Failed to get profile: {e}");
        ServiceError::Internal
    })
}

/// Insert or refresh the viewer's profile row.
pub fn update_profile<R>(
    profile: &NewProfile,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ProfileWriter,
{
    // The form handler builds the NewProfile from the session identity, but
    // the ownership check still lives here.
    if viewer.user_id.as_ref() != Some(&profile.user_id) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.upsert_profile(profile) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to upsert profile: {e}");
            Ok(false)
        }
    }
}
