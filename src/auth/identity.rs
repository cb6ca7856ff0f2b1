use tracing::{debug, info};

use super::{AuthError, ProviderProfile};
use crate::models::{NewUser, User};
use crate::store::Store;

/// Map a provider profile to a local user, creating the user on first sign-in.
///
/// There is no uniqueness guarantee beyond the lookup: two concurrent first
/// sign-ins for the same identity can both insert.
pub async fn resolve_user(store: &dyn Store, profile: ProviderProfile) -> Result<User, AuthError> {
    if let Some(user) = store.find_user_by_google_id(&profile.id).await? {
        debug!(user_id = %user.id, "Existing user signed in");
        return Ok(user);
    }

    let email = profile
        .emails
        .into_iter()
        .next()
        .ok_or(AuthError::MissingEmail)?;

    let user = store
        .insert_user(NewUser {
            google_id: profile.id,
            username: profile.display_name,
            email,
        })
        .await?;
    info!(user_id = %user.id, "Created user for new identity");
    Ok(user)
}
