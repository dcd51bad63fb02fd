//! Visitor id kept in the browser's `localStorage`.

use freshharvest::user::{UserId, UserIdError, UserIdStore};
use web_sys::Storage;

const USER_ID_KEY: &str = "userId";

/// [`UserIdStore`] backed by `window.localStorage`.
///
/// The storage handle is looked up on every call so the store itself stays
/// `Send`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageUserIdStore;

fn local_storage() -> Result<Storage, UserIdError> {
    web_sys::window()
        .ok_or_else(|| UserIdError::Unavailable("window is unavailable".to_string()))?
        .local_storage()
        .map_err(|error| UserIdError::Unavailable(format!("{error:?}")))?
        .ok_or_else(|| UserIdError::Unavailable("localStorage is disabled".to_string()))
}

impl UserIdStore for LocalStorageUserIdStore {
    fn load(&self) -> Result<Option<UserId>, UserIdError> {
        let stored = local_storage()?
            .get_item(USER_ID_KEY)
            .map_err(|error| UserIdError::Unavailable(format!("{error:?}")))?;

        Ok(stored
            .filter(|value| !value.trim().is_empty())
            .map(UserId::from_stored))
    }

    fn save(&self, user_id: &UserId) -> Result<(), UserIdError> {
        local_storage()?
            .set_item(USER_ID_KEY, user_id.as_str())
            .map_err(|error| UserIdError::Unavailable(format!("{error:?}")))
    }
}
