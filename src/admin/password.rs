//! Changing a user's password from the command line.

use thiserror::Error;

use crate::admin::hasher;
use crate::admin::User;
use crate::store::UserStore;

/// How to locate the target user and what to set their password to.
#[derive(Clone, Debug)]
pub struct PasswordChange {
    /// The new plaintext password.
    pub password: String,

    /// Target user id. Takes precedence when both selectors are given, with
    /// the login used as a fallback when no user has this id.
    pub user_id: Option<u64>,

    /// Target login name.
    pub user_login: Option<String>,
}

/// The user record a successful change resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordChanged {
    /// Resolved user id.
    pub id: u64,

    /// Resolved login name.
    pub login: String,
}

/// Errors reported to the operator by [`change`].
#[derive(Debug, Error)]
pub enum AdminError {
    /// Neither selector was provided.
    #[error("either a user id or a user login must be provided")]
    MissingSelector,

    /// No user matched the provided selectors. Nothing was mutated.
    #[error("no user matched id {id:?} or login {login:?}")]
    UserNotFound {
        /// The id that was tried, if any.
        id: Option<u64>,
        /// The login that was tried, if any.
        login: Option<String>,
    },
}

/// Changes the password of the user selected by `change`, hashing the new
/// password before it is stored. The store is only written on success.
pub fn change<S>(store: &mut S, change: &PasswordChange) -> Result<PasswordChanged, AdminError>
where
    S: UserStore,
{
    if change.user_id.is_none() && change.user_login.is_none() {
        return Err(AdminError::MissingSelector);
    }

    let by_id = change.user_id.and_then(|id| store.user(id));
    let user: Option<User> = match by_id {
        Some(user) => Some(user),
        None => change
            .user_login
            .as_deref()
            .and_then(|login| store.user_by_login(login)),
    };

    let Some(mut user) = user else {
        return Err(AdminError::UserNotFound {
            id: change.user_id,
            login: change.user_login.clone(),
        });
    };

    user.password = hasher::hash_password(&change.password);

    let resolved = PasswordChanged {
        id: user.id,
        login: user.login.clone(),
    };
    store.save_user(user);

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn store_with_admin() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.save_user(User {
            id: 2,
            login: "admin".to_string(),
            name: "Admin".to_string(),
            password: String::new(),
        });
        store
    }

    #[test]
    fn test_change_by_id() {
        let mut store = store_with_admin();

        let resolved = change(
            &mut store,
            &PasswordChange {
                password: "new-password".to_string(),
                user_id: Some(2),
                user_login: None,
            },
        )
        .unwrap();

        assert_eq!(
            resolved,
            PasswordChanged {
                id: 2,
                login: "admin".to_string()
            }
        );

        let stored = store.user(2).unwrap().password;
        assert!(hasher::verify_password("new-password", &stored));
    }

    #[test]
    fn test_missing_id_falls_back_to_login() {
        let mut store = store_with_admin();

        let resolved = change(
            &mut store,
            &PasswordChange {
                password: "new-password".to_string(),
                user_id: Some(1),
                user_login: Some("admin".to_string()),
            },
        )
        .unwrap();

        assert_eq!(resolved.id, 2);
        assert_eq!(resolved.login, "admin");
    }

    #[test]
    fn test_no_match_mutates_nothing() {
        let mut store = store_with_admin();

        let result = change(
            &mut store,
            &PasswordChange {
                password: "new-password".to_string(),
                user_id: Some(1),
                user_login: Some("nobody".to_string()),
            },
        );

        assert!(matches!(result, Err(AdminError::UserNotFound { .. })));
        assert_eq!(store.user(2).unwrap().password, "");
    }

    #[test]
    fn test_no_selector_is_an_error() {
        let mut store = store_with_admin();

        let result = change(
            &mut store,
            &PasswordChange {
                password: "new-password".to_string(),
                user_id: None,
                user_login: None,
            },
        );

        assert!(matches!(result, Err(AdminError::MissingSelector)));
    }
}
