use tracing::{error, warn};

use crate::{
    auth::password::verify_password,
    error::AppError,
    users::{repo::UserStore, repo_types::User},
};

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Looks the user up by email and checks the password against the stored hash.
pub async fn authenticate(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    let user = match store.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "unknown email");
            return Err(AppError::UserNotFound);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(AppError::Internal(e));
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, "incorrect password");
        return Err(AppError::IncorrectPassword);
    }
    Ok(user)
}
