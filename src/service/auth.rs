//! # Auth Service
//!
//! Registration, credential checks, account updates, and the password-reset
//! token lifecycle. Login does the same amount of hashing work whether the
//! email exists or not, so neither the response shape nor its timing says
//! which half of the credentials was wrong.

use chrono::{Duration, Utc};

use crate::api::{ApiError, ApiResult};
use crate::auth::crypto::burn_verification;
use crate::auth::errors::AuthError;
use crate::email::{EmailSender, EmailTemplate};
use crate::model::user::{
    LoginRequest, RegisterRequest, UpdateDetailsRequest, UpdatePasswordRequest,
};
use crate::model::{is_valid_email, User};
use crate::store::Db;

/// How long an issued reset token is honored
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Register a new user
pub fn register(db: &Db, request: RegisterRequest) -> ApiResult<User> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let user = User::new(request.name, request.email, &request.password, request.role)?;

    let email = user.email.clone();
    Ok(db.users.insert_unique(user, |existing| {
        (existing.email == email).then(|| ("email", email.clone()))
    })?)
}

/// Check credentials and return the matching user.
///
/// Unknown email and wrong password are indistinguishable: same error, and
/// a hash verification is burned either way.
pub fn login(db: &Db, request: LoginRequest) -> ApiResult<User> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Please provide an email and password"));
    }

    match db.users.find(|user| user.email == request.email)? {
        Some(user) => {
            if user.verify_password(&request.password)? {
                Ok(user)
            } else {
                Err(AuthError::InvalidCredentials.into())
            }
        }
        None => {
            burn_verification(&request.password);
            Err(AuthError::InvalidCredentials.into())
        }
    }
}

/// Update the current user's name and email
pub fn update_details(db: &Db, actor: &User, request: UpdateDetailsRequest) -> ApiResult<User> {
    let mut user = db.users.get_required(actor.id)?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation(vec!["Please add a name".to_string()]));
        }
        user.name = name;
    }
    if let Some(email) = request.email {
        if !is_valid_email(&email) {
            return Err(ApiError::validation(vec![
                "Please add a valid email".to_string(),
            ]));
        }
        if email != user.email && db.users.any(|u| u.email == email && u.id != user.id)? {
            return Err(ApiError::from(crate::store::StoreError::Duplicate {
                field: "email",
                value: email,
            }));
        }
        user.email = email;
    }

    Ok(db.users.replace(user)?)
}

/// Change the current user's password after verifying the current one
pub fn update_password(db: &Db, actor: &User, request: UpdatePasswordRequest) -> ApiResult<User> {
    let mut user = db.users.get_required(actor.id)?;

    if !user.verify_password(&request.current_password)? {
        return Err(AuthError::WrongPassword.into());
    }

    user.set_password(&request.new_password)?;
    Ok(db.users.replace(user)?)
}

/// Issue a reset token and mail its plaintext to the account.
///
/// The outcome is the same whether the email is registered or not; a failed
/// dispatch rolls the token back so no live token exists that nobody
/// received.
pub fn forgot_password(db: &Db, sender: &dyn EmailSender, email: &str) -> ApiResult<()> {
    let Some(mut user) = db.users.find(|user| user.email == email)? else {
        return Ok(());
    };

    let raw_token = user.issue_reset_token(Duration::minutes(RESET_TOKEN_TTL_MINUTES));
    db.users.replace(user.clone())?;

    let template = EmailTemplate::PasswordReset {
        token: raw_token,
        user_email: user.email.clone(),
    };

    if let Err(err) = sender.send(template) {
        user.clear_reset_token();
        if let Err(rollback) = db.users.replace(user) {
            tracing::error!(error = %rollback, "reset token rollback failed");
        }
        return Err(err.into());
    }

    Ok(())
}

/// Consume a reset token and set a new password.
///
/// Mismatched, expired, and already-consumed tokens all fail the same way.
pub fn reset_password(db: &Db, raw_token: &str, new_password: &str) -> ApiResult<User> {
    let now = Utc::now();
    let mut user = db
        .users
        .find(|user| user.reset_token_matches(raw_token, now))?
        .ok_or(AuthError::InvalidResetToken)?;

    user.set_password(new_password)?;
    user.clear_reset_token();
    Ok(db.users.replace(user)?)
}
