//! # User Admin Service
//!
//! Admin-only CRUD over the users collection. The role gate lives here so
//! every entry point to the collection is covered.

use uuid::Uuid;

use crate::api::{ApiError, ApiResult};
use crate::auth::require_role;
use crate::model::user::UpsertUserRequest;
use crate::model::{is_valid_email, Role, User};
use crate::store::Db;

/// Create a user with an explicit role
pub fn create(db: &Db, actor: &User, payload: UpsertUserRequest) -> ApiResult<User> {
    require_role(actor, &[Role::Admin])?;

    let mut errors = Vec::new();
    let name = payload.name.unwrap_or_default();
    if name.trim().is_empty() {
        errors.push("Please add a name".to_string());
    }
    let email = payload.email.unwrap_or_default();
    if !is_valid_email(&email) {
        errors.push("Please add a valid email".to_string());
    }
    let Some(password) = payload.password else {
        errors.push("Please add a password".to_string());
        return Err(ApiError::validation(errors));
    };
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let user = User::new(name, email, &password, payload.role.unwrap_or_default())?;

    let email = user.email.clone();
    Ok(db.users.insert_unique(user, |existing| {
        (existing.email == email).then(|| ("email", email.clone()))
    })?)
}

/// Apply a partial update to any user
pub fn update(db: &Db, actor: &User, id: Uuid, payload: UpsertUserRequest) -> ApiResult<User> {
    require_role(actor, &[Role::Admin])?;

    let mut user = db.users.get_required(id)?;

    if let Some(name) = payload.name {
        user.name = name;
    }
    if let Some(email) = payload.email {
        if !is_valid_email(&email) {
            return Err(ApiError::validation(vec![
                "Please add a valid email".to_string(),
            ]));
        }
        if email != user.email && db.users.any(|u| u.email == email && u.id != id)? {
            return Err(ApiError::from(crate::store::StoreError::Duplicate {
                field: "email",
                value: email,
            }));
        }
        user.email = email;
    }
    if let Some(role) = payload.role {
        user.role = role;
    }
    if let Some(password) = payload.password {
        user.set_password(&password)?;
    }

    Ok(db.users.replace(user)?)
}

/// Delete a user
pub fn delete(db: &Db, actor: &User, id: Uuid) -> ApiResult<User> {
    require_role(actor, &[Role::Admin])?;
    Ok(db.users.delete(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> User {
        User::new(
            "Admin".to_string(),
            "admin@campdir.dev".to_string(),
            "123456",
            Role::Admin,
        )
        .unwrap()
    }

    fn payload(name: &str, email: &str) -> UpsertUserRequest {
        UpsertUserRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some("123456".to_string()),
            role: Some(Role::Publisher),
        }
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let db = Db::new();
        let publisher = User::new(
            "Pub".to_string(),
            "pub@gmail.com".to_string(),
            "123456",
            Role::Publisher,
        )
        .unwrap();

        let err = create(&db, &publisher, payload("John", "john@gmail.com")).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert_eq!(db.users.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = Db::new();
        let admin = admin();

        create(&db, &admin, payload("John", "john@gmail.com")).unwrap();
        let err = create(&db, &admin, payload("Johnny", "john@gmail.com")).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert!(err.message.contains("email"));
    }

    #[test]
    fn test_update_changes_role_and_password() {
        let db = Db::new();
        let admin = admin();

        let user = create(&db, &admin, payload("John", "john@gmail.com")).unwrap();
        let updated = update(
            &db,
            &admin,
            user.id,
            UpsertUserRequest {
                role: Some(Role::User),
                password: Some("654321".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.role, Role::User);
        assert!(updated.verify_password("654321").unwrap());
    }
}
