use serde_json::Value;
use tracing::{info, warn};

use crate::error::AppError;
use crate::users::dto::CreateUserRequest;
use crate::users::repo::UserRepo;
use crate::users::repo_types::{NewUser, User};

enum Field {
    Missing,
    Text(String),
    NotText,
}

/// Absent, `null`, `false`, zero and `""` all count as missing.
fn present(field: Option<Value>) -> Field {
    match field {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Field::Missing,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Field::Missing,
        Some(Value::String(s)) if s.is_empty() => Field::Missing,
        Some(Value::String(s)) => Field::Text(s),
        Some(_) => Field::NotText,
    }
}

/// Checks that all three fields carry a non-empty string.
///
/// A missing field wins over a mistyped one, so `{"username": 5}` with no
/// email is still `MissingFields`.
pub fn validate(req: CreateUserRequest) -> Result<NewUser, AppError> {
    match (
        present(req.username),
        present(req.email),
        present(req.password),
    ) {
        (Field::Text(username), Field::Text(email), Field::Text(password)) => Ok(NewUser {
            username,
            email,
            password,
        }),
        (username, email, password) => {
            let fields = [("username", username), ("email", email), ("password", password)];
            if fields.iter().any(|(_, f)| matches!(f, Field::Missing)) {
                return Err(AppError::MissingFields);
            }
            let name = fields
                .iter()
                .find(|(_, f)| matches!(f, Field::NotText))
                .map_or("body", |(name, _)| *name);
            Err(AppError::InvalidBody(format!("{name} must be a string")))
        }
    }
}

/// Validate, reject a taken email, insert.
///
/// The lookup and the insert are separate round trips. Two concurrent
/// requests for the same email can both pass the lookup; the table's unique
/// constraint then rejects the second insert, which surfaces here as
/// `DuplicateUser` as well.
pub async fn create_user(repo: &dyn UserRepo, req: CreateUserRequest) -> Result<User, AppError> {
    let new_user = validate(req)?;

    let existing = repo
        .find_by_email(&new_user.email)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if existing.is_some() {
        warn!(email = %new_user.email, "email already registered");
        return Err(AppError::DuplicateUser);
    }

    let user = repo.insert(new_user).await?;
    info!(user_id = user.id, email = %user.email, "user created");
    Ok(user)
}
