use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::users::repo_types::User;

pub const USER_CREATED: &str = "User created successfully";

/// Request body for `POST /user`. Fields are kept as raw JSON so that
/// `null`, `false`, `0` and `""` can all be reported as missing rather
/// than as a decoding failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: &'static str,
    pub user: User,
}
