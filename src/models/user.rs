use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub full_name: String,
    pub email: String, // ! unique
    pub avatar_url: Option<String>,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

/// Password hashes live in their own table, keyed back to the user.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthPassword {
    pub id: RecordId,
    pub user_id: RecordId,
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthPassword {
    pub user_id: RecordId,
    pub password_hash: String,
}
