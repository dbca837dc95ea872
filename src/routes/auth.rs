use axum::{extract::State, http::StatusCode, Json};

use crate::{
    consts::db_const::{AUTH_PASSWORD_TABLE, USER_TABLE},
    errors::{Error, Result},
    models::user::{AuthPassword, CreateAuthPassword, CreateUser, User},
    state::AppState,
    utils::{
        jwt::{encode_jwt, Claims},
        pwd,
        respond::{DataEnvelope, MessageEnvelope},
        time::time_now,
        validated_json::ValidatedJson,
    },
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 255))]
    pub password: String,
    pub avatar_url: Option<String>,
}

pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<MessageEnvelope>)> {
    let check_user: Vec<User> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", USER_TABLE))
        .bind(("email", input.email.clone()))
        .await?
        .take(0)?;

    if !check_user.is_empty() {
        return Err(Error::EmailExist(input.email.clone()));
    }

    let password_hash = pwd::hash(input.password.as_bytes())?;
    let user_data = CreateUser {
        full_name: input.full_name,
        email: input.email.clone(),
        avatar_url: input.avatar_url,
        created_at: time_now(),
    };
    let user: Option<User> = state.sdb.create(USER_TABLE).content(user_data).await?;
    let user = user.ok_or(Error::NotFound("User"))?;

    let auth_password = CreateAuthPassword {
        user_id: user.id,
        password_hash,
    };
    let _: Option<AuthPassword> = state
        .sdb
        .create(AUTH_PASSWORD_TABLE)
        .content(auth_password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageEnvelope::new(format!(
            "user with email: {} created",
            input.email
        ))),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, validator::Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SignInResponse {
    pub token: String,
    pub user: User,
}

pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> Result<Json<DataEnvelope<SignInResponse>>> {
    let user: Option<User> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", USER_TABLE))
        .bind(("email", input.email.clone()))
        .await?
        .take::<Vec<User>>(0)?
        .into_iter()
        .next();
    let user = user.ok_or(Error::InvalidLoginDetails)?;

    let auth: Option<AuthPassword> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE userId = $user_id;")
        .bind(("table", AUTH_PASSWORD_TABLE))
        .bind(("user_id", user.id.clone()))
        .await?
        .take::<Vec<AuthPassword>>(0)?
        .into_iter()
        .next();
    let auth = auth.ok_or(Error::InvalidLoginDetails)?;

    if !pwd::validate(input.password.as_bytes(), &auth.password_hash)? {
        return Err(Error::InvalidLoginDetails);
    }

    let claims = Claims::for_user(user.id.to_string());
    let token = encode_jwt(&claims, &state.config.jwt_secret)?;

    Ok(Json(DataEnvelope::new(SignInResponse { token, user })))
}
