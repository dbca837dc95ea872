use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};

use crate::errors::Result;
use crate::utils::time::unix_now;

const TOKEN_TTL_SECS: usize = 60 * 60 * 24 * 7;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// Full record id of the user, e.g. `users:abc123`.
    pub id: String,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
}

impl Claims {
    pub fn for_user(id: String) -> Self {
        let iat = unix_now();
        Self {
            id,
            exp: iat + TOKEN_TTL_SECS,
            iat,
            iss: "eventhub".to_string(),
        }
    }
}

pub fn encode_jwt(claim: &Claims, secret: &str) -> Result<String> {
    let token = encode(
        &Header::default(),
        claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.set_issuer(&["eventhub"]);
    let token = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token)
}
