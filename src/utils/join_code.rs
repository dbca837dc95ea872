use rand::RngCore;
use surrealdb::{engine::any::Any, Surreal};

use crate::consts::{db_const::EVENT_TABLE, JOIN_CODE_ATTEMPTS};
use crate::errors::{Error, Result};
use crate::models::event::Event;

/// Draws a 6-hex-char candidate code.
pub fn random_code() -> String {
    let mut bytes = [0u8; 3];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Generates a join code that no existing event holds. Retries a bounded
/// number of times; collisions on every attempt surface as
/// `Error::JoinCodeExhausted`.
pub async fn generate_join_code(sdb: &Surreal<Any>) -> Result<String> {
    for _ in 0..JOIN_CODE_ATTEMPTS {
        let candidate = random_code();
        let existing = sdb
            .query("SELECT * FROM type::table($table) WHERE joinCode = $code;")
            .bind(("table", EVENT_TABLE))
            .bind(("code", candidate.clone()))
            .await?
            .take::<Vec<Event>>(0)?;
        if existing.is_empty() {
            return Ok(candidate);
        }
    }
    Err(Error::JoinCodeExhausted)
}
