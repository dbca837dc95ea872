use surrealdb::{
    engine::any::{self, Any},
    opt::auth::Root,
    Surreal,
};

use crate::config::AppConfig;
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct AppState {
    pub sdb: Surreal<Any>,
    pub config: AppConfig,
}

impl AppState {
    pub async fn init(config: AppConfig) -> Result<Self> {
        let sdb = any::connect(&config.db_url).await?;
        // Embedded engines (mem://) have no root user to sign in as.
        if let (Some(username), Some(password)) = (&config.db_user, &config.db_pass) {
            if !config.db_url.starts_with("mem:") {
                sdb.signin(Root { username, password }).await?;
            }
        }
        sdb.use_ns(&config.db_ns).use_db(&config.db_name).await?;

        Ok(Self { sdb, config })
    }
}
