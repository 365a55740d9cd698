use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Bearer token of the bootstrap platform admin. Empty disables the bootstrap.
    pub admin_token: String,
    pub activity_channel_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "padel.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_default(),
            activity_channel_capacity: env::var("ACTIVITY_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(256),
        }
    }
}
