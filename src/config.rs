use crate::error::ChatError;

#[derive(Clone)]
pub struct EngineConfig {
    pub database_url: String,
    pub session_expiry_hours: i64,
    pub default_message_limit: i64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ChatError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(EngineConfig {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://chat.db".to_string()),
            session_expiry_hours: std::env::var("SESSION_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|e| ChatError::Config(format!("Invalid SESSION_EXPIRY_HOURS: {}", e)))?,
            default_message_limit: std::env::var("DEFAULT_MESSAGE_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .map_err(|e| ChatError::Config(format!("Invalid DEFAULT_MESSAGE_LIMIT: {}", e)))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|e| ChatError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?,
            db_min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| ChatError::Config(format!("Invalid DB_MIN_CONNECTIONS: {}", e)))?,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            database_url: "sqlite://chat.db".to_string(),
            session_expiry_hours: 24,
            default_message_limit: 50,
            db_max_connections: 20,
            db_min_connections: 5,
        }
    }
}
