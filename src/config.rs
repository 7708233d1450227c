use rand::RngCore;

/// Process configuration, read from the environment once at startup and
/// never mutated afterwards. Shared through `AppState` behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub debug: bool,
    pub database_path: String,
    pub secret_key: String,
    pub bcrypt_cost: u32,
    pub session_ttl_minutes: i64,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let debug = std::env::var("DEBUG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/fbais.db".into());

        let secret_key = match std::env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!(
                    "SECRET_KEY not set; generated a per-process secret, \
                     sessions will not survive a restart"
                );
                generate_secret()
            }
        };

        let bcrypt_cost = std::env::var("BCRYPT_LOG_ROUNDS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(12);

        let session_ttl_minutes = std::env::var("SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60 * 24);

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        Ok(Self {
            debug,
            database_path,
            secret_key,
            bcrypt_cost,
            session_ttl_minutes,
            host,
            port,
        })
    }
}

/// 32 random bytes, hex-encoded.
fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secret_is_64_hex_chars() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn two_generated_secrets_differ() {
        assert_ne!(generate_secret(), generate_secret());
    }
}
