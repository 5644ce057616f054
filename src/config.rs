use std::env;
use std::time::Duration;

/// Per-IP request limits for the public endpoints. A value of 0 disables the tier.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// /api/auth and /api/init
    pub standard_rpm: u32,
    /// /health
    pub relaxed_rpm: u32,
}

impl RateLimitConfig {
    /// No rate limiting at all (tests, local tooling).
    pub fn disabled() -> Self {
        Self {
            standard_rpm: 0,
            relaxed_rpm: 0,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            standard_rpm: 30,
            relaxed_rpm: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub pool_size: u32,
    pub busy_timeout: Duration,
    /// Number of pre-migration backups to keep (-1 = all, 0 = never back up)
    pub migration_backup_count: i32,
    pub rate_limit: RateLimitConfig,
    pub dev_mode: bool,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("LINKAUTH_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let defaults = RateLimitConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT", 5000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "linkauth.db".to_string()),
            pool_size: env_parse("DB_POOL_SIZE", 10u32).max(1),
            busy_timeout: Duration::from_millis(env_parse("DB_BUSY_TIMEOUT_MS", 5000u64)),
            migration_backup_count: env_parse("MIGRATION_BACKUP_COUNT", 3),
            rate_limit: RateLimitConfig {
                standard_rpm: env_parse("RATE_LIMIT_STANDARD_RPM", defaults.standard_rpm),
                relaxed_rpm: env_parse("RATE_LIMIT_RELAXED_RPM", defaults.relaxed_rpm),
            },
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
