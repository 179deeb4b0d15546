use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_idle_minutes: i64,
    pub seed_on_startup: bool,
    pub secure_cookies: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_idle_minutes = parse_idle_minutes(env::var("SESSION_IDLE_MINUTES").ok());
        let seed_on_startup = parse_flag(env::var("SEED_ON_STARTUP").ok(), true);
        let secure_cookies = parse_flag(env::var("SECURE_COOKIES").ok(), false);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            session_idle_minutes,
            seed_on_startup,
            secure_cookies,
        })
    }
}

fn parse_idle_minutes(raw: Option<String>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|m| *m > 0)
        .unwrap_or(30)
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(str::trim) {
        Some("1") | Some("true") | Some("yes") => true,
        Some("0") | Some("false") | Some("no") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_minutes_fall_back_to_thirty() {
        assert_eq!(parse_idle_minutes(None), 30);
        assert_eq!(parse_idle_minutes(Some("abc".into())), 30);
        assert_eq!(parse_idle_minutes(Some("0".into())), 30);
        assert_eq!(parse_idle_minutes(Some(" 45 ".into())), 45);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag(Some("true".into()), false));
        assert!(parse_flag(Some("1".into()), false));
        assert!(!parse_flag(Some("no".into()), true));
        assert!(parse_flag(Some("maybe".into()), true));
        assert!(!parse_flag(None, false));
    }
}
