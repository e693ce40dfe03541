use chrono::FixedOffset;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub registry: RegistryConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_size: usize,
    /// Offset used when turning registry timestamps into display dates
    pub display_offset: FixedOffset,
    /// Browser view sessions idle longer than this are dropped
    pub session_idle_timeout: Duration,
}

/// Hosted registry (database table + object storage bucket)
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Project base URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Anonymous API key, sent both as `apikey` and as bearer token
    pub api_key: String,
    pub bucket: String,
    pub table: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            registry: RegistryConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024; // 50MB
    const DEFAULT_SESSION_IDLE_MINUTES: u64 = 120;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size = env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_UPLOAD_SIZE must be a valid number".to_string())?;

        let offset_minutes = env::var("DISPLAY_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<i32>()
            .map_err(|_| "DISPLAY_UTC_OFFSET_MINUTES must be a valid number".to_string())?;
        let display_offset = parse_display_offset(offset_minutes)?;

        let session_idle_minutes = env::var("SESSION_IDLE_MINUTES")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_IDLE_MINUTES.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_IDLE_MINUTES must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_upload_size,
            display_offset,
            session_idle_timeout: Duration::from_secs(session_idle_minutes * 60),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_display_offset(minutes: i32) -> Result<FixedOffset, String> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| format!("DISPLAY_UTC_OFFSET_MINUTES out of range: {}", minutes))
}

impl RegistryConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL environment variable is required".to_string())?
            .trim_end_matches('/')
            .to_string();

        let api_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| "SUPABASE_ANON_KEY environment variable is required".to_string())?;

        let bucket = env::var("SUPABASE_BUCKET").unwrap_or_else(|_| "documents".to_string());

        let table = env::var("SUPABASE_TABLE").unwrap_or_else(|_| "documents".to_string());

        let timeout_secs = env::var("REGISTRY_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "REGISTRY_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            api_key,
            bucket,
            table,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Docdesk API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Document upload and summary API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_offset() {
        assert_eq!(parse_display_offset(0).unwrap().local_minus_utc(), 0);
        assert_eq!(parse_display_offset(420).unwrap().local_minus_utc(), 420 * 60);
        assert_eq!(
            parse_display_offset(-300).unwrap().local_minus_utc(),
            -300 * 60
        );
        assert!(parse_display_offset(24 * 60).is_err());
    }

    #[test]
    fn test_swagger_credentials() {
        let mut config = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(config.credentials(), None);

        config.password = Some("secret".to_string());
        assert_eq!(config.credentials(), Some("admin:secret".to_string()));
    }
}
