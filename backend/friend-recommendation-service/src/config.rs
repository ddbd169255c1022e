use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub s3: S3Config,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub env: String,

    #[serde(default = "default_app_host")]
    pub host: String,

    #[serde(default = "default_app_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket_name: String,

    #[serde(default = "default_s3_region")]
    pub region: String,

    #[serde(default)]
    pub aws_access_key_id: String,

    #[serde(default)]
    pub aws_secret_access_key: String,

    /// Custom endpoint for MinIO-style local stacks; empty means AWS.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_s3_url_ttl_secs")]
    pub presigned_url_ttl_secs: u64,
}

// Default value functions
fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8090
}

fn default_db_max_connections() -> u32 {
    20
}

fn default_s3_region() -> String {
    "us-east-1".to_string()
}

fn default_s3_url_ttl_secs() -> u64 {
    900 // 15 minutes
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| default_app_port().to_string())
                .parse()
                .unwrap_or(default_app_port()),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| default_db_max_connections().to_string())
                .parse()
                .unwrap_or(default_db_max_connections()),
        };

        let s3 = S3Config {
            bucket_name: env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME must be set"),
            region: env::var("S3_REGION").unwrap_or_else(|_| default_s3_region()),
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            endpoint: env::var("S3_ENDPOINT").ok().filter(|e| !e.trim().is_empty()),
            presigned_url_ttl_secs: env::var("S3_PRESIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| default_s3_url_ttl_secs().to_string())
                .parse()
                .unwrap_or(default_s3_url_ttl_secs()),
        };

        Ok(Config { app, database, s3 })
    }
}
