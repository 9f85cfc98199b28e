use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub client_url: String,
    pub upload_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);
        let jwt_secret = env::var("JWT_SECRET")?;
        let jwt_refresh_secret = env::var("JWT_REFRESH_SECRET")?;
        let client_url =
            env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "public/images".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_refresh_secret,
            client_url,
            upload_dir,
        })
    }
}
