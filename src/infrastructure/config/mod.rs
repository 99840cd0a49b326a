use serde::Deserialize;
use std::env;

pub const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // AI gateway
    pub ai_gateway_url: String,
    pub ai_gateway_api_key: Option<String>,
    // Identity provider
    pub auth_mode: AuthMode,
    pub supabase_jwt_secret: Option<String>,
    pub supabase_jwt_audience: String,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    // Plans
    pub free_plan_generation_limit: i64,
    // Subscription cache
    pub subscription_cache_enabled: bool,
    pub subscription_cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// How bearer tokens are resolved to users
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Verify the provider-issued JWT locally with the shared secret
    Jwt,
    /// Ask the hosted identity provider who the token belongs to
    Supabase,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let environment = match env::var("ENVIRONMENT").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            log_format: parse_log_format(env::var("LOG_FORMAT").ok().as_deref(), &environment),
            environment,
            ai_gateway_url: env::var("AI_GATEWAY_URL")
                .unwrap_or_else(|_| DEFAULT_AI_GATEWAY_URL.to_string()),
            ai_gateway_api_key: optional_var("AI_GATEWAY_API_KEY"),
            auth_mode: parse_auth_mode(env::var("AUTH_MODE").ok().as_deref())?,
            supabase_jwt_secret: optional_var("SUPABASE_JWT_SECRET"),
            supabase_jwt_audience: env::var("SUPABASE_JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
            supabase_url: optional_var("SUPABASE_URL"),
            supabase_anon_key: optional_var("SUPABASE_ANON_KEY"),
            free_plan_generation_limit: env::var("FREE_PLAN_GENERATION_LIMIT")
                .unwrap_or_else(|_| "1".to_string())
                .parse()?,
            subscription_cache_enabled: env::var("SUBSCRIPTION_CACHE_ENABLED")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(true),
            subscription_cache_ttl_secs: env::var("SUBSCRIPTION_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
        };

        config.check_auth_settings()?;

        Ok(config)
    }

    /// The selected auth mode must have the settings it needs
    fn check_auth_settings(&self) -> Result<(), String> {
        match self.auth_mode {
            AuthMode::Jwt if self.supabase_jwt_secret.is_none() => {
                Err("SUPABASE_JWT_SECRET is required when AUTH_MODE=jwt".to_string())
            }
            AuthMode::Supabase if self.supabase_url.is_none() || self.supabase_anon_key.is_none() => {
                Err("SUPABASE_URL and SUPABASE_ANON_KEY are required when AUTH_MODE=supabase".to_string())
            }
            _ => Ok(()),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// An explicit LOG_FORMAT wins; otherwise production logs JSON
fn parse_log_format(value: Option<&str>, environment: &Environment) -> LogFormat {
    match value.map(|v| v.to_lowercase()).as_deref() {
        Some("json") => LogFormat::Json,
        Some("pretty") => LogFormat::Pretty,
        _ if *environment == Environment::Production => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn parse_auth_mode(value: Option<&str>) -> Result<AuthMode, String> {
    match value.map(|v| v.to_lowercase()).as_deref() {
        None | Some("") | Some("jwt") => Ok(AuthMode::Jwt),
        Some("supabase") => Ok(AuthMode::Supabase),
        Some(other) => Err(format!("Unknown AUTH_MODE: {}", other)),
    }
}
