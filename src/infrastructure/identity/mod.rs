pub mod supabase;

pub use supabase::SupabaseIdentityProvider;

use crate::domain::auth::{IdentityProvider, JwtIdentityProvider};
use crate::infrastructure::config::{AuthMode, Config};
use std::sync::Arc;

/// Pick the identity provider for the configured auth mode
pub fn build_identity_provider(config: &Config) -> Result<Arc<dyn IdentityProvider>, String> {
    match config.auth_mode {
        AuthMode::Jwt => {
            let secret = config
                .supabase_jwt_secret
                .as_deref()
                .ok_or("SUPABASE_JWT_SECRET is not configured")?;
            Ok(Arc::new(JwtIdentityProvider::new(
                secret,
                &config.supabase_jwt_audience,
            )))
        }
        AuthMode::Supabase => {
            let url = config
                .supabase_url
                .clone()
                .ok_or("SUPABASE_URL is not configured")?;
            let anon_key = config
                .supabase_anon_key
                .clone()
                .ok_or("SUPABASE_ANON_KEY is not configured")?;
            Ok(Arc::new(SupabaseIdentityProvider::new(url, anon_key)))
        }
    }
}
