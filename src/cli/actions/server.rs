use crate::api::{
    self,
    handlers::auth::{AuthConfig, TokenSigner},
    ServerConfig,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub redis_url: String,
    pub jwt_secret: SecretString,
    pub session_ttl_seconds: i64,
    pub cookie_secure: bool,
    pub cookie_domain: Option<String>,
    pub frontend_base_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the signing secret is unusable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let signer =
        TokenSigner::from_secret(&args.jwt_secret).context("Invalid session signing secret")?;

    let auth_config = AuthConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.cookie_secure)
        .with_cookie_domain(args.cookie_domain);

    let server_config = ServerConfig {
        port: args.port,
        dsn: args.dsn,
        redis_url: args.redis_url,
        frontend_base_url: args.frontend_base_url,
    };

    api::new(server_config, auth_config, signer).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("dsn", redact_url(&args.dsn)),
        ("redis_url", redact_url(&args.redis_url)),
        ("session_ttl_seconds", args.session_ttl_seconds.to_string()),
        ("cookie_secure", args.cookie_secure.to_string()),
        (
            "cookie_domain",
            args.cookie_domain
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        ),
        ("frontend_base_url", args.frontend_base_url.clone()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-url".to_string(),
    }
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
