use anyhow::Context;
use chrono::DateTime;
use chrono::Duration;
use replay_auth::resolver::BEARER_PREFIX;
use replay_auth::CredentialHasher;
use replay_auth::Role;
use replay_auth::TokenCodec;
use replay_auth::TokenError;
use replay_auth::UserId;

use crate::cli::Commands;
use crate::config::Config;

/// Text to print on stdout and whether the command succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

/// Build the token codec, failing on any configuration problem.
pub fn build_codec(config: &Config) -> anyhow::Result<TokenCodec> {
    TokenCodec::from_settings(&config.jwt).context("Invalid token configuration")
}

/// Build the password hasher and prove it works.
pub fn build_hasher(config: &Config) -> anyhow::Result<CredentialHasher> {
    let hasher =
        CredentialHasher::new(&config.password).context("Invalid password configuration")?;
    hasher
        .self_test()
        .context("Password hashing backend unavailable")?;
    Ok(hasher)
}

/// Dispatch a parsed subcommand.
///
/// # Arguments
/// * `command` - Parsed subcommand
/// * `config` - Loaded configuration
/// * `password` - Password read from stdin, for commands that need one
pub fn run(
    command: &Commands,
    config: &Config,
    password: Option<&str>,
) -> anyhow::Result<CommandOutput> {
    match command {
        Commands::Check => check(config),
        Commands::Hash => {
            let password = password.context("No password provided on stdin")?;
            hash(&build_hasher(config)?, password)
        }
        Commands::Verify { hash } => {
            let password = password.context("No password provided on stdin")?;
            verify(&build_hasher(config)?, password, hash)
        }
        Commands::Issue {
            user_id,
            role,
            ttl_minutes,
        } => issue(&build_codec(config)?, UserId(*user_id), *role, *ttl_minutes),
        Commands::Inspect { token } => inspect(&build_codec(config)?, token),
    }
}

pub fn check(config: &Config) -> anyhow::Result<CommandOutput> {
    let codec = build_codec(config)?;
    build_hasher(config)?;

    tracing::info!(
        algorithm = ?codec.algorithm(),
        default_ttl_minutes = codec.default_ttl().num_minutes(),
        "Configuration valid"
    );

    Ok(CommandOutput::ok(format!(
        "ok: {:?} tokens valid for {} minutes, password hashing available",
        codec.algorithm(),
        codec.default_ttl().num_minutes()
    )))
}

pub fn hash(hasher: &CredentialHasher, password: &str) -> anyhow::Result<CommandOutput> {
    let hash = hasher.hash(password)?;
    Ok(CommandOutput::ok(hash))
}

pub fn verify(
    hasher: &CredentialHasher,
    password: &str,
    hash: &str,
) -> anyhow::Result<CommandOutput> {
    if !hasher.verify(password, hash)? {
        return Ok(CommandOutput::failed("mismatch"));
    }

    if hasher.needs_rehash(hash)? {
        Ok(CommandOutput::ok("match (rehash recommended)"))
    } else {
        Ok(CommandOutput::ok("match"))
    }
}

pub fn issue(
    codec: &TokenCodec,
    user_id: UserId,
    role: Role,
    ttl_minutes: Option<i64>,
) -> anyhow::Result<CommandOutput> {
    let ttl = match ttl_minutes {
        Some(minutes) => Duration::try_minutes(minutes)
            .with_context(|| format!("Token lifetime out of range: {} minutes", minutes))?,
        None => codec.default_ttl(),
    };

    let token = codec.encode(user_id, role, ttl)?;
    Ok(CommandOutput::ok(token))
}

pub fn inspect(codec: &TokenCodec, token: &str) -> anyhow::Result<CommandOutput> {
    let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();

    let payload = match codec.decode(token) {
        Ok(payload) => payload,
        Err(TokenError::Expired) => return Ok(CommandOutput::failed("expired")),
        Err(TokenError::Invalid(reason)) => {
            return Ok(CommandOutput::failed(format!("invalid: {}", reason)))
        }
        Err(e) => return Err(e.into()),
    };

    let mut rendered = serde_json::to_value(&payload)?;
    if let Some(expires) = DateTime::from_timestamp(payload.expires_at(), 0) {
        rendered["expires_at_utc"] = serde_json::Value::String(expires.to_rfc3339());
    }

    Ok(CommandOutput::ok(serde_json::to_string_pretty(&rendered)?))
}
