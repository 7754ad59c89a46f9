use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::process::ExitCode;

use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telegram_login::{
    sign_fields, verify_query_string, VerifyConfig, ENV_BOT_TOKEN, FIELD_AUTH_DATE, FIELD_HASH,
};

#[derive(Parser)]
#[command(name = "tg-login", about = "Verify or sign Telegram Login Widget callback data")]
struct Cli {
    /// Bot token issued by @BotFather
    #[arg(long, global = true, env = ENV_BOT_TOKEN, hide_env_values = true)]
    bot_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a callback query string and print the user as JSON
    Verify {
        /// Query string from the redirect URL, or `-` to read it from stdin
        query: String,
        /// Maximum auth_date age in seconds (overrides TELEGRAM_AUTH_TTL_SECS)
        #[arg(long)]
        ttl_secs: Option<i64>,
        /// Allowed future skew in seconds (overrides TELEGRAM_CLOCK_SKEW_SECS)
        #[arg(long)]
        skew_secs: Option<i64>,
    },
    /// Sign a set of fields the way the widget does and print the query string
    Sign {
        /// Field as key=value; repeatable. auth_date defaults to now.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let bot_token = cli.bot_token.unwrap_or_default();

    let result = match cli.command {
        Command::Verify {
            query,
            ttl_secs,
            skew_secs,
        } => run_verify(&bot_token, &query, ttl_secs, skew_secs),
        Command::Sign { fields } => run_sign(&bot_token, fields),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_verify(
    bot_token: &str,
    query: &str,
    ttl_secs: Option<i64>,
    skew_secs: Option<i64>,
) -> Result<String, String> {
    let mut config = VerifyConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(secs) = ttl_secs {
        config.auth_ttl = seconds(secs)?;
    }
    if let Some(secs) = skew_secs {
        config.clock_skew = seconds(secs)?;
    }
    tracing::debug!(
        auth_ttl = %config.effective_auth_ttl(),
        clock_skew = %config.effective_clock_skew(),
        "verifying callback"
    );

    let query = if query == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        buf.trim().to_string()
    } else {
        query.to_string()
    };

    let user = verify_query_string(&query, bot_token, &config).map_err(|e| e.to_string())?;
    tracing::info!(user_id = user.user_id, "telegram login verified");
    serde_json::to_string_pretty(&user).map_err(|e| format!("serialization failed: {e}"))
}

fn run_sign(bot_token: &str, fields: Vec<(String, String)>) -> Result<String, String> {
    let mut fields: HashMap<String, String> = fields.into_iter().collect();
    fields.remove(FIELD_HASH);
    fields
        .entry(FIELD_AUTH_DATE.to_string())
        .or_insert_with(|| Utc::now().timestamp().to_string());

    let hash = sign_fields(&fields, bot_token).map_err(|e| e.to_string())?;

    let ordered: BTreeMap<&str, &str> = fields
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(std::iter::once((FIELD_HASH, hash.as_str())))
        .collect();
    Ok(url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(ordered)
        .finish())
}

fn seconds(secs: i64) -> Result<TimeDelta, String> {
    TimeDelta::try_seconds(secs).ok_or_else(|| format!("duration out of range: {secs}s"))
}
