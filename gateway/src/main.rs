use anyhow::{Context, Result};
use casedrop_gateway::{Api, Gateway, GatewayConfig, TokenRegistry};
use casedrop_types::{rarity::validate_tiers, Case, Item, User};
use clap::Parser;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "casedrop-gateway", about = "Case-opening gateway service")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to bind.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Path to a JSON seed file with cases, users, and tokens. Without it a
    /// built-in demo catalog is loaded.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Capacity of the global feed broadcast channel.
    #[arg(long, default_value_t = 1024)]
    broadcast_capacity: usize,

    /// Capacity of each user-scoped broadcast channel.
    #[arg(long, default_value_t = 256)]
    user_channel_capacity: usize,

    /// Rate limit for the opening endpoint, per client IP per minute.
    #[arg(long)]
    open_rate_limit_per_minute: Option<u64>,

    /// Burst size for the opening endpoint rate limit.
    #[arg(long)]
    open_rate_limit_burst: Option<u32>,
}

/// On-disk seed: the catalog plus user records and their bearer tokens.
#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    cases: Vec<Case>,
    #[serde(default)]
    users: Vec<SeedUser>,
}

#[derive(Deserialize)]
struct SeedUser {
    token: String,
    user: User,
}

fn demo_seed() -> SeedFile {
    let item = |id: &str, name: &str, rarity: u8| Item {
        id: id.to_string(),
        name: name.to_string(),
        image: format!("{id}.png"),
        rarity,
    };
    SeedFile {
        cases: vec![Case {
            id: "starter".into(),
            name: "Starter Case".into(),
            image: "starter.png".into(),
            price: 10,
            items: vec![
                item("rusty-knife", "Rusty Knife", 1),
                item("field-knife", "Field Knife", 2),
                item("engraved-blade", "Engraved Blade", 3),
                item("gilded-dagger", "Gilded Dagger", 4),
                item("dragon-fang", "Dragon Fang", 5),
            ],
        }],
        users: vec![SeedUser {
            token: "demo-token".into(),
            user: User::new("demo", "demo", 1_000),
        }],
    }
}

fn load_seed(path: Option<&PathBuf>) -> Result<SeedFile> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read seed file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse seed file {}", path.display()))
        }
        None => Ok(demo_seed()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let config = GatewayConfig {
        broadcast_capacity: args.broadcast_capacity,
        user_channel_capacity: args.user_channel_capacity,
        open_rate_limit_per_minute: args.open_rate_limit_per_minute,
        open_rate_limit_burst: args.open_rate_limit_burst,
        ..GatewayConfig::default()
    };
    validate_tiers(&config.rarity_tiers).context("invalid rarity table")?;

    let tokens = Arc::new(TokenRegistry::default());
    let gateway = Arc::new(Gateway::new(config, tokens.clone()));

    let seed = load_seed(args.seed.as_ref())?;
    for case in seed.cases {
        info!(case_id = %case.id, items = case.items.len(), "loaded case");
        gateway.catalog().insert(case);
    }
    for entry in seed.users {
        info!(user_id = %entry.user.id, "loaded user");
        tokens.register(entry.token, entry.user.id.clone());
        gateway.users().insert(entry.user);
    }
    if gateway.catalog().is_empty() {
        tracing::warn!("catalog is empty; every opening will fail with CaseNotFound");
    }

    let app = Api::new(gateway).router();
    let addr = SocketAddr::new(args.host, args.port);
    info!(%addr, "starting gateway");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("axum server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rate_limit_flags() {
        let args = Args::parse_from([
            "casedrop-gateway",
            "--port",
            "9000",
            "--open-rate-limit-per-minute",
            "30",
            "--open-rate-limit-burst",
            "5",
        ]);
        assert_eq!(args.port, 9000);
        assert_eq!(args.open_rate_limit_per_minute, Some(30));
        assert_eq!(args.open_rate_limit_burst, Some(5));
    }

    #[test]
    fn demo_seed_is_openable() {
        let seed = demo_seed();
        assert_eq!(seed.cases.len(), 1);
        assert!(!seed.cases[0].items.is_empty());
        assert_eq!(seed.users[0].user.wallet_balance, 1_000);
    }
}
