use casedrop_types::RarityTier;
use serde::Serialize;

/// Gateway runtime configuration.
///
/// Everything here is operational tuning; the game rules themselves live in
/// the rarity table and the catalog. Rate limits are optional: `None` leaves
/// the corresponding limiter uninstalled.
#[derive(Clone, Debug, Serialize)]
pub struct GatewayConfig {
    /// Capacity of the global feed broadcast channel.
    pub broadcast_capacity: usize,
    /// Capacity of each user-scoped broadcast channel.
    pub user_channel_capacity: usize,
    /// Capacity of the per-connection websocket writer queue.
    pub ws_outbound_capacity: usize,
    /// Maximum accepted request body, in bytes.
    pub http_body_limit_bytes: Option<usize>,
    /// Rate limit for `POST /games/open-case/:id`, per client IP.
    pub open_rate_limit_per_minute: Option<u64>,
    pub open_rate_limit_burst: Option<u32>,
    /// The rarity table every opening resolves against.
    #[serde(skip)]
    pub rarity_tiers: Vec<RarityTier>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 1024,
            user_channel_capacity: 256,
            ws_outbound_capacity: 64,
            http_body_limit_bytes: Some(64 * 1024),
            open_rate_limit_per_minute: None,
            open_rate_limit_burst: None,
            rarity_tiers: casedrop_types::DEFAULT_RARITY_TIERS.to_vec(),
        }
    }
}
