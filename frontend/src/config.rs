//! Build-time configuration of the client.
//!
//! Values come from environment variables read when the bundle is compiled
//! (`API_BASE_URL=... trunk build`), falling back to same-origin defaults.

use std::sync::OnceLock;

use common::model::payment::ContractId;
use log::LevelFilter;

const DEFAULT_API_BASE_URL: &str = "/api";
const DEFAULT_PAYMENT_HUB_URL: &str = "/hubs/payment";

/// Quiet period before the template body is sent for extraction.
pub const EXTRACTION_DEBOUNCE_MS: u32 = 800;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub payment_hub_url: String,
    pub log_level: LevelFilter,
}

impl AppConfig {
    fn from_build_env() -> Self {
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            payment_hub_url: option_env!("PAYMENT_HUB_URL")
                .map(str::to_string)
                .unwrap_or_else(same_origin_hub_url),
            log_level: option_env!("LOG_LEVEL")
                .and_then(|level| level.parse().ok())
                .unwrap_or(LevelFilter::Info),
        }
    }
}

pub fn app_config() -> &'static AppConfig {
    static CONFIG: OnceLock<AppConfig> = OnceLock::new();
    CONFIG.get_or_init(AppConfig::from_build_env)
}

/// The hub lives next to the page unless configured otherwise; a WebSocket
/// needs an absolute address.
fn same_origin_hub_url() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .map(|origin| format!("{origin}{DEFAULT_PAYMENT_HUB_URL}"))
        .unwrap_or_else(|| DEFAULT_PAYMENT_HUB_URL.to_string())
}

/// Contract whose payments this page listens to, from `?contractId=`.
pub fn contract_id_from_location() -> Option<ContractId> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get("contractId")?.parse().ok()
}
