use serde::Deserialize;

fn default_timeout_secs() -> u64 {
    10
}

/// Environment-driven configuration. The whole surface is the base URL
/// of the remote catalog and the per-request timeout.
#[derive(Debug, Deserialize)]
pub struct Env {
    pub catalog_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub catalog_timeout_secs: u64,
}

impl Env {
    pub fn load() -> Result<Self, envy::Error> {
        let _ = dotenvy::dotenv();
        envy::from_env()
    }
}
