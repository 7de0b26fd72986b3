use serde::Deserialize;

/// Application configuration loaded at startup from `config.yaml` (optional)
/// overridden by environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub database_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Secret for cookie session/identity signing.
    pub secret: String,
    /// Base URL of the external auth service; unauthenticated users are sent
    /// there to log in.
    pub auth_service_url: String,
    /// Emails granted admin rights in addition to the `admin` role claim.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[cfg(feature = "server")]
impl ServerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("admin_emails"),
            )
            .build()?
            .try_deserialize()
    }
}
