use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "EPHEMERA_DATABASE_URL")]
    pub database_url: String,

    /// Default time-to-live for new messages in days
    #[arg(long, env = "EPHEMERA_TTL_DAYS", default_value_t = 7)]
    pub ttl_days: i64,

    /// Log output format
    #[arg(long, env = "EPHEMERA_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub cleanup: CleanupConfig,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "EPHEMERA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "EPHEMERA_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management (health probe) server
    #[arg(long, env = "EPHEMERA_MGMT_PORT", default_value_t = 3001)]
    pub mgmt_port: u16,

    /// How long to wait for background tasks on shutdown
    #[arg(long, env = "EPHEMERA_SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct CleanupConfig {
    /// How often to run the expired-message purge task
    #[arg(long, env = "EPHEMERA_CLEANUP_INTERVAL_SECS", default_value_t = 300)]
    pub interval_secs: u64,

    /// How long expired messages stay around for view stats before purging
    #[arg(long, env = "EPHEMERA_AUDIT_RETENTION_DAYS", default_value_t = 30)]
    pub audit_retention_days: i64,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }
}
