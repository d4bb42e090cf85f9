use std::net::SocketAddr;

use clap::Parser;

/// Server configuration, read from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "assess-server", version, about)]
pub struct Config {
    /// `SQLite` connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:assess.sqlite3?mode=rwc")]
    pub database_url: String,

    /// The address to bind to.
    #[arg(short, long, env = "BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    /// Log filter directive, e.g. `info` or `services=debug,tower_http=info`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Insert the starter screening assessment when the database has none.
    #[arg(long, env = "SEED_ON_EMPTY")]
    pub seed_on_empty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "assess-server",
            "--database-url",
            "sqlite::memory:",
            "--bind-address",
            "0.0.0.0:8080",
            "--seed-on-empty",
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_address.port(), 8080);
        assert!(config.seed_on_empty);
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(Config::try_parse_from(["assess-server", "--bind-address", "nowhere"]).is_err());
    }
}
