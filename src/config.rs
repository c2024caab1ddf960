//! Configuration handling for the campus records client.
//!
//! The connection descriptor (server, database, authentication, trust mode)
//! is supplied once at process start via CLI arguments or environment
//! variables and converted into a driver configuration. The data-access layer
//! treats it as opaque.

use clap::Args;
use tiberius::{AuthMethod, EncryptionLevel};

use crate::error::{DbError, DbResult};

pub const DEFAULT_SERVER: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1433;
pub const DEFAULT_DATABASE: &str = "SRMS_DB";
pub const DEFAULT_APPLICATION_NAME: &str = "campus-records";

/// Connection descriptor and process-wide settings.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// SQL Server host name or address.
    #[arg(long, env = "CAMPUS_DB_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// SQL Server port.
    #[arg(long, env = "CAMPUS_DB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Named instance, e.g. MSSQLSERVER01.
    #[arg(long, env = "CAMPUS_DB_INSTANCE")]
    pub instance: Option<String>,

    /// Database name.
    #[arg(long, env = "CAMPUS_DB_NAME", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Login for SQL Server authentication.
    #[arg(long, env = "CAMPUS_DB_USER")]
    pub db_user: Option<String>,

    /// Password for SQL Server authentication (sensitive - not logged).
    #[arg(long, env = "CAMPUS_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Use Windows integrated authentication instead of a SQL login.
    #[arg(long, env = "CAMPUS_DB_TRUSTED")]
    pub trusted_connection: bool,

    /// Trust the server TLS certificate without verification.
    #[arg(long, env = "CAMPUS_DB_TRUST_CERT")]
    pub trust_cert: bool,

    /// Application name reported to the server.
    #[arg(long, default_value = DEFAULT_APPLICATION_NAME)]
    pub application_name: String,

    /// Log level filter (overridden by RUST_LOG).
    #[arg(long, env = "CAMPUS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, env = "CAMPUS_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Convert the descriptor into a driver configuration.
    ///
    /// Fails with an invalid-input error when no usable authentication method
    /// is configured.
    pub fn to_client_config(&self) -> DbResult<tiberius::Config> {
        let mut config = tiberius::Config::new();

        config.host(&self.server);
        config.port(self.port);
        config.database(&self.database);
        config.application_name(&self.application_name);

        if let Some(instance) = &self.instance {
            config.instance_name(instance);
        }

        if self.trusted_connection {
            #[cfg(windows)]
            {
                config.authentication(AuthMethod::Integrated);
            }
            #[cfg(not(windows))]
            {
                return Err(DbError::invalid_input(
                    "trusted connections are only supported on Windows",
                ));
            }
        } else if let (Some(user), Some(pass)) = (&self.db_user, &self.db_password) {
            config.authentication(AuthMethod::sql_server(user, pass));
        } else {
            return Err(DbError::invalid_input(
                "either --db-user/--db-password or --trusted-connection is required",
            ));
        }

        config.encryption(EncryptionLevel::On);
        if self.trust_cert {
            config.trust_cert();
        }

        Ok(config)
    }
}
