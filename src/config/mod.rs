//! Server configuration.
//!
//! Settings load from an optional `config/default.*` file and from
//! environment variables, merged over built-in defaults:
//!
//! | env var       | setting       | default          |
//! |---------------|---------------|------------------|
//! | `SERVER_HOST` | `server.host` | `0.0.0.0`        |
//! | `SERVER_PORT` | `server.port` | `4444`           |
//! | `TLS_CERT`    | `tls.cert`    | `certs/cert.pem` |
//! | `TLS_KEY`     | `tls.key`     | `certs/key.pem`  |
//! | `LOG_LEVEL`   | `log.level`   | `info`           |

mod settings;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{LogSettings, ServerSettings, Settings, TlsSettings};

/// Loads the configuration from the default file and environment variables,
/// merging with built-in defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Deserialize what is available, then fill the gaps.
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        tls: TlsSettings {
            cert: partial
                .tls
                .as_ref()
                .and_then(|t| t.cert.clone())
                .unwrap_or(default.tls.cert),
            key: partial
                .tls
                .as_ref()
                .and_then(|t| t.key.clone())
                .unwrap_or(default.tls.key),
        },
        log: LogSettings {
            level: partial
                .log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    })
}
