//! Server configuration from environment variables.
//!
//! | Variable                 | Default                          |
//! |--------------------------|----------------------------------|
//! | `BIND_ADDR`              | `127.0.0.1:3000`                 |
//! | `SCHEDULER_URL`          | the hosted route store           |
//! | `SCHEDULER_TIMEOUT_SECS` | `60`                             |
//! | `SCHEDULE_MOCK_DIR`      | unset (use the live route store) |
//! | `CACHE_TTL_SECS`         | `300`                            |
//! | `GENERAL_PLACEMENT`      | `before-other-than:S1`           |
//! | `SHIFT_ORDER`            | `lexicographic`                  |
//! | `BREAK_CELL_STYLE`       | `to`                             |
//! | `SECOND_ROW_DURATION`    | `repeat`                         |
//! | `ANCHOR_BUS`             | `Bus 1`                          |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::scheduler::SchedulerConfig;
use crate::views::{SettingError, ViewConfig};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Error reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{var}: {source}")]
    Setting {
        var: &'static str,
        #[source]
        source: SettingError,
    },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub scheduler: SchedulerConfig,
    /// Serve fixtures from this directory instead of the route store.
    pub mock_dir: Option<PathBuf>,
    pub cache: CacheConfig,
    pub views: ViewConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's
    /// value if set. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "BIND_ADDR",
                value,
                expected: "socket address",
            })?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let mut scheduler = match get("SCHEDULER_URL") {
            Some(url) => SchedulerConfig::new(url.trim()),
            None => SchedulerConfig::default(),
        };
        if let Some(secs) = number(get("SCHEDULER_TIMEOUT_SECS"), "SCHEDULER_TIMEOUT_SECS")? {
            scheduler = scheduler.with_timeout(secs);
        }

        let mut cache = CacheConfig::default();
        if let Some(secs) = number(get("CACHE_TTL_SECS"), "CACHE_TTL_SECS")? {
            cache = cache.with_ttl(Duration::from_secs(secs));
        }

        let mut views = ViewConfig::default();
        if let Some(p) = setting(get("GENERAL_PLACEMENT"), "GENERAL_PLACEMENT")? {
            views = views.with_general_placement(p);
        }
        if let Some(o) = setting(get("SHIFT_ORDER"), "SHIFT_ORDER")? {
            views = views.with_shift_ordering(o);
        }
        if let Some(s) = setting(get("BREAK_CELL_STYLE"), "BREAK_CELL_STYLE")? {
            views = views.with_break_cell_style(s);
        }
        if let Some(d) = setting(get("SECOND_ROW_DURATION"), "SECOND_ROW_DURATION")? {
            views = views.with_second_row_duration(d);
        }
        if let Some(bus) = get("ANCHOR_BUS") {
            views = views.with_anchor_bus(bus.trim());
        }

        Ok(Self {
            bind_addr,
            scheduler,
            mock_dir: get("SCHEDULE_MOCK_DIR").map(PathBuf::from),
            cache,
            views,
        })
    }
}

fn number(value: Option<String>, var: &'static str) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.trim().parse().map_err(|_| ConfigError::Invalid {
                var,
                value: v,
                expected: "number of seconds",
            })
        })
        .transpose()
}

fn setting<T>(value: Option<String>, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = SettingError>,
{
    value
        .map(|v| v.parse().map_err(|source| ConfigError::Setting { var, source }))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::scheduler::DEFAULT_BASE_URL;
    use crate::views::{BreakCellStyle, GeneralPlacement, SecondRowDuration, ShiftOrdering};

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.scheduler.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.scheduler.timeout_secs, 60);
        assert!(config.mock_dir.is_none());
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.views, ViewConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("SCHEDULER_URL", "http://localhost:5000"),
            ("SCHEDULER_TIMEOUT_SECS", "10"),
            ("SCHEDULE_MOCK_DIR", "data/mock_routes"),
            ("CACHE_TTL_SECS", "30"),
            ("GENERAL_PLACEMENT", "last"),
            ("SHIFT_ORDER", "natural"),
            ("BREAK_CELL_STYLE", "dash"),
            ("SECOND_ROW_DURATION", "blank"),
            ("ANCHOR_BUS", "Bus 2"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.scheduler.base_url, "http://localhost:5000");
        assert_eq!(config.scheduler.timeout_secs, 10);
        assert_eq!(config.mock_dir, Some(PathBuf::from("data/mock_routes")));
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
        assert_eq!(config.views.general_placement, GeneralPlacement::Last);
        assert_eq!(config.views.shift_ordering, ShiftOrdering::Natural);
        assert_eq!(config.views.break_cell_style, BreakCellStyle::Dash);
        assert_eq!(config.views.second_row_duration, SecondRowDuration::Blank);
        assert_eq!(config.views.anchor_bus, "Bus 2");
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config(&[("SCHEDULE_MOCK_DIR", ""), ("ANCHOR_BUS", "  ")]).unwrap();
        assert!(config.mock_dir.is_none());
        assert_eq!(config.views.anchor_bus, "Bus 1");
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = config(&[("BIND_ADDR", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));

        let err = config(&[("CACHE_TTL_SECS", "soon")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CACHE_TTL_SECS: \"soon\" is not a valid number of seconds"
        );

        let err = config(&[("SHIFT_ORDER", "random")]).unwrap_err();
        assert!(matches!(err, ConfigError::Setting { var: "SHIFT_ORDER", .. }));
        assert!(err.to_string().starts_with("SHIFT_ORDER: invalid shift ordering"));
    }
}
