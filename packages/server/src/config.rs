//! Server configuration.
//!
//! Read from `festival_map.toml` when present; every field has a default,
//! so an empty or missing file yields a working setup for the data files
//! in the current directory. `BIND_ADDR` and `PORT` override the listen
//! address.

use std::path::{Path, PathBuf};

use festival_map_geography_models::PopulationColumns;
use festival_map_map::{LatLng, MapOptions};
use serde::{Deserialize, Serialize};

use crate::ServerError;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "festival_map.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub areas: AreasConfig,
    pub population: PopulationConfig,
    pub festivals: FestivalsConfig,
    pub map: MapConfig,
    /// Reload every input file on each map request instead of once at
    /// startup.
    pub reload_per_request: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Area boundary shapefile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreasConfig {
    pub path: PathBuf,
    pub key_column: String,
    /// `EPSG:NNNN` or WKT. Overrides the `.prj` sidecar when set.
    pub crs: Option<String>,
}

impl Default for AreasConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("rcom.shp"),
            key_column: "KEY".to_string(),
            crs: None,
        }
    }
}

/// Population table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub path: PathBuf,
    /// An `encoding_rs` label such as `shift-jis` or `utf-8`.
    pub encoding: String,
    /// Lines before the header row.
    pub skip_rows: usize,
    pub key_column: String,
    pub columns: PopulationColumns,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("SB0002_2020_2020_17.csv"),
            encoding: "shift-jis".to_string(),
            skip_rows: 1,
            key_column: "KEY".to_string(),
            columns: PopulationColumns::default(),
        }
    }
}

/// Festival spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FestivalsConfig {
    pub path: PathBuf,
}

impl Default for FestivalsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("notofes.xlsx"),
        }
    }
}

/// Map view and embedded frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    pub fallback_center: LatLng,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        let options = MapOptions::default();
        Self {
            zoom: options.zoom,
            fallback_center: options.fallback_center,
            width: 700,
            height: 500,
        }
    }
}

impl MapConfig {
    #[must_use]
    pub const fn options(&self) -> MapOptions {
        MapOptions {
            zoom: self.zoom,
            fallback_center: self.fallback_center,
        }
    }
}

impl AppConfig {
    /// Parses a TOML document. Missing tables and fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Toml`] if the document is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ServerError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the configuration and applies environment overrides.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`DEFAULT_CONFIG_FILE`] is read if present and defaults are used
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ServerError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let mut config = match path {
            Some(path) => {
                log::info!("Reading configuration from {}", path.display());
                let toml_str = std::fs::read_to_string(&path).map_err(|source| {
                    ServerError::Io {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                Self::from_toml_str(&toml_str)?
            }
            None => {
                log::info!("No {DEFAULT_CONFIG_FILE} found; using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overrides the listen address from `BIND_ADDR` and `PORT`. An
    /// unparseable `PORT` is ignored.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(bind_addr) = var("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => log::warn!("Ignoring invalid PORT '{port}'"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.areas.path, PathBuf::from("rcom.shp"));
        assert_eq!(config.population.encoding, "shift-jis");
        assert_eq!(config.population.skip_rows, 1);
        assert_eq!(config.population.columns.a, "pop14");
        assert_eq!(config.festivals.path, PathBuf::from("notofes.xlsx"));
        assert_eq!((config.map.width, config.map.height), (700, 500));
        assert_eq!(config.map.zoom, 9);
        assert!(!config.reload_per_request);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            reload_per_request = true

            [areas]
            crs = "EPSG:6675"

            [population]
            encoding = "utf-8"

            [population.columns]
            a = "total"
            b = "households"

            [map]
            zoom = 11
            fallback_center = { lat = 37.0, lng = 136.9 }
            "#,
        )
        .unwrap();

        assert!(config.reload_per_request);
        assert_eq!(config.areas.crs.as_deref(), Some("EPSG:6675"));
        assert_eq!(config.areas.key_column, "KEY");
        assert_eq!(config.population.encoding, "utf-8");
        assert_eq!(config.population.skip_rows, 1);
        assert_eq!(config.population.columns.b, "households");
        assert_eq!(config.map.options().zoom, 11);
        assert!((config.map.options().fallback_center.lng - 136.9).abs() < f64::EPSILON);
        assert_eq!(config.map.width, 700);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[map\nzoom = "),
            Err(ServerError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides_listen_address() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| match name {
            "BIND_ADDR" => Some("0.0.0.0".to_string()),
            "PORT" => Some("3000".to_string()),
            _ => None,
        });
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| (name == "PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(matches!(
            AppConfig::load(Some(Path::new("/nonexistent/festival_map.toml"))),
            Err(ServerError::Io { .. })
        ));
    }
}
