use crate::{Result, SessionError};
use paint_grid_core::{BoundingRegion, GridDimensions, GridIndex, PaintColor};
use paint_grid_sync::{HttpStore, MemoryStore, SyncGateway, DEFAULT_COLLECTION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const ENV_PREFIX: &str = "PAINTGRID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub region: BoundingRegion,
    pub grid: GridDimensions,
    pub store: StoreConfig,
    pub painting: PaintingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub collection: String,
    pub endpoint: Option<String>, // If None, cells stay in process memory
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintingConfig {
    pub default_color: String,
    pub enabled_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            region: BoundingRegion::JAPAN,
            grid: GridDimensions::default(),
            store: StoreConfig {
                collection: DEFAULT_COLLECTION.to_string(),
                endpoint: None,
                request_timeout_secs: 10,
            },
            painting: PaintingConfig {
                default_color: PaintColor::default().name().to_string(),
                enabled_on_start: false,
            },
            logging: LoggingConfig {
                enabled: true,
                level: "info".to_string(),
            },
        }
    }
}

impl EngineConfig {
    /// Load a config file layered over the defaults, then `PAINTGRID_*`
    /// environment overrides (`PAINTGRID_GRID__ROWS=50`)
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&EngineConfig::default())?)
            .add_source(config::File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&EngineConfig::default())?)
            .add_source(Self::environment())
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn grid_index(&self) -> Result<GridIndex> {
        Ok(GridIndex::new(self.region, self.grid)?)
    }

    pub fn default_color(&self) -> Result<PaintColor> {
        self.painting
            .default_color
            .parse()
            .map_err(|e: paint_grid_core::UnknownColor| SessionError::Configuration(e.to_string()))
    }

    /// Check everything a session needs before one is built
    pub fn validate(&self) -> Result<()> {
        self.grid_index()?;
        self.default_color()?;
        if self.store.collection.trim().is_empty() {
            return Err(SessionError::Configuration(
                "store.collection must not be empty".to_string(),
            ));
        }
        if self.store.request_timeout_secs == 0 {
            return Err(SessionError::Configuration(
                "store.request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Gateway for the configured store
    pub fn gateway(&self) -> Result<SyncGateway> {
        let collection = self.store.collection.clone();
        match &self.store.endpoint {
            Some(endpoint) => {
                let timeout = Duration::from_secs(self.store.request_timeout_secs);
                let store = HttpStore::new(endpoint, timeout)?;
                Ok(SyncGateway::new(Arc::new(store), collection))
            }
            None => Ok(SyncGateway::new(Arc::new(MemoryStore::new()), collection)),
        }
    }
}
