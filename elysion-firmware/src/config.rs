//! Panel configuration loading
//!
//! A panel configuration stored in flash (postcard) overrides the built-in
//! revision table. Anything wrong with the stored copy falls back to the
//! built-in table.

use defmt::*;

use elysion_core::config::{ConfigError, FeatureSet, PanelConfig, CONFIG_VERSION};
use elysion_hal::flash::FlashError;
use elysion_hal::{FlashStorage, StorageKey};

use crate::boards::Revision;

/// Maximum serialized config size
const MAX_CONFIG_SIZE: usize = 1024;

/// Reasons a stored override is rejected
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch(u8),
    /// Config failed validation
    Invalid(ConfigError),
}

impl From<FlashError> for LoadError {
    fn from(e: FlashError) -> Self {
        LoadError::Flash(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Load the panel configuration for this device
pub async fn load<F: FlashStorage>(storage: &mut F, revision: Revision) -> PanelConfig {
    let config = match load_override(storage).await {
        Ok(config) => {
            info!("Using panel configuration from flash");
            config
        }
        Err(LoadError::Flash(FlashError::NotFound)) => {
            info!("No stored configuration, using {:?} table", revision);
            built_in(revision)
        }
        Err(e) => {
            warn!("Stored configuration rejected: {:?}, using {:?} table", e, revision);
            built_in(revision)
        }
    };
    log_config_summary(&config);
    config
}

/// Load and check the flash override
async fn load_override<F: FlashStorage>(storage: &mut F) -> Result<PanelConfig, LoadError> {
    let mut buffer = [0u8; MAX_CONFIG_SIZE];
    let len = storage.read(StorageKey::PanelConfig, &mut buffer).await?;

    debug!("Read {} bytes of panel config from flash", len);

    let config: PanelConfig =
        postcard::from_bytes(&buffer[..len]).map_err(|_| LoadError::Deserialize)?;

    if config.version != CONFIG_VERSION {
        return Err(LoadError::VersionMismatch(config.version));
    }
    config.validate()?;
    Ok(config)
}

fn built_in(revision: Revision) -> PanelConfig {
    let config = revision.panel_config();
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            error!("Built-in {:?} table is invalid: {:?}", revision, e);
            PanelConfig::default()
        }
    }
}

fn log_config_summary(config: &PanelConfig) {
    for (name, feature) in [
        ("encoders", FeatureSet::ENCODER),
        ("buttons", FeatureSet::BUTTON),
        ("pots", FeatureSet::POTENTIOMETER),
        ("touch", FeatureSet::TOUCH),
        ("pads", FeatureSet::PADS),
        ("matrices", FeatureSet::PAD_MATRIX),
        ("indicators", FeatureSet::INDICATOR),
    ] {
        debug!("  {} {}", config.boards_with(feature).count(), name);
    }
    debug!("  sampling: {:?}", config.sampling);
}
