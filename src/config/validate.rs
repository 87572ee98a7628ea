// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RevaldagError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RevaldagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.engine, raw.node_type))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_node_type_names(cfg)?;
    Ok(())
}

fn validate_node_type_names(cfg: &RawConfigFile) -> Result<()> {
    // Strategy and hook kinds are strongly typed and validated during
    // deserialization, so the remaining checks are about the table keys.
    for name in cfg.node_type.keys() {
        if name.trim().is_empty() {
            return Err(RevaldagError::ConfigError(
                "[node_type] section names must be non-empty".to_string(),
            ));
        }
    }
    Ok(())
}
