//! Context configuration.

use tagmem_region::RegionConfig;

use crate::error::CodecError;
use crate::externref::DEFAULT_TABLE_MAX;

/// Settings for a [`Context`](crate::Context).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextConfig {
    /// Region the context allocates from.
    pub region: RegionConfig,
    /// Slot limit of the reference table, null slot included.
    pub extern_table_max: u32,
}

impl ContextConfig {
    /// Config with a fixed-size region of `bytes` bytes.
    pub fn with_region_bytes(bytes: u32) -> Self {
        Self {
            region: RegionConfig::new(bytes),
            ..Self::default()
        }
    }

    /// Set the reference table's slot limit.
    pub fn with_extern_table_max(mut self, max: u32) -> Self {
        self.extern_table_max = max;
        self
    }

    /// Check the region settings and that the table has room for at least
    /// one object beside the null slot.
    pub fn validate(&self) -> Result<(), CodecError> {
        self.region.validate()?;
        if self.extern_table_max < 2 {
            return Err(CodecError::InvalidConfig {
                reason: format!(
                    "extern_table_max must be at least 2, got {}",
                    self.extern_table_max
                ),
            });
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            region: RegionConfig::default(),
            extern_table_max: DEFAULT_TABLE_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = ContextConfig::default();
        assert_eq!(config.extern_table_max, 65_536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn table_needs_a_usable_slot() {
        let config = ContextConfig::with_region_bytes(1024).with_extern_table_max(1);
        assert!(matches!(
            config.validate(),
            Err(CodecError::InvalidConfig { .. })
        ));
    }
}
