//! Configuration for the [`TransferProcessor`](crate::types::TransferProcessor)

use serde::{Deserialize, Serialize};

use crate::{errors::Error, types::Amount};

/// Fee charged to the sender of every completed transfer, unless configured otherwise
pub const DEFAULT_FEE: u32 = 1;

/// Smallest amount that may be transferred, unless configured otherwise
pub const DEFAULT_MINIMUM_AMOUNT: Amount = 100;

/// Settings shared by every transfer a processor makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Fee debited from the sender on top of the transferred amount
    pub fee: u32,
    /// Business floor on the transferable amount
    pub minimum_amount: Amount,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            fee: DEFAULT_FEE,
            minimum_amount: DEFAULT_MINIMUM_AMOUNT,
        }
    }
}

impl ProcessorConfig {
    /// Parses a configuration from TOML. Missing keys take their defaults.
    ///
    /// ```toml
    /// fee = 5
    /// minimum_amount = 250
    /// ```
    /// # Errors
    /// [`Error::Config`] if the input is not valid TOML, or the minimum amount is negative
    pub fn from_toml_str(input: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values are usable by a processor.
    /// # Errors
    /// [`Error::Config`] if the minimum amount is negative
    pub fn validate(&self) -> Result<(), Error> {
        if self.minimum_amount < 0 {
            return Err(Error::Config(format!(
                "minimum_amount can't be negative: {}",
                self.minimum_amount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.fee, 1);
        assert_eq!(config.minimum_amount, 100);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = ProcessorConfig::from_toml_str("fee = 7\n").unwrap();
        assert_eq!(config.fee, 7);
        assert_eq!(config.minimum_amount, DEFAULT_MINIMUM_AMOUNT);
        assert_eq!(
            ProcessorConfig::from_toml_str("").unwrap(),
            ProcessorConfig::default()
        );
    }

    #[test]
    fn test_reject_bad_toml() {
        assert!(matches!(
            ProcessorConfig::from_toml_str("fee = -1"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ProcessorConfig::from_toml_str("minimum_amount = -5"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ProcessorConfig::from_toml_str("fee = \"one\""),
            Err(Error::Config(_))
        ));
    }
}
