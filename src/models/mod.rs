//! Titan text model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Hosted text-generation models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum TextModel {
    #[strum(serialize = "amazon.titan-text-express-v1")]
    TitanTextExpress,
    #[strum(serialize = "amazon.titan-text-lite-v1")]
    TitanTextLite,
    #[strum(serialize = "amazon.titan-text-premier-v1:0")]
    TitanTextPremier,
    /// Any other model id, including provisioned-throughput ARNs.
    #[strum(default)]
    Custom(String),
}

impl Default for TextModel {
    fn default() -> Self {
        Self::TitanTextExpress
    }
}

impl TextModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::TitanTextExpress => "amazon.titan-text-express-v1",
            Self::TitanTextLite => "amazon.titan-text-lite-v1",
            Self::TitanTextPremier => "amazon.titan-text-premier-v1:0",
            Self::Custom(s) => s,
        }
    }

    /// Largest `maxTokenCount` the service accepts, when known.
    pub fn max_output_tokens(&self) -> Option<u32> {
        match self {
            Self::TitanTextExpress => Some(8_192),
            Self::TitanTextLite => Some(4_096),
            Self::TitanTextPremier => Some(3_072),
            Self::Custom(_) => None,
        }
    }
}
