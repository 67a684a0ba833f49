use anyhow::Result;

use crate::providers::base::Provider;
use crate::providers::echo::EchoProvider;
use crate::providers::gateway::{GatewayConfig, GatewayProvider};

/// Parsed form of a model identifier chosen by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelId {
    Echo,
    Gateway { model: String },
}

/// Recognize `echo` and `aipipe:<model>`. Anything else has no provider
/// and the caller must keep sending disabled.
pub fn parse_model_id(id: &str) -> Option<ModelId> {
    if id == "echo" {
        return Some(ModelId::Echo);
    }

    if let Some(model) = id.strip_prefix("aipipe:") {
        if !model.is_empty() {
            return Some(ModelId::Gateway {
                model: model.to_string(),
            });
        }
    }

    None
}

pub enum ProviderConfig {
    Echo,
    Gateway(GatewayConfig),
}

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider>> {
    match config {
        ProviderConfig::Echo => Ok(Box::new(EchoProvider)),
        ProviderConfig::Gateway(gateway_config) => {
            Ok(Box::new(GatewayProvider::new(gateway_config)?))
        }
    }
}
