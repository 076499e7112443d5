mod config_content_provider;
mod config_manager;
mod config_serializer;
mod validate;

pub use config_content_provider::{ConfigContentProvider, FileContentConfigProvider};
pub use config_manager::{ConfigManager, SettingsManager};
pub use config_serializer::{ConfigSerializer, YamlConfigSerializer};
pub use validate::Validate;
