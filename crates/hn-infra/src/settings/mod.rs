mod config_loader;

pub use config_loader::{load_config, load_config_or_default};
