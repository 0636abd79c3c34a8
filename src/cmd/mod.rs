//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|----------------------------------------------------|
//! | `init`          | `Init`                                             |
//! | `phones`        | `Phones` (add, list, edit, sold, delete)           |
//! | `mirror`        | `Mirror` (generate, history)                       |
//! | `promo`         | `Promo`                                            |
//! | `serve`         | `Serve`                                            |
//! | `config`        | `Config`                                           |

pub mod config;
pub mod init;
pub mod mirror;
pub mod phones;
pub mod promo;
pub mod serve;

pub use config::cmd_config;
pub use init::cmd_init;
pub use mirror::cmd_mirror;
pub use phones::cmd_phones;
pub use promo::cmd_promo;
pub use serve::cmd_serve;

use anyhow::Result;
use prime_numbers::config::PrimeConfig;
use prime_numbers::inventory::Inventory;
use std::path::Path;

/// Resolve configuration for `project_dir`, reporting unusable overrides.
pub(crate) fn load_config(project_dir: &Path) -> Result<PrimeConfig> {
    let config = PrimeConfig::new(project_dir.to_path_buf())?;
    for warning in &config.env_warnings {
        tracing::warn!("{}", warning);
    }
    Ok(config)
}

pub(crate) fn open_inventory(project_dir: &Path) -> Result<Inventory> {
    let config = load_config(project_dir)?;
    Inventory::open(&config)
}
