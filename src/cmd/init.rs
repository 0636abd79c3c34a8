//! Project initialization — `prime-numbers init`.

use anyhow::{Context, Result};
use std::path::Path;

use prime_numbers::config::{CONFIG_FILE, PrimeToml, get_prime_dir};
use prime_numbers::inventory::db::InventoryDb;

pub fn cmd_init(project_dir: &Path) -> Result<()> {
    let prime_dir = get_prime_dir(project_dir);
    let config_path = prime_dir.join(CONFIG_FILE);
    let was_initialized = config_path.exists();

    std::fs::create_dir_all(&prime_dir)
        .with_context(|| format!("Failed to create {}", prime_dir.display()))?;
    if !was_initialized {
        PrimeToml::default().save(&config_path)?;
    }

    let config = super::load_config(project_dir)?;
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    InventoryDb::new(&db_path).context("Failed to initialize inventory database")?;

    if was_initialized {
        println!(
            "Prime Numbers already initialized at {}",
            prime_dir.display()
        );
        println!("Database verified at {}", db_path.display());
        return Ok(());
    }

    println!("Initialized Prime Numbers at {}", prime_dir.display());
    println!();
    println!("Created:");
    println!("  .prime/");
    println!("  ├── prime.toml    # Configuration (use `prime-numbers config show`)");
    println!("  └── prime.db      # Listings and issued mirror numbers");
    println!();
    println!("Next steps:");
    println!("  1. Run `prime-numbers phones add <number> --price <MVR>`");
    println!("  2. Run `prime-numbers mirror generate` to issue a mirror number");
    println!("  3. Run `prime-numbers serve` to start the web API");

    Ok(())
}
