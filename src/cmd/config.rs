//! Configuration view and validation commands — `prime-numbers config`.

use anyhow::Result;

use prime_numbers::config::{CONFIG_FILE, PrimeConfig, PrimeToml, get_prime_dir};

use super::super::ConfigCommands;

pub fn cmd_config(project_dir: &std::path::Path, command: Option<ConfigCommands>) -> Result<()> {
    let prime_dir = get_prime_dir(project_dir);
    let config_path = prime_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Prime Numbers Configuration");
            println!("===========================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
                println!();
                print_toml(&PrimeToml::load(&config_path)?);
            } else {
                println!("No prime.toml found at {}", config_path.display());
                println!();
                println!("Using default configuration:");
                print_toml(&PrimeToml::default());
                println!("Run 'prime-numbers config init' to create a prime.toml file.");
                println!();
            }

            // Show effective values (including env overrides)
            let config = super::load_config(project_dir)?;
            print_effective(&config);
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let config = PrimeConfig::new(project_dir.to_path_buf())?;
            let warnings = config.validate();

            if warnings.is_empty() {
                if config_path.exists() {
                    println!("Configuration is valid.");
                } else {
                    println!("No prime.toml found. Using defaults (valid).");
                }
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("prime.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !prime_dir.exists() {
                std::fs::create_dir_all(&prime_dir)?;
            }

            PrimeToml::default().save(&config_path)?;

            println!("Created prime.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [store] db_path");
            println!("  - [server] host, port");
            println!("  - [mirror] max_attempts");
            println!("  - [selection] max_selected");
            println!();
        }
    }

    Ok(())
}

fn print_toml(toml: &PrimeToml) {
    println!("[store]");
    println!("  db_path = \"{}\"", toml.store.db_path.display());
    println!();
    println!("[server]");
    println!("  host = \"{}\"", toml.server.host);
    println!("  port = {}", toml.server.port);
    println!();
    println!("[mirror]");
    println!("  max_attempts = {}", toml.mirror.max_attempts);
    println!();
    println!("[selection]");
    println!("  max_selected = {}", toml.selection.max_selected);
    println!();
}

fn print_effective(config: &PrimeConfig) {
    println!("Effective values (with env overrides):");
    println!("  db_path = \"{}\"", config.db_path().display());
    println!("  host = \"{}\"", config.host());
    println!("  port = {}", config.port());
    println!("  max_attempts = {}", config.max_attempts());
    println!("  max_selected = {}", config.max_selected());
    println!();
}
