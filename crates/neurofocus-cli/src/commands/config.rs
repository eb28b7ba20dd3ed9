//! Host policy stored in `config.toml`, separate from the user settings.

use clap::Subcommand;
use neurofocus_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one policy value
    Get {
        /// Dot-separated key, e.g. "policy.breaks_pausable"
        key: String,
    },
    /// Change one policy value; the file is only written if the result is valid
    Set { key: String, value: String },
    /// Print every key with its current value
    List {
        #[arg(long)]
        json: bool,
    },
    /// Restore one key, or the whole file, to the defaults
    Reset { key: Option<String> },
    /// Print the location of config.toml
    Path,
}

fn unknown_key(config: &Config, key: &str) -> Box<dyn std::error::Error> {
    let known: Vec<String> = config.entries().into_iter().map(|(k, _)| k).collect();
    format!("unknown key: {key} (known keys: {})", known.join(", ")).into()
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or_else(|| unknown_key(&config, &key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for (key, value) in config.entries() {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset { key: Some(key) } => {
            let mut config = Config::load()?;
            if config.get(&key).is_none() {
                return Err(unknown_key(&config, &key));
            }
            config.reset_key(&key)?;
            println!("{key} reset to {}", config.get(&key).unwrap_or_default());
        }
        ConfigAction::Reset { key: None } => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
    }
    Ok(())
}
