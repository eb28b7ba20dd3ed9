use clap::Subcommand;
use neurofocus_core::settings::FIELD_NAMES;
use neurofocus_core::{Config, Database, Settings};

use super::format_duration;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one setting
    Set {
        /// One of activeStart, activeEnd, workDuration, shortBreakDuration,
        /// longBreakDuration, cyclesUntilLongBreak
        key: String,
        /// New value (HH:MM for times, seconds for durations)
        value: String,
    },
    /// Restore default durations and window (the site list is kept)
    Reset,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut settings = Settings::load(&db)?;

    match action {
        SettingsAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_settings(&settings);
            }
        }
        SettingsAction::Set { key, value } => {
            if !FIELD_NAMES.contains(&key.as_str()) {
                return Err(format!("unknown key: {key} (expected one of {})", FIELD_NAMES.join(", ")).into());
            }
            settings.set_field(&key, &value)?;
            let max_sites = Config::load_or_default().policy.max_distracting_sites;
            settings.validate(max_sites)?;
            settings.save(&db)?;
            println!("ok");
        }
        SettingsAction::Reset => {
            let reset = Settings {
                distracting_sites: settings.distracting_sites,
                ..Settings::default()
            };
            reset.save(&db)?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("Active window:        {}", settings.window());
    println!("Work:                 {}", format_duration(settings.work_duration));
    println!("Short break:          {}", format_duration(settings.short_break_duration));
    println!("Long break:           {}", format_duration(settings.long_break_duration));
    println!("Cycles to long break: {}", settings.cycles_until_long_break);
    if settings.distracting_sites.is_empty() {
        println!("Distracting sites:    (none)");
    } else {
        println!("Distracting sites:    {}", settings.distracting_sites.join(", "));
    }
}
