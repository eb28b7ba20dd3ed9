use clap::Subcommand;
use neurofocus_core::{Config, Database, Settings};

#[derive(Subcommand)]
pub enum SitesAction {
    /// List distracting sites
    List,
    /// Add a site (hostname or URL)
    Add { host: String },
    /// Remove a site
    Remove { host: String },
}

pub fn run(action: SitesAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut settings = Settings::load(&db)?;

    match action {
        SitesAction::List => {
            for site in &settings.distracting_sites {
                println!("{site}");
            }
        }
        SitesAction::Add { host } => {
            let max_sites = Config::load_or_default().policy.max_distracting_sites;
            if settings.add_site(&host, max_sites)? {
                settings.save(&db)?;
                println!("added");
            } else {
                println!("already listed");
            }
        }
        SitesAction::Remove { host } => {
            if settings.remove_site(&host) {
                settings.save(&db)?;
                println!("removed");
            } else {
                return Err(format!("not listed: {host}").into());
            }
        }
    }
    Ok(())
}
