//! Preference management.

use clap::Subcommand;

use mindbreak_core::{ActivityCategory, PreferencesStore};

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show current preferences as TOML
    Show,
    /// Show the preferences file path
    Path,
    /// Validate stored preferences
    Validate,
    /// Set a preference value
    Set {
        /// Key: variety, smart, max-daily, categories
        key: String,
        /// Value (bool, number, or comma-separated category list)
        value: String,
    },
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = PreferencesStore::open()?;
    match action {
        PrefsAction::Show => {
            let prefs = store.load()?;
            print!("{}", toml::to_string_pretty(&prefs)?);
        }
        PrefsAction::Path => {
            println!("{}", store.path().display());
        }
        PrefsAction::Validate => {
            let prefs = store.load()?;
            match prefs.validate() {
                Ok(()) => println!("Preferences are valid."),
                Err(e) => {
                    println!("Invalid preferences: {e}");
                    std::process::exit(1);
                }
            }
        }
        PrefsAction::Set { key, value } => {
            let mut prefs = store.load()?;
            match key.as_str() {
                "variety" => prefs.variety_enabled = value.parse()?,
                "smart" => prefs.smart_selection = value.parse()?,
                "max-daily" => prefs.max_daily = value.parse()?,
                "categories" => {
                    let mut categories = Vec::new();
                    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                        let cat = ActivityCategory::parse(name)
                            .ok_or_else(|| format!("unknown category '{name}'"))?;
                        categories.push(cat);
                    }
                    prefs.preferred_categories = categories;
                }
                other => return Err(format!("unknown preference key '{other}'").into()),
            }
            // Reject invalid edits before they reach disk.
            prefs.validate()?;
            store.save(&prefs)?;
            println!("Saved.");
        }
    }
    Ok(())
}
