//! Activity catalog management.

use clap::Subcommand;

use mindbreak_core::{Activity, ActivityCategory, ActivityContent, Catalog, HistoryDb};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List all activities (built-in and custom)
    List {
        /// Filter by category name
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one activity as JSON
    Show {
        /// Activity identifier
        id: String,
    },
    /// Add a custom activity with a plain message payload
    AddCustom {
        /// Activity identifier
        id: String,
        /// Display title
        #[arg(long)]
        title: String,
        /// Category name
        #[arg(long)]
        category: String,
        /// Duration in seconds
        #[arg(long, default_value_t = 60)]
        duration: u32,
        /// Message shown during the break
        #[arg(long)]
        message: String,
        /// Free-text tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Remove a custom activity
    RemoveCustom {
        /// Activity identifier
        id: String,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HistoryDb::open()?;
    let mut catalog = Catalog::with_customs(db.load_customs()?)?;
    match action {
        CatalogAction::List { category } => {
            let filter = category
                .as_deref()
                .map(|name| {
                    ActivityCategory::parse(name)
                        .ok_or_else(|| format!("unknown category '{name}'"))
                })
                .transpose()?;
            for activity in catalog.all() {
                if let Some(cat) = filter {
                    if activity.category != cat {
                        continue;
                    }
                }
                let kind = if activity.custom { "custom" } else { "built-in" };
                println!(
                    "{} '{}' [{}] {}s ({kind})",
                    activity.id,
                    activity.title,
                    activity.category.name(),
                    activity.duration_secs,
                );
            }
        }
        CatalogAction::Show { id } => {
            let activity = catalog
                .get(&id)
                .ok_or_else(|| format!("no activity '{id}'"))?;
            println!("{}", serde_json::to_string_pretty(activity)?);
        }
        CatalogAction::AddCustom {
            id,
            title,
            category,
            duration,
            message,
            tags,
        } => {
            let category = ActivityCategory::parse(&category)
                .ok_or_else(|| format!("unknown category '{category}'"))?;
            let activity = Activity {
                id: id.clone(),
                title,
                category,
                duration_secs: duration,
                content: ActivityContent::Message { text: message },
                tags,
                custom: true,
            };
            // Enforces duration bounds and id uniqueness.
            catalog.add_custom(activity.clone())?;
            db.save_custom(&activity)?;
            println!("Added custom activity '{id}'.");
        }
        CatalogAction::RemoveCustom { id } => {
            if catalog.remove_custom(&id) {
                db.delete_custom(&id)?;
                println!("Removed custom activity '{id}'.");
            } else {
                println!("No custom activity '{id}'.");
            }
        }
    }
    Ok(())
}
