//! Usage history inspection.

use clap::Subcommand;
use std::collections::BTreeMap;

use mindbreak_core::HistoryDb;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Show recent usage records
    Show {
        /// Number of records
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Per-activity selection counts and completion rates
    Stats,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HistoryDb::open()?;
    let log = db.load_default_log()?;
    match action {
        HistoryAction::Show { limit } => {
            if log.is_empty() {
                println!("No usage records.");
                return Ok(());
            }
            for record in log.recent(limit) {
                let outcome = if record.completed { "completed" } else { "open" };
                println!(
                    "{} {} in {} ({outcome})",
                    record.selected_at.format("%Y-%m-%d %H:%M"),
                    record.activity_id,
                    record.context_id,
                );
            }
        }
        HistoryAction::Stats => {
            let mut totals: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
            for record in log.records() {
                let entry = totals.entry(record.activity_id.as_str()).or_default();
                entry.0 += 1;
                if record.completed {
                    entry.1 += 1;
                }
            }
            if totals.is_empty() {
                println!("No usage records.");
                return Ok(());
            }
            for (activity, (total, completed)) in totals {
                let rate = completed as f64 / total as f64 * 100.0;
                println!("{activity}: {total} selections, {completed} completed ({rate:.0}%)");
            }
        }
    }
    Ok(())
}
