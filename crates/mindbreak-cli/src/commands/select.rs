//! Selection commands: select, recommend, complete.

use mindbreak_core::{Activity, ActivityContent, HistoryDb, UsageRecord};

use super::{load_engine, load_prefs, wall_clock_now};

pub fn run_select(context: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = HistoryDb::open()?;
    let engine = load_engine(&db)?;
    let prefs = load_prefs()?;
    let now = wall_clock_now();

    if engine.daily_limit_reached(&prefs, now) {
        eprintln!(
            "note: daily limit of {} intentions reached; selecting anyway",
            prefs.max_daily
        );
    }

    let activity = engine.select(context, &prefs, now);

    // Mirror the in-memory recording into the durable log.
    db.append_usage(&UsageRecord::started(activity.id.clone(), context, now))?;
    db.prune(engine.history_snapshot().cap())?;

    print_activity(&activity);
    Ok(())
}

pub fn run_recommend(context: &str, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let db = HistoryDb::open()?;
    let engine = load_engine(&db)?;
    let prefs = load_prefs()?;

    let recs = engine.recommend(context, &prefs, wall_clock_now(), count);
    if recs.is_empty() {
        println!("No recommendations.");
        return Ok(());
    }
    for (i, rec) in recs.iter().enumerate() {
        println!(
            "{}. {} [{}] score {:.1} ({:?})",
            i + 1,
            rec.activity.title,
            rec.activity.category.name(),
            rec.score,
            rec.source,
        );
    }
    Ok(())
}

pub fn run_complete(activity: &str, context: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = HistoryDb::open()?;
    if db.mark_completed(activity, context, wall_clock_now())? {
        println!("Marked '{activity}' completed for '{context}'.");
    } else {
        println!("No open record for '{activity}' in '{context}'; nothing to do.");
    }
    Ok(())
}

fn print_activity(activity: &Activity) {
    println!("{} ({}s, {})", activity.title, activity.duration_secs, activity.category.name());
    match &activity.content {
        ActivityContent::Breathing {
            inhale_secs,
            hold_secs,
            exhale_secs,
            cycles,
        } => {
            println!(
                "  breathe in {inhale_secs}s / hold {hold_secs}s / out {exhale_secs}s, {cycles} cycles"
            );
        }
        ActivityContent::Guided { steps } | ActivityContent::Movement { instructions: steps } => {
            for step in steps {
                println!("  - {step}");
            }
        }
        ActivityContent::Prompt { text } | ActivityContent::Message { text } => {
            println!("  {}", text.trim());
        }
    }
}
