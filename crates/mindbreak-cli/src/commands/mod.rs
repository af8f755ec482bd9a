pub mod catalog;
pub mod history;
pub mod prefs;
pub mod schedule;
pub mod select;

use chrono::{DateTime, Local, Utc};
use mindbreak_core::{Catalog, HistoryDb, Preferences, PreferencesStore, SelectionEngine};

/// Selection clock: the user's local wall time, carried as Utc so the
/// engine's hour-of-day windows line up with the clock on the wall.
pub fn wall_clock_now() -> DateTime<Utc> {
    Local::now().naive_local().and_utc()
}

/// Open the store and build an engine over the persisted catalog/history.
pub fn load_engine(db: &HistoryDb) -> Result<SelectionEngine, Box<dyn std::error::Error>> {
    let customs = db.load_customs()?;
    let catalog = Catalog::with_customs(customs)?;
    let log = db.load_default_log()?;
    Ok(SelectionEngine::with_history(catalog, log))
}

/// Load preferences from the default store.
pub fn load_prefs() -> Result<Preferences, Box<dyn std::error::Error>> {
    Ok(PreferencesStore::open()?.load()?)
}
