//! Restriction schedule management and evaluation.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use mindbreak_core::{HistoryDb, RepeatRule, Schedule, TimeRange};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Check whether a schedule is active right now
    Check {
        /// Schedule identifier
        id: String,
    },
    /// Show the next time a schedule becomes active
    NextStart { id: String },
    /// Show when the current active window ends
    NextEnd { id: String },
    /// List stored schedules
    List,
    /// Add or replace a schedule
    Add {
        /// Schedule identifier
        id: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Time range as HH:MM-HH:MM (repeatable; overnight allowed)
        #[arg(long = "range", required = true)]
        ranges: Vec<String>,
        /// Repeat rule: daily, weekdays, weekends, weekly, monthly, custom
        #[arg(long, default_value = "daily")]
        repeat: String,
        /// Active days (0 = Sunday .. 6 = Saturday), overrides the repeat default
        #[arg(long = "day")]
        days: Vec<u8>,
        /// Exception date (YYYY-MM-DD, repeatable)
        #[arg(long = "except")]
        exceptions: Vec<String>,
    },
    /// Remove a schedule
    Remove { id: String },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HistoryDb::open()?;
    match action {
        ScheduleAction::Check { id } => {
            let schedule = require(&db, &id)?;
            let now = Local::now().naive_local();
            if schedule.is_active_at(now) {
                println!("'{}' is active", schedule.name);
            } else {
                println!("'{}' is not active", schedule.name);
            }
        }
        ScheduleAction::NextStart { id } => {
            let schedule = require(&db, &id)?;
            match schedule.next_start(Local::now().naive_local()) {
                Some(at) => println!("next start: {at}"),
                None => println!("no upcoming start within 7 days"),
            }
        }
        ScheduleAction::NextEnd { id } => {
            let schedule = require(&db, &id)?;
            match schedule.next_end(Local::now().naive_local()) {
                Some(at) => println!("active until {at}"),
                None => println!("not currently active"),
            }
        }
        ScheduleAction::List => {
            let schedules = db.load_schedules()?;
            if schedules.is_empty() {
                println!("No schedules.");
            }
            let now = Local::now().naive_local();
            for s in schedules {
                let state = if s.is_active_at(now) { "active" } else { "inactive" };
                println!("{} '{}' ({} ranges, {state})", s.id, s.name, s.ranges.len());
            }
        }
        ScheduleAction::Add {
            id,
            name,
            ranges,
            repeat,
            days,
            exceptions,
        } => {
            let repeat = parse_repeat(&repeat)?;
            let mut schedule = Schedule::new(id.clone(), name.unwrap_or_else(|| id.clone()), repeat);
            for range in &ranges {
                schedule.ranges.push(parse_range(range)?);
            }
            if !days.is_empty() {
                schedule.days = days;
            }
            for date in &exceptions {
                schedule.exceptions.push(parse_date(date)?);
            }
            db.save_schedule(&schedule)?;
            println!("Saved schedule '{id}'.");
        }
        ScheduleAction::Remove { id } => {
            if db.delete_schedule(&id)? {
                println!("Removed schedule '{id}'.");
            } else {
                println!("No schedule '{id}'.");
            }
        }
    }
    Ok(())
}

fn require(db: &HistoryDb, id: &str) -> Result<Schedule, Box<dyn std::error::Error>> {
    db.get_schedule(id)?
        .ok_or_else(|| format!("no schedule '{id}'").into())
}

fn parse_repeat(s: &str) -> Result<RepeatRule, Box<dyn std::error::Error>> {
    match s {
        "daily" => Ok(RepeatRule::Daily),
        "weekdays" => Ok(RepeatRule::Weekdays),
        "weekends" => Ok(RepeatRule::Weekends),
        "weekly" => Ok(RepeatRule::Weekly),
        "monthly" => Ok(RepeatRule::Monthly),
        "custom" => Ok(RepeatRule::Custom),
        other => Err(format!("unknown repeat rule '{other}'").into()),
    }
}

fn parse_range(s: &str) -> Result<TimeRange, Box<dyn std::error::Error>> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected HH:MM-HH:MM, got '{s}'"))?;
    Ok(TimeRange {
        start_minute: parse_minute(start)?,
        end_minute: parse_minute(end)?,
    })
}

fn parse_minute(s: &str) -> Result<u16, Box<dyn std::error::Error>> {
    let (h, m) = s
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{s}'"))?;
    let hours: u16 = h.parse()?;
    let minutes: u16 = m.parse()?;
    if hours > 23 || minutes > 59 {
        return Err(format!("time out of range: '{s}'").into());
    }
    Ok(hours * 60 + minutes)
}

fn parse_date(s: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_normal_and_overnight() {
        let r = parse_range("09:00-17:30").unwrap();
        assert_eq!((r.start_minute, r.end_minute), (540, 1050));

        let r = parse_range("22:00-06:00").unwrap();
        assert!(r.is_overnight());
    }

    #[test]
    fn parse_range_rejects_garbage() {
        assert!(parse_range("morning").is_err());
        assert!(parse_range("25:00-26:00").is_err());
    }
}
