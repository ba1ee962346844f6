//! Reminder creation and the shared, mutex-guarded ReminderSet.
//!
//! The book owns the only in-memory copy of the set. Every mutation (add, take_due,
//! clear) runs its save under the same lock, so the control path and the scheduler
//! can never interleave a read-modify-write.

use crate::documents::{Reminder, ReminderSet};
use crate::store::StateStore;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

const MAX_RELATIVE_AMOUNT: i64 = 100_000;

// ---------------------------------------------------------------------------
// Time expressions
// ---------------------------------------------------------------------------

enum Unit {
    Minutes,
    Hours,
    Days,
}

fn parse_unit(word: &str) -> Option<Unit> {
    let w = word.trim_end_matches('.');
    let w = w.strip_suffix('s').unwrap_or(w);
    match w {
        "minute" | "min" | "mn" => Some(Unit::Minutes),
        "hour" | "hr" | "h" | "heure" => Some(Unit::Hours),
        "day" | "jour" => Some(Unit::Days),
        _ => None,
    }
}

fn parse_amount(word: &str) -> Option<i64> {
    if let Ok(n) = word.parse::<i64>() {
        return Some(n.clamp(0, MAX_RELATIVE_AMOUNT));
    }
    let n = match word {
        "a" | "an" | "one" | "un" | "une" => 1,
        "two" | "deux" => 2,
        "three" | "trois" => 3,
        "four" | "quatre" => 4,
        "five" | "cinq" => 5,
        "six" => 6,
        "seven" | "sept" => 7,
        "eight" | "huit" => 8,
        "nine" | "neuf" => 9,
        "ten" | "dix" => 10,
        "fifteen" | "quinze" => 15,
        "twenty" | "vingt" => 20,
        "thirty" | "trente" => 30,
        _ => return None,
    };
    Some(n)
}

fn relative<Tz: TimeZone>(words: &[&str], now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let (amount, unit_word) = match words {
        [] => (1, None),
        [first, rest @ ..] => match parse_amount(first) {
            Some(n) => (n, rest.first().copied()),
            // "in hour" / "in ten-ish minutes": amount unparsable, unit may be the first word
            None if parse_unit(first).is_some() => (1, Some(*first)),
            None => (1, rest.first().copied()),
        },
    };
    let delta = match unit_word.map(parse_unit) {
        None => Duration::hours(amount),
        Some(Some(Unit::Minutes)) => Duration::minutes(amount),
        Some(Some(Unit::Hours)) => Duration::hours(amount),
        Some(Some(Unit::Days)) => Duration::days(amount),
        Some(None) => return None,
    };
    now.clone().checked_add_signed(delta)
}

fn absolute<Tz: TimeZone>(clock: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let time = NaiveTime::parse_from_str(clock, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(clock, "%Hh%M"))
        .ok()?;
    let naive = now.date_naive().and_time(time);
    let today = now.timezone().from_local_datetime(&naive).earliest()?;
    if &today < now {
        today.checked_add_signed(Duration::days(1))
    } else {
        Some(today)
    }
}

/// Resolves a reminder time expression against `now`.
///
/// * `in N unit` / `dans N unité`: unit minute, hour or day (plurals fine); no unit
///   means hours, an unparsable amount means 1, an unknown unit means one hour.
/// * `at HH:MM` / `à HH:MM` / bare `HH:MM`: next occurrence of that clock time.
/// * Anything else resolves to one hour from now.
pub fn parse_due_time<Tz: TimeZone>(expr: &str, now: &DateTime<Tz>) -> DateTime<Tz> {
    let fallback = || now.clone() + Duration::hours(1);
    let expr = expr.trim().to_lowercase();
    let words: Vec<&str> = expr.split_whitespace().collect();
    let parsed = match words.as_slice() {
        [] => None,
        ["in" | "dans", rest @ ..] => relative(rest, now),
        ["at" | "à" | "a", clock, ..] => absolute(clock, now),
        [clock, ..] => absolute(clock, now),
    };
    parsed.unwrap_or_else(fallback)
}

// ---------------------------------------------------------------------------
// ReminderBook
// ---------------------------------------------------------------------------

/// Cloneable handle to the shared ReminderSet.
#[derive(Clone)]
pub struct ReminderBook {
    set: Arc<Mutex<ReminderSet>>,
    store: StateStore,
}

impl ReminderBook {
    /// Loads the persisted set (empty on any read problem).
    pub fn open(store: StateStore) -> Self {
        let set: ReminderSet = store.load();
        info!(target: "raki::reminders", pending = set.len(), "reminders loaded");
        Self {
            set: Arc::new(Mutex::new(set)),
            store,
        }
    }

    pub async fn add(
        &self,
        text: impl Into<String>,
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Reminder {
        let reminder = Reminder::new(text, due_at, now);
        let mut set = self.set.lock().await;
        set.0.push(reminder.clone());
        self.persist(&set);
        info!(target: "raki::reminders", due_at = %reminder.due_at, pending = set.len(), "reminder added");
        reminder
    }

    /// Removes and returns every reminder due at `now`, in stored order.
    /// The remaining set is persisted before the lock is released.
    pub async fn take_due(&self, now: DateTime<Utc>) -> Vec<Reminder> {
        let mut set = self.set.lock().await;
        if !set.0.iter().any(|r| r.is_due(now)) {
            return Vec::new();
        }
        let (due, pending): (Vec<Reminder>, Vec<Reminder>) =
            std::mem::take(&mut set.0).into_iter().partition(|r| r.is_due(now));
        set.0 = pending;
        self.persist(&set);
        due
    }

    pub async fn snapshot(&self) -> ReminderSet {
        self.set.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.set.lock().await.len()
    }

    /// Holds the set so a caller can change disk and memory as one step.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ReminderSet> {
        self.set.lock().await
    }

    fn persist(&self, set: &ReminderSet) {
        if let Err(e) = self.store.save(set) {
            warn!(target: "raki::reminders", error = %e, "failed to persist reminders");
        }
    }
}
