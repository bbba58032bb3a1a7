//! Date grouping for the calendar and deadline views.
//!
//! Everything here is pure: callers pass the collection and, where relevant,
//! today's date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::entity::{Document, Event, PersonalNote};

/// An item that sits on the calendar.
pub trait Dated {
  /// The day the item is shown on, if it has one.
  fn calendar_date(&self) -> Option<NaiveDate>;
}

impl Dated for Document {
  fn calendar_date(&self) -> Option<NaiveDate> { Some(self.deadline) }
}

impl Dated for Event {
  fn calendar_date(&self) -> Option<NaiveDate> { Some(self.date) }
}

impl Dated for PersonalNote {
  fn calendar_date(&self) -> Option<NaiveDate> { self.date }
}

// ─── Ordering & grouping ─────────────────────────────────────────────────────

/// Items in ascending date order. Ties keep their original order; undated
/// items go last.
pub fn sort_by_date<T: Dated>(items: &[T]) -> Vec<&T> {
  let mut sorted: Vec<&T> = items.iter().collect();
  sorted.sort_by_key(|item| (item.calendar_date().is_none(), item.calendar_date()));
  sorted
}

/// One month's worth of items.
#[derive(Debug)]
pub struct MonthGroup<'a, T> {
  pub year:  i32,
  pub month: u32,
  /// e.g. `"June 2025"`.
  pub label: String,
  pub items: Vec<&'a T>,
}

/// Groups dated items by calendar month, months ascending and items
/// ascending within each month. Undated items are skipped.
pub fn group_by_month<T: Dated>(items: &[T]) -> Vec<MonthGroup<'_, T>> {
  let mut months: BTreeMap<(i32, u32), Vec<&T>> = BTreeMap::new();
  for item in sort_by_date(items) {
    if let Some(date) = item.calendar_date() {
      months.entry((date.year(), date.month())).or_default().push(item);
    }
  }

  months
    .into_iter()
    .map(|((year, month), items)| MonthGroup {
      year,
      month,
      label: month_label(year, month),
      items,
    })
    .collect()
}

fn month_label(year: i32, month: u32) -> String {
  NaiveDate::from_ymd_opt(year, month, 1)
    .map(|d| d.format("%B %Y").to_string())
    .unwrap_or_else(|| format!("{year}-{month:02}"))
}

/// Items falling on `day`, in collection order.
pub fn on_day<T: Dated>(items: &[T], day: NaiveDate) -> Vec<&T> {
  items
    .iter()
    .filter(|item| item.calendar_date() == Some(day))
    .collect()
}

/// The distinct days to highlight on a calendar.
pub fn marked_days<T: Dated>(items: &[T]) -> BTreeSet<NaiveDate> {
  items.iter().filter_map(|item| item.calendar_date()).collect()
}

// ─── Deadlines ───────────────────────────────────────────────────────────────

/// Whole days from `today` until `deadline`; negative once it has passed.
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
  (deadline - today).num_days()
}

/// How urgent a deadline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
  Overdue { days: i64 },
  DueToday,
  /// Less than a week away.
  DueSoon { days: i64 },
  Upcoming { days: i64 },
}

impl DeadlineStatus {
  pub fn classify(deadline: NaiveDate, today: NaiveDate) -> Self {
    match days_remaining(deadline, today) {
      d if d < 0 => Self::Overdue { days: -d },
      0 => Self::DueToday,
      d if d < 7 => Self::DueSoon { days: d },
      d => Self::Upcoming { days: d },
    }
  }

  pub fn is_urgent(self) -> bool { !matches!(self, Self::Upcoming { .. }) }
}

/// 1-based position of a document in deadline order; the number shown on
/// its card.
pub fn document_number(documents: &[Document], id: &str) -> Option<usize> {
  sort_by_date(documents)
    .iter()
    .position(|d| d.id == id)
    .map(|i| i + 1)
}
