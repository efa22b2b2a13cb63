//! Weekly schedule reconstruction.
//!
//! [`ScheduleCollection::from_periods`] groups a chronological list of periods
//! into recurring weekly slots. [`ScheduleCollection::combine_sequential_schedules`]
//! then merges slots that are really the two halves of one longer lesson
//! (a double period), pairing their occurrences date by date.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use tracing::{debug, warn};

use crate::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Matches the schedule's reference period.
    Unchanged,
    /// Cancelled, substituted, or otherwise different from the reference.
    Changed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledPeriod {
    pub period: Period,
    pub status: PeriodStatus,
}

/// Periods that represent the same recurring slot, each classified against a
/// reference period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    entries: Vec<ScheduledPeriod>,
    #[serde(skip)]
    reference: Option<usize>,
}

fn classify(reference: &Period, period: &Period) -> PeriodStatus {
    if period.deviates_from_schedule()
        || period.code() != reference.code()
        || !period.has_same_elements_as(reference)
    {
        PeriodStatus::Changed
    } else {
        PeriodStatus::Unchanged
    }
}

impl Schedule {
    /// Build a schedule whose first period is the reference. Callers pass
    /// periods sharing one weekly slot.
    pub(crate) fn new(periods: Vec<Period>) -> Self {
        let Some(reference) = periods.first().cloned() else {
            return Self {
                entries: Vec::new(),
                reference: None,
            };
        };

        let entries = periods
            .into_iter()
            .map(|period| ScheduledPeriod {
                status: classify(&reference, &period),
                period,
            })
            .collect();

        Self {
            entries,
            reference: Some(0),
        }
    }

    pub fn entries(&self) -> &[ScheduledPeriod] {
        &self.entries
    }

    pub fn periods(&self) -> impl Iterator<Item = &Period> {
        self.entries.iter().map(|entry| &entry.period)
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &Period> {
        self.with_status(PeriodStatus::Unchanged)
    }

    pub fn changed(&self) -> impl Iterator<Item = &Period> {
        self.with_status(PeriodStatus::Changed)
    }

    fn with_status(&self, status: PeriodStatus) -> impl Iterator<Item = &Period> {
        self.entries
            .iter()
            .filter(move |entry| entry.status == status)
            .map(|entry| &entry.period)
    }

    /// The period every other entry was classified against.
    pub fn reference(&self) -> Option<&Period> {
        self.reference.map(|index| &self.entries[index].period)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lesson_number(&self) -> Option<i64> {
        self.reference().map(Period::lesson_number)
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.reference().map(Period::weekday)
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.reference().map(Period::start_time)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.reference().map(Period::end_time)
    }

    /// Merge with the schedule that follows it, pairing periods by date.
    ///
    /// Returns `None` unless at least one date pairs two combinable periods.
    /// Periods left without a combinable partner are kept as they are and
    /// marked changed; the earliest combined period becomes the reference.
    pub fn combine_with(&self, next: &Schedule) -> Option<Schedule> {
        let mut by_date: BTreeMap<NaiveDate, (Vec<&Period>, Vec<&Period>)> = BTreeMap::new();
        for period in self.periods() {
            by_date.entry(period.date()).or_default().0.push(period);
        }
        for period in next.periods() {
            by_date.entry(period.date()).or_default().1.push(period);
        }

        let mut combined: Vec<Period> = Vec::new();
        let mut leftover: Vec<Period> = Vec::new();
        for (ours, theirs) in by_date.into_values() {
            let mut theirs: Vec<Option<&Period>> = theirs.into_iter().map(Some).collect();
            for period in ours {
                let partner = theirs
                    .iter_mut()
                    .find(|slot| slot.is_some_and(|other| period.can_be_combined_with(other)))
                    .and_then(Option::take);
                match partner {
                    Some(other) => combined.push(period.combine_with(other)),
                    None => leftover.push(period.clone()),
                }
            }
            leftover.extend(theirs.into_iter().flatten().cloned());
        }

        let reference = combined.first()?.clone();
        if !leftover.is_empty() {
            warn!(
                lesson_number = reference.lesson_number(),
                combined = combined.len(),
                uncombined = leftover.len(),
                "Partially combined schedules"
            );
        }

        let mut entries: Vec<ScheduledPeriod> = combined
            .into_iter()
            .map(|period| ScheduledPeriod {
                status: classify(&reference, &period),
                period,
            })
            .chain(leftover.into_iter().map(|period| ScheduledPeriod {
                period,
                status: PeriodStatus::Changed,
            }))
            .collect();
        entries.sort_by_key(|entry| (entry.period.start(), entry.period.end()));

        let reference = entries
            .iter()
            .position(|entry| entry.period == reference);

        Some(Schedule { entries, reference })
    }
}

/// Key of a weekly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SlotKey {
    lesson_number: i64,
    weekday: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl SlotKey {
    fn of(period: &Period) -> Self {
        Self {
            lesson_number: period.lesson_number(),
            weekday: period.weekday(),
            start_time: period.start_time(),
            end_time: period.end_time(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleCollection {
    schedules: Vec<Schedule>,
}

impl ScheduleCollection {
    /// Group chronologically ordered periods by weekly slot. Slots keep the
    /// order in which they were first seen and periods keep input order.
    pub fn from_periods(periods: impl IntoIterator<Item = Period>) -> Self {
        let mut slots: HashMap<SlotKey, usize> = HashMap::new();
        let mut groups: Vec<Vec<Period>> = Vec::new();

        for period in periods {
            let index = *slots.entry(SlotKey::of(&period)).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[index].push(period);
        }

        Self {
            schedules: groups.into_iter().map(Schedule::new).collect(),
        }
    }

    /// Merge neighbouring schedules that form one longer lesson. Chains
    /// (triple periods and longer) collapse in a single pass, and a merged
    /// entry is retried against its predecessor until nothing more combines.
    pub fn combine_sequential_schedules(&self) -> Self {
        let mut schedules: Vec<Schedule> = Vec::with_capacity(self.schedules.len());

        for schedule in &self.schedules {
            let merged = schedules
                .last()
                .and_then(|previous| previous.combine_with(schedule));
            match merged {
                Some(merged) => {
                    if let Some(last) = schedules.last_mut() {
                        *last = merged;
                    }
                    // A grown entry may now join the one kept before it.
                    while let [.., previous, last] = schedules.as_slice() {
                        let Some(merged) = previous.combine_with(last) else {
                            break;
                        };
                        schedules.pop();
                        if let Some(last) = schedules.last_mut() {
                            *last = merged;
                        }
                    }
                }
                None => schedules.push(schedule.clone()),
            }
        }

        debug!(
            before = self.schedules.len(),
            after = schedules.len(),
            "Combined sequential schedules"
        );
        Self { schedules }
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Schedule> {
        self.schedules.iter()
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

impl IntoIterator for ScheduleCollection {
    type Item = Schedule;
    type IntoIter = std::vec::IntoIter<Schedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.schedules.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScheduleCollection {
    type Item = &'a Schedule;
    type IntoIter = std::slice::Iter<'a, Schedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.schedules.iter()
    }
}
