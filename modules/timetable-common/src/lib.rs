pub mod element;
pub mod error;
pub mod format;
pub mod period;
pub mod raw;
pub mod schedule;

pub use element::Element;
pub use error::{Result, TimetableError};
pub use period::{Elements, LessonCode, LessonKind, Period, PeriodRecord};
pub use raw::{RawElement, RawPeriod};
pub use schedule::{PeriodStatus, Schedule, ScheduleCollection, ScheduledPeriod};
