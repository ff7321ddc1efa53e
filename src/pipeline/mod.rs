//! Pipeline entry points for rank watching.
//!
//! - `lookup`: Fetch the list and compute one applicant's position
//! - `detect`: Decide whether a newly published list superseded the last one
//! - `dispatch`: Fan update notifications out to subscribers
//! - `monitor`: Service tying the above to a background poll loop

pub mod detect;
pub mod dispatch;
pub mod lookup;
pub mod monitor;

pub use detect::{ChangeDetector, Detection};
pub use dispatch::{DispatchSummary, Dispatcher};
pub use lookup::{PositionLookup, report_for};
pub use monitor::{MonitorService, MonitorStatus, SubscribeOutcome, TickOutcome};
