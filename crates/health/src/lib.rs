//! Health data access layer for VitalChat.
//!
//! Turns raw store queries into the daily series the tools consume:
//! daily-bucketed quantity aggregates, and the specialized 15:00-to-15:00
//! sleep-night windowing. Also provides the deterministic in-memory
//! [`SyntheticStore`] used by tests and the offline demo path.

pub mod series;
pub mod synthetic;

pub use series::{SLEEP_WINDOW_HOUR, fetch_quantity_series, fetch_sleep_series};
pub use synthetic::SyntheticStore;
