//! System prompt construction.
//!
//! Two modes. Tool-use mode embeds no data: it tells the model what tools
//! exist and to fetch before answering. Legacy mode is for backends
//! without tool calling: a fixed 14-day summary is rendered straight into
//! the system prompt.

use chrono::NaiveDate;
use tracing::warn;

/// How the model gets at health data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// The model calls tools on demand.
    ToolUse,
    /// A fixed two-week dump is embedded upfront (no tool support).
    LegacyDump,
}

/// Number of days the legacy dump covers.
pub const LEGACY_DUMP_DAYS: usize = 14;

/// One day's metric bundle for the legacy dump. Every field is optional;
/// absent fields are simply omitted from the rendered line.
#[derive(Debug, Clone, Default)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub steps: Option<i64>,
    pub sleep_hours: Option<f64>,
    pub active_energy: Option<f64>,
    pub exercise_minutes: Option<f64>,
    pub body_weight: Option<f64>,
    pub resting_heart_rate: Option<i64>,
}

impl DailySummary {
    fn render(&self) -> String {
        let mut fields = Vec::new();
        if let Some(steps) = self.steps {
            fields.push(format!("{steps} steps"));
        }
        if let Some(hours) = self.sleep_hours {
            fields.push(format!("{hours:.1}h sleep"));
        }
        if let Some(kcal) = self.active_energy {
            fields.push(format!("{kcal:.1} kcal active"));
        }
        if let Some(minutes) = self.exercise_minutes {
            fields.push(format!("{minutes:.1} min exercise"));
        }
        if let Some(kg) = self.body_weight {
            fields.push(format!("{kg:.1} kg"));
        }
        if let Some(bpm) = self.resting_heart_rate {
            fields.push(format!("{bpm} bpm resting HR"));
        }
        if fields.is_empty() {
            format!("{}: no data", self.date)
        } else {
            format!("{}: {}", self.date, fields.join(", "))
        }
    }
}

/// System instructions for tool-use mode.
///
/// The three tool names appear literally — the model resolves tool
/// identity partly from prompt text, so this is a tested property.
pub fn tool_use_instructions(today: NaiveDate) -> String {
    format!(
        "You are a personal health assistant. Today's date is {today}.\n\
         \n\
         You answer questions about the user's own health data. You have no \
         data in this prompt — never fabricate or estimate values. Always \
         fetch real data with the tools before answering:\n\
         - get_available_metrics: list the metrics that can be queried. Use \
         it when unsure what data exists.\n\
         - get_health_metric: fetch one metric's daily values over the last \
         N days (1-90).\n\
         - compare_periods: compare a metric's average across two periods, \
         given as day offsets from today.\n\
         \n\
         Be concise and actionable. Summarize trends instead of repeating \
         every data point, and mention the date range your answer covers. If \
         a tool reports an error, say what went wrong rather than guessing."
    )
}

/// System instructions for legacy data-dump mode.
///
/// Expects exactly [`LEGACY_DUMP_DAYS`] entries, oldest first; a mismatch
/// is logged and rendered as-is rather than rejected.
pub fn legacy_data_instructions(today: NaiveDate, days: &[DailySummary]) -> String {
    if days.len() != LEGACY_DUMP_DAYS {
        warn!(
            entries = days.len(),
            expected = LEGACY_DUMP_DAYS,
            "Legacy dump called with unexpected day count"
        );
    }

    let mut out = format!(
        "You are a personal health assistant. Today's date is {today}.\n\
         \n\
         Below is the user's health data for the last two weeks, one line \
         per day. Answer questions using only this data — never fabricate \
         values. Be concise and actionable.\n\n"
    );
    for day in days {
        out.push_str(&day.render());
        out.push('\n');
    }
    out
}
