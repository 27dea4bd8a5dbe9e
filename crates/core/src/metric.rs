//! The metric catalog — the single source of truth for metric→store mapping.
//!
//! Six metrics are queryable. Five are quantity metrics with a store sample
//! type, a unit, and an aggregation kind. Sleep is structurally different:
//! it is computed from category interval samples over a fixed 15:00-to-15:00
//! night window, so it carries no quantity fields at all. Call sites must
//! branch on `HealthMetric::Sleep` before choosing a data-access operation.

use serde::{Deserialize, Serialize};

/// How a quantity metric's raw samples collapse into a daily value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    /// Add all samples in the day bucket (steps, energy, exercise minutes).
    Sum,
    /// Average all samples in the day bucket (body weight, resting HR).
    Average,
}

/// Store query parameters for a quantity metric.
///
/// Only the five non-sleep metrics have one of these; `Sleep` never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySpec {
    /// Opaque key identifying the store's sample type.
    pub provider_id: &'static str,
    /// Physical unit raw samples are converted to.
    pub unit: &'static str,
    /// Sum vs. average within a day bucket.
    pub aggregation: AggregateKind,
}

/// A health metric the assistant can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthMetric {
    Steps,
    ActiveEnergy,
    ExerciseMinutes,
    BodyWeight,
    RestingHeartRate,
    Sleep,
}

impl HealthMetric {
    /// Every metric in the catalog, in listing order.
    pub const ALL: [HealthMetric; 6] = [
        HealthMetric::Steps,
        HealthMetric::ActiveEnergy,
        HealthMetric::ExerciseMinutes,
        HealthMetric::BodyWeight,
        HealthMetric::RestingHeartRate,
        HealthMetric::Sleep,
    ];

    /// Parse a canonical metric key. Returns `None` for anything outside
    /// the six catalog keys — callers decide how to degrade.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "steps" => Some(Self::Steps),
            "activeEnergy" => Some(Self::ActiveEnergy),
            "exerciseMinutes" => Some(Self::ExerciseMinutes),
            "bodyWeight" => Some(Self::BodyWeight),
            "restingHeartRate" => Some(Self::RestingHeartRate),
            "sleep" => Some(Self::Sleep),
            _ => None,
        }
    }

    /// The canonical string key. Round-trips with [`HealthMetric::parse`].
    pub fn key(&self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::ActiveEnergy => "activeEnergy",
            Self::ExerciseMinutes => "exerciseMinutes",
            Self::BodyWeight => "bodyWeight",
            Self::RestingHeartRate => "restingHeartRate",
            Self::Sleep => "sleep",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Steps => "Steps",
            Self::ActiveEnergy => "Active Energy",
            Self::ExerciseMinutes => "Exercise Minutes",
            Self::BodyWeight => "Body Weight",
            Self::RestingHeartRate => "Resting Heart Rate",
            Self::Sleep => "Sleep",
        }
    }

    /// One-line description, shown to the model by `get_available_metrics`.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Steps => "Daily step count",
            Self::ActiveEnergy => "Active energy burned per day, in kilocalories",
            Self::ExerciseMinutes => "Minutes of exercise per day",
            Self::BodyWeight => "Body weight in kilograms",
            Self::RestingHeartRate => "Resting heart rate in beats per minute",
            Self::Sleep => "Hours of sleep per night",
        }
    }

    /// Store query parameters. `Some` for the five quantity metrics,
    /// `None` exactly when the metric is `Sleep`.
    pub fn quantity_spec(&self) -> Option<QuantitySpec> {
        match self {
            Self::Steps => Some(QuantitySpec {
                provider_id: "stepCount",
                unit: "count",
                aggregation: AggregateKind::Sum,
            }),
            Self::ActiveEnergy => Some(QuantitySpec {
                provider_id: "activeEnergyBurned",
                unit: "kcal",
                aggregation: AggregateKind::Sum,
            }),
            Self::ExerciseMinutes => Some(QuantitySpec {
                provider_id: "exerciseTime",
                unit: "min",
                aggregation: AggregateKind::Sum,
            }),
            Self::BodyWeight => Some(QuantitySpec {
                provider_id: "bodyMass",
                unit: "kg",
                aggregation: AggregateKind::Average,
            }),
            Self::RestingHeartRate => Some(QuantitySpec {
                provider_id: "restingHeartRate",
                unit: "bpm",
                aggregation: AggregateKind::Average,
            }),
            Self::Sleep => None,
        }
    }

    /// Unit label used when formatting daily values for the model.
    /// Sleep values are always expressed in hours (computed, not converted).
    pub fn unit_label(&self) -> &'static str {
        match self.quantity_spec() {
            Some(spec) => spec.unit,
            None => "hours",
        }
    }
}

impl std::fmt::Display for HealthMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
