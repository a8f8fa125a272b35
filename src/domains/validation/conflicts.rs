//! Pairwise conflict heuristics for concurrently running experiments.
//!
//! Two experiments are only compared when their running windows overlap; a
//! missing start or end date leaves that side of the window open.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::analysis::{AnalysisError, AnalysisResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An experiment as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentDescriptor {
    /// Unique experiment identifier.
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Percentage of eligible traffic enrolled (0-100).
    #[serde(default = "full_allocation")]
    pub traffic_allocation: f64,

    /// Pages or surfaces the experiment runs on.
    #[serde(default)]
    pub pages: Vec<String>,

    /// Metrics the experiment is evaluated on.
    #[serde(default)]
    pub metrics: Vec<String>,

    /// Targeted audience segment; absent means everyone.
    #[serde(default)]
    pub audience: Option<String>,

    /// First running day, YYYY-MM-DD.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Last running day, YYYY-MM-DD.
    #[serde(default)]
    pub end_date: Option<String>,
}

fn full_allocation() -> f64 {
    100.0
}

/// Kind of overlap detected between two experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    PageOverlap,
    TrafficOverlap,
    MetricOverlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

/// One detected conflict between a pair of experiments.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub experiment_a: String,
    pub experiment_b: String,
    pub kind: ConflictKind,
    pub severity: ConflictSeverity,
    /// Shared pages or metrics behind the conflict.
    pub shared: Vec<String>,
    pub message: String,
}

/// Result of comparing every pair of experiments.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub total_experiments: usize,
    pub pairs_compared: usize,
    pub has_conflicts: bool,
    pub high_severity_count: usize,
    pub conflicts: Vec<Conflict>,
    pub recommendations: Vec<String>,
}

struct Experiment<'a> {
    id: &'a str,
    traffic: f64,
    pages: BTreeSet<String>,
    metrics: BTreeSet<String>,
    audience: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl Experiment<'_> {
    fn runs_alongside(&self, other: &Experiment<'_>) -> bool {
        let starts_before_other_ends = match (self.start, other.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        };
        let other_starts_before_end = match (other.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        };
        starts_before_other_ends && other_starts_before_end
    }

    fn shares_audience(&self, other: &Experiment<'_>) -> bool {
        match (&self.audience, &other.audience) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

/// Compare every pair of experiments and report overlaps.
pub fn detect_conflicts(descriptors: &[ExperimentDescriptor]) -> AnalysisResult<ConflictReport> {
    let experiments = validate(descriptors)?;

    let mut conflicts = Vec::new();
    let mut pairs_compared = 0;

    for (i, a) in experiments.iter().enumerate() {
        for b in &experiments[i + 1..] {
            if !a.runs_alongside(b) {
                continue;
            }
            pairs_compared += 1;
            conflicts.extend(compare(a, b));
        }
    }

    let high_severity_count = conflicts
        .iter()
        .filter(|c| c.severity == ConflictSeverity::High)
        .count();
    let recommendations = recommendations(&conflicts);

    Ok(ConflictReport {
        total_experiments: experiments.len(),
        pairs_compared,
        has_conflicts: !conflicts.is_empty(),
        high_severity_count,
        conflicts,
        recommendations,
    })
}

fn compare(a: &Experiment<'_>, b: &Experiment<'_>) -> Vec<Conflict> {
    let mut out = Vec::new();

    let shared_pages: Vec<String> = a.pages.intersection(&b.pages).cloned().collect();
    if !shared_pages.is_empty() {
        out.push(Conflict {
            experiment_a: a.id.to_string(),
            experiment_b: b.id.to_string(),
            kind: ConflictKind::PageOverlap,
            severity: ConflictSeverity::Medium,
            message: format!(
                "'{}' and '{}' both run on {}",
                a.id,
                b.id,
                shared_pages.join(", ")
            ),
            shared: shared_pages.clone(),
        });

        let combined = a.traffic + b.traffic;
        if combined > 100.0 && a.shares_audience(b) {
            out.push(Conflict {
                experiment_a: a.id.to_string(),
                experiment_b: b.id.to_string(),
                kind: ConflictKind::TrafficOverlap,
                severity: ConflictSeverity::High,
                message: format!(
                    "Combined traffic allocation of {:.1}% exceeds 100% on shared pages, so some users are enrolled in both",
                    combined
                ),
                shared: shared_pages,
            });
        }
    }

    let shared_metrics: Vec<String> = a.metrics.intersection(&b.metrics).cloned().collect();
    if !shared_metrics.is_empty() {
        out.push(Conflict {
            experiment_a: a.id.to_string(),
            experiment_b: b.id.to_string(),
            kind: ConflictKind::MetricOverlap,
            severity: ConflictSeverity::Low,
            message: format!(
                "'{}' and '{}' are both measured on {}",
                a.id,
                b.id,
                shared_metrics.join(", ")
            ),
            shared: shared_metrics,
        });
    }

    out
}

fn recommendations(conflicts: &[Conflict]) -> Vec<String> {
    if conflicts.is_empty() {
        return vec!["No conflicts detected; the experiments can run concurrently.".to_string()];
    }

    let mut out = Vec::new();
    for conflict in conflicts.iter().filter(|c| c.kind == ConflictKind::TrafficOverlap) {
        out.push(format!(
            "Make '{}' and '{}' mutually exclusive or reduce their allocations to a combined 100% or less.",
            conflict.experiment_a, conflict.experiment_b
        ));
    }
    if conflicts.iter().any(|c| c.kind == ConflictKind::PageOverlap) {
        out.push(
            "Experiments sharing pages can interact; use mutually exclusive layers or stagger their schedules."
                .to_string(),
        );
    }
    if conflicts.iter().any(|c| c.kind == ConflictKind::MetricOverlap) {
        out.push(
            "Shared metrics may be influenced by more than one experiment; check for interaction effects during analysis."
                .to_string(),
        );
    }
    out
}

fn validate(descriptors: &[ExperimentDescriptor]) -> AnalysisResult<Vec<Experiment<'_>>> {
    let mut seen = HashSet::new();
    let mut experiments = Vec::with_capacity(descriptors.len());

    for (i, d) in descriptors.iter().enumerate() {
        let id = d.id.trim();
        if id.is_empty() {
            return Err(AnalysisError::validation(
                format!("experiments[{}].id", i),
                "must not be empty",
            ));
        }
        if !seen.insert(id) {
            return Err(AnalysisError::validation(
                format!("experiments[{}].id", i),
                format!("duplicate experiment id '{}'", id),
            ));
        }
        if !(0.0..=100.0).contains(&d.traffic_allocation) {
            return Err(AnalysisError::validation(
                format!("experiments[{}].trafficAllocation", i),
                format!("must be between 0 and 100, got {}", d.traffic_allocation),
            ));
        }

        let start = parse_date(d.start_date.as_deref(), i, "startDate")?;
        let end = parse_date(d.end_date.as_deref(), i, "endDate")?;
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(AnalysisError::validation(
                    format!("experiments[{}].endDate", i),
                    format!("{} is before startDate {}", end, start),
                ));
            }
        }

        experiments.push(Experiment {
            id,
            traffic: d.traffic_allocation,
            pages: normalize(&d.pages),
            metrics: normalize(&d.metrics),
            audience: d
                .audience
                .as_deref()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty()),
            start,
            end,
        });
    }

    Ok(experiments)
}

fn parse_date(value: Option<&str>, index: usize, field: &str) -> AnalysisResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|e| {
                AnalysisError::validation(
                    format!("experiments[{}].{}", index, field),
                    format!("'{}' is not a YYYY-MM-DD date: {}", raw, e),
                )
            }),
    }
}

fn normalize(items: &[String]) -> BTreeSet<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
