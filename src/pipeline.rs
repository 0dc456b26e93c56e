//! The full ingest → select → repair → weight pass.
//!
//! Pure: nothing is retained between calls, so running it twice on the same
//! text and configuration gives identical output.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{info, instrument};

use crate::error::{FlowError, Result};
use crate::process::{parse_table, CoordinateRepair, RawRow};
use crate::schema::{columns, FilterConfig, FlowRecord};
use crate::select::{cell_to_year, select_flows};
use crate::weight::VisualWeightMapper;

/// Size of the rendered subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TopN(usize);

impl TopN {
    pub const ALLOWED: &'static [usize] = &[50, 100, 200];

    pub fn new(n: usize) -> Result<Self> {
        if Self::ALLOWED.contains(&n) {
            Ok(Self(n))
        } else {
            Err(FlowError::InvalidTopN {
                got: n,
                allowed: Self::ALLOWED,
            })
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self(100)
    }
}

impl TryFrom<usize> for TopN {
    type Error = FlowError;

    fn try_from(n: usize) -> Result<Self> {
        Self::new(n)
    }
}

impl From<TopN> for usize {
    fn from(n: TopN) -> usize {
        n.0
    }
}

impl FromStr for TopN {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        let n = s.trim().parse::<usize>().map_err(|_| FlowError::UnparsableTopN {
            got: s.to_string(),
            allowed: Self::ALLOWED,
        })?;
        Self::new(n)
    }
}

impl fmt::Display for TopN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub parsed_rows: usize,
    /// Rows that yielded a record (had a usable year).
    pub eligible: usize,
    pub matched: usize,
    /// Matched records with valid coordinates.
    pub drawable: usize,
    /// Records carrying a display weight.
    pub rendered: usize,
    pub total_display_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub records: Vec<FlowRecord>,
    pub summary: PipelineSummary,
}

impl PipelineOutput {
    /// The weighted records, in rank order.
    pub fn rendered(&self) -> impl Iterator<Item = &FlowRecord> {
        self.records.iter().filter(|r| r.display_weight.is_some())
    }
}

/// Weight the drawable records among the first `top_n` of `ranked`. Records
/// outside that slice, or without coordinates, pass through unweighted.
pub fn render_top_n(
    ranked: Vec<FlowRecord>,
    top_n: TopN,
    mapper: &VisualWeightMapper,
) -> Vec<FlowRecord> {
    let values: Vec<f64> = ranked
        .iter()
        .take(top_n.get())
        .filter(|r| r.is_drawable())
        .map(|r| r.display_value)
        .collect();
    let mut weights = mapper.weights(&values).into_iter();

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            if i < top_n.get() && r.is_drawable() {
                match weights.next() {
                    Some(w) => r.with_weight(w),
                    None => r,
                }
            } else {
                r
            }
        })
        .collect()
}

/// Run selection and weighting over already-parsed rows.
pub fn run_rows(
    rows: &[RawRow],
    filter: &FilterConfig,
    top_n: TopN,
    repair: &dyn CoordinateRepair,
    mapper: &VisualWeightMapper,
) -> PipelineOutput {
    let ranked = select_flows(rows, filter, repair);
    let records = render_top_n(ranked, top_n, mapper);

    let summary = PipelineSummary {
        parsed_rows: rows.len(),
        eligible: rows
            .iter()
            .filter(|r| cell_to_year(r.get(columns::YEAR)).is_some())
            .count(),
        matched: records.len(),
        drawable: records.iter().filter(|r| r.is_drawable()).count(),
        rendered: records.iter().filter(|r| r.display_weight.is_some()).count(),
        total_display_value: records.iter().map(|r| r.display_value).sum(),
    };

    PipelineOutput { records, summary }
}

/// Parse `text` and run the whole pipeline.
#[instrument(level = "info", skip(text, top_n, repair, mapper), fields(bytes = text.len(), top_n = %top_n))]
pub fn run(
    text: &str,
    filter: &FilterConfig,
    top_n: TopN,
    repair: &dyn CoordinateRepair,
    mapper: &VisualWeightMapper,
) -> PipelineOutput {
    let table = parse_table(text);
    let out = run_rows(&table.rows, filter, top_n, repair, mapper);
    info!(
        parsed = out.summary.parsed_rows,
        matched = out.summary.matched,
        drawable = out.summary.drawable,
        rendered = out.summary.rendered,
        "pipeline complete"
    );
    out
}
