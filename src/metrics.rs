use std::num::IntErrorKind;

use serde_derive::{Serialize, Deserialize};
use tracing::debug;

use crate::constants::{METRIC_LABELS, METRIC_PATTERNS};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    NewCases,
    Recoveries,
    Deaths,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::NewCases, MetricKind::Recoveries, MetricKind::Deaths];

    pub fn label(&self) -> &'static str {
        METRIC_LABELS.get(self).copied().unwrap_or_default()
    }
}

/// Count attached to `metric` in `text`, e.g. `120` for "120 new cases today".
///
/// Only the first `<digits> <label>` occurrence is read. No match counts as 0;
/// a digit run too large for `u64` clamps to `u64::MAX`.
pub fn extract_metric(text: &str, metric: MetricKind) -> u64 {
    let Some(pattern) = METRIC_PATTERNS.get(&metric) else {
        return 0;
    };
    let Some(digits) = pattern.captures(text).and_then(|caps| caps.get(1)) else {
        return 0;
    };

    match digits.as_str().parse::<u64>() {
        Ok(count) => count,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            debug!(metric = metric.label(), digits = digits.as_str(), "count overflows u64, clamping");
            u64::MAX
        }
        Err(e) => {
            debug!(metric = metric.label(), digits = digits.as_str(), "discarding unparsable count: {e}");
            0
        }
    }
}

/// Literal, case-sensitive substring test. "Pradesh" matches every "... Pradesh".
pub fn matches_region(text: &str, region: &str) -> bool {
    text.contains(region)
}
