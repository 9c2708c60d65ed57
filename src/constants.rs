use std::collections::HashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::metrics::MetricKind;

pub const DEFAULT_FEED_URL: &str = "https://mocki.io/v1/b2ac46d3-385d-448a-a77a-9bc2c5b5dcbc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";

pub type RegionName = &'static str;

pub const REGIONS: [RegionName; 13] = [
    "Gujarat",
    "West Bengal",
    "Telangana",
    "Uttar Pradesh",
    "Madhya Pradesh",
    "Delhi",
    "Rajasthan",
    "Maharashtra",
    "Bihar",
    "Odisha",
    "Andhra Pradesh",
    "Karnataka",
    "Haryana",
];

pub(crate) static METRIC_LABELS: Lazy<HashMap<MetricKind, &str>> = Lazy::new(||
    HashMap::from([
        (MetricKind::NewCases, "new cases"),
        (MetricKind::Recoveries, "recoveries"),
        (MetricKind::Deaths, "deaths"),
    ])
);

// digits, one space, then the label; the digit run is group 1
pub(crate) static METRIC_PATTERNS: Lazy<HashMap<MetricKind, Regex>> = Lazy::new(||
    METRIC_LABELS
        .iter()
        .map(|(metric, label)| {
            let pattern = format!("([0-9]+) {}", regex::escape(label));
            (*metric, Regex::new(&pattern).expect("metric pattern is a valid regex"))
        })
        .collect()
);
