use serde_derive::{Serialize, Deserialize};

use crate::covid::UpdateRecord;
use crate::metrics::{extract_metric, matches_region, MetricKind};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub new_cases: u64,
    pub recoveries: u64,
    pub deaths: u64,
}

impl Totals {
    pub fn get(&self, metric: MetricKind) -> u64 {
        match metric {
            MetricKind::NewCases => self.new_cases,
            MetricKind::Recoveries => self.recoveries,
            MetricKind::Deaths => self.deaths,
        }
    }

    pub fn as_array(&self) -> [u64; 3] {
        MetricKind::ALL.map(|metric| self.get(metric))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegionReport {
    pub region: String,
    pub new_cases: u64,
    pub recoveries: u64,
    pub deaths: u64,
}

pub fn total_for<'a, I>(updates: I, metric: MetricKind) -> u64
where
    I: IntoIterator<Item = &'a UpdateRecord>,
{
    updates
        .into_iter()
        .map(|u| extract_metric(&u.update, metric))
        .fold(0u64, u64::saturating_add)
}

pub fn totals(updates: &[UpdateRecord]) -> Totals {
    Totals {
        new_cases: total_for(updates, MetricKind::NewCases),
        recoveries: total_for(updates, MetricKind::Recoveries),
        deaths: total_for(updates, MetricKind::Deaths),
    }
}

/// One report per entry of `regions`, in the same order, including regions
/// that no update mentions.
pub fn region_report<S: AsRef<str>>(updates: &[UpdateRecord], regions: &[S]) -> Vec<RegionReport> {
    regions
        .iter()
        .map(|region| {
            let region = region.as_ref();
            let mentioned: Vec<&UpdateRecord> = updates
                .iter()
                .filter(|u| matches_region(&u.update, region))
                .collect();

            RegionReport {
                region: region.to_string(),
                new_cases: total_for(mentioned.iter().copied(), MetricKind::NewCases),
                recoveries: total_for(mentioned.iter().copied(), MetricKind::Recoveries),
                deaths: total_for(mentioned.iter().copied(), MetricKind::Deaths),
            }
        })
        .collect()
}
