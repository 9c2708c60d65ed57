//! Shapes aggregates into Chart.js-style datasets and the state-wise HTML table.

use serde_derive::{Deserialize, Serialize};
use tracing::warn;

use crate::covid::UpdateRecord;
use crate::metrics::MetricKind;
use crate::report::{region_report, totals, RegionReport, Totals};

pub const OVERALL_LABELS: [&str; 3] = ["Total New Cases", "Total Recoveries", "Total Deaths"];
const OVERALL_BAR_COLORS: [&str; 3] = ["#071952", "#0B666A", "#35A29F"];
const OVERALL_PIE_COLORS: [&str; 3] = ["#1D5D9B", "#68B984", "#DC3535"];

fn region_color(metric: MetricKind) -> &'static str {
    match metric {
        MetricKind::NewCases => "#865439",
        MetricKind::Recoveries => "#F49D1A",
        MetricKind::Deaths => "#820000",
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<u64>,
    pub background_color: Vec<String>,
    pub border_width: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub totals: Totals,
    pub overall_bar: ChartData,
    pub overall_pie: ChartData,
    pub region_bar: ChartData,
    pub region_table: Vec<RegionReport>,
}

fn overall_chart(totals: &Totals, colors: [&str; 3]) -> ChartData {
    ChartData {
        labels: OVERALL_LABELS.iter().map(|l| l.to_string()).collect(),
        datasets: vec![Dataset {
            label: Some("Total Data".to_string()),
            data: totals.as_array().to_vec(),
            background_color: colors.iter().map(|c| c.to_string()).collect(),
            border_width: 1,
        }],
    }
}

pub fn overall_bar(totals: &Totals) -> ChartData {
    overall_chart(totals, OVERALL_BAR_COLORS)
}

pub fn overall_pie(totals: &Totals) -> ChartData {
    overall_chart(totals, OVERALL_PIE_COLORS)
}

/// One dataset per metric, each holding one value per region.
pub fn region_bar(reports: &[RegionReport]) -> ChartData {
    let datasets = MetricKind::ALL
        .iter()
        .map(|&metric| Dataset {
            label: None,
            data: reports
                .iter()
                .map(|r| match metric {
                    MetricKind::NewCases => r.new_cases,
                    MetricKind::Recoveries => r.recoveries,
                    MetricKind::Deaths => r.deaths,
                })
                .collect(),
            background_color: vec![region_color(metric).to_string(); 3],
            border_width: 1,
        })
        .collect();

    ChartData {
        labels: reports.iter().map(|r| r.region.clone()).collect(),
        datasets,
    }
}

/// Recomputes everything from `updates`; nothing is cached between calls.
pub fn dashboard<S: AsRef<str>>(updates: &[UpdateRecord], regions: &[S]) -> Dashboard {
    let totals = totals(updates);
    let reports = region_report(updates, regions);

    Dashboard {
        totals,
        overall_bar: overall_bar(&totals),
        overall_pie: overall_pie(&totals),
        region_bar: region_bar(&reports),
        region_table: reports,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_table(reports: &[RegionReport]) -> String {
    let mut html = String::from(
        "<table>\n<thead>\n<tr><th>State</th><th>New Cases</th><th>Recoveries</th><th>Deaths</th></tr>\n</thead>\n<tbody>\n",
    );
    for report in reports {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&report.region),
            report.new_cases,
            report.recoveries,
            report.deaths
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn render_page(dashboard: &Dashboard) -> String {
    // `</` would close the script block early
    let chart_json = serde_json::to_string(dashboard)
        .unwrap_or_else(|e| {
            warn!("unable to serialize chart data, embedding an empty object: {e}");
            "{}".to_string()
        })
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Covid dashboard</title></head>
<body>
<div class="mainChart">
<div class="barChart"><h1 class="heading">Bar Chart: Total new cases, recoveries &amp; deaths (Overall)</h1></div>
<div class="piechart"><h1 class="heading">Pie Chart: Total new cases, recoveries &amp; deaths (Overall)</h1></div>
</div>
<div>
<div class="barChartState"><h1 class="heading">Bar Chart: Total new cases, recoveries &amp; deaths (Case Wise State Data)</h1></div>
<div class="stateTable">
<h1 class="heading">Total new cases, recoveries &amp; deaths (State-wise report in tabular form)</h1>
{table}</div>
</div>
<script type="application/json" id="charts">{chart_json}</script>
</body>
</html>
"#,
        table = render_table(&dashboard.region_table),
        chart_json = chart_json,
    )
}
