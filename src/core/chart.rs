use crate::core::layout::CHART_CANVAS;
use crate::core::page::Page;
use crate::core::widget::Widget;
use crate::domain::model::DomainCount;
use crate::utils::error::{DashboardError, Result};
use serde::Serialize;

pub const CHART_ERROR_TEXT: &str = "Error loading chart data";

const BAR_COLOR: &str = "#3b82f6";
const TEXT_COLOR: &str = "#e5e7eb";
const GRID_COLOR: &str = "#374151";
const TICK_COLOR: &str = "#9ca3af";

#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: &'static str,
    pub data: Vec<u64>,
    pub background_color: &'static str,
    pub border_radius: u32,
}

pub fn strip_www(domain: &str) -> &str {
    domain.strip_prefix("www.").unwrap_or(domain)
}

pub fn chart_config(domains: &[DomainCount]) -> ChartConfig {
    let axis = |title: Option<&str>| {
        let mut scale = serde_json::json!({
            "grid": { "color": GRID_COLOR },
            "ticks": { "color": TICK_COLOR }
        });
        if let Some(text) = title {
            scale["title"] = serde_json::json!({
                "display": true,
                "text": text,
                "color": TICK_COLOR
            });
        }
        scale
    };

    ChartConfig {
        kind: "bar",
        data: ChartData {
            labels: domains
                .iter()
                .map(|d| strip_www(&d.domain).to_string())
                .collect(),
            datasets: vec![ChartDataset {
                label: "Visits",
                data: domains.iter().map(|d| d.count).collect(),
                background_color: BAR_COLOR,
                border_radius: 6,
            }],
        },
        options: serde_json::json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": { "labels": { "color": TEXT_COLOR } },
                "title": {
                    "display": true,
                    "text": "Most Visited Domains",
                    "color": TEXT_COLOR,
                    "font": { "size": 16 }
                }
            },
            "scales": {
                "y": axis(Some("Number of Visits")),
                "x": axis(None)
            }
        }),
    }
}

#[derive(Debug, Default)]
pub struct DomainChart;

impl Widget for DomainChart {
    type Data = Vec<DomainCount>;

    fn name(&self) -> &'static str {
        "domain chart"
    }

    fn render(&mut self, page: &mut Page, data: Self::Data) -> Result<()> {
        let config = serde_json::to_string(&chart_config(&data))?;
        let canvas = page
            .query_mut(CHART_CANVAS)
            .ok_or_else(|| DashboardError::MissingTarget {
                selector: CHART_CANVAS.to_string(),
            })?;
        canvas.set_attr("data-chart", &config);
        tracing::info!("Chart built with {} domains", data.len());
        Ok(())
    }

    fn render_failure(&mut self, page: &mut Page, _error: &DashboardError) -> Result<()> {
        let canvas = page
            .query_mut(CHART_CANVAS)
            .ok_or_else(|| DashboardError::MissingTarget {
                selector: CHART_CANVAS.to_string(),
            })?;
        canvas.set_text(CHART_ERROR_TEXT);
        Ok(())
    }
}
