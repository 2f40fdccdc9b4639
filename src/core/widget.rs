use crate::core::page::Page;
use crate::utils::error::{DashboardError, Result};
use serde::de::DeserializeOwned;

/// A page region fed by exactly one artifact.
pub trait Widget {
    type Data: DeserializeOwned;

    fn name(&self) -> &'static str;

    fn render(&mut self, page: &mut Page, data: Self::Data) -> Result<()>;

    fn render_failure(&mut self, page: &mut Page, error: &DashboardError) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetStatus {
    Rendered,
    /// The widget's own artifact could not be fetched or parsed.
    Failed(String),
    /// Data was fine but the page had nowhere to put it.
    Detached(String),
}

impl WidgetStatus {
    pub fn is_rendered(&self) -> bool {
        matches!(self, WidgetStatus::Rendered)
    }
}

pub fn parse_artifact<T: DeserializeOwned>(artifact: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| DashboardError::MalformedArtifact {
        artifact: artifact.to_string(),
        message: e.to_string(),
    })
}

/// Parses a fetched artifact and hands it to the widget. Every failure is
/// logged and contained here; nothing propagates to the other widgets.
pub fn apply<W: Widget>(
    widget: &mut W,
    page: &mut Page,
    artifact: &str,
    fetched: Result<Vec<u8>>,
) -> WidgetStatus {
    let data = fetched.and_then(|bytes| parse_artifact::<W::Data>(artifact, &bytes));

    match data {
        Ok(data) => match widget.render(page, data) {
            Ok(()) => {
                tracing::debug!("{} rendered from {}", widget.name(), artifact);
                WidgetStatus::Rendered
            }
            Err(e) => {
                tracing::warn!("{} could not render: {}", widget.name(), e);
                WidgetStatus::Detached(e.to_string())
            }
        },
        Err(e) => {
            tracing::error!("Error loading {} for {}: {}", artifact, widget.name(), e);
            if let Err(render_error) = widget.render_failure(page, &e) {
                tracing::warn!(
                    "{} could not show its error state: {}",
                    widget.name(),
                    render_error
                );
            }
            WidgetStatus::Failed(e.to_string())
        }
    }
}
