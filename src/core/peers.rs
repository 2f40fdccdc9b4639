use crate::core::layout::ACTIVE_BADGE;
use crate::core::page::Page;
use crate::core::widget::Widget;
use crate::domain::model::PeerList;
use crate::utils::error::{DashboardError, Result};

pub fn active_learners_label(count: usize) -> String {
    format!("{} Active Learners", count)
}

#[derive(Debug, Default)]
pub struct ActiveLearners;

impl Widget for ActiveLearners {
    type Data = PeerList;

    fn name(&self) -> &'static str {
        "active learners"
    }

    fn render(&mut self, page: &mut Page, data: Self::Data) -> Result<()> {
        let badge = page
            .query_mut(ACTIVE_BADGE)
            .ok_or_else(|| DashboardError::MissingTarget {
                selector: ACTIVE_BADGE.to_string(),
            })?;
        badge.set_text(active_learners_label(data.len()));
        Ok(())
    }

    // Log-only: the badge keeps whatever the markup shipped with.
    fn render_failure(&mut self, _page: &mut Page, _error: &DashboardError) -> Result<()> {
        Ok(())
    }
}
