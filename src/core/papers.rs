use crate::core::layout::{PAPERS_COUNT, PAPERS_LIST};
use crate::core::page::{Element, Page};
use crate::core::widget::Widget;
use crate::domain::model::PaperEntry;
use crate::utils::error::{DashboardError, Result};

pub const PAPERS_ERROR_TEXT: &str = "Error loading papers";

/// Display form of one paper: `arxiv.org/abs/1234` becomes domain
/// `arxiv.org` and sub-path `/abs/1234`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperCard {
    pub domain: String,
    pub sub_path: String,
    pub visits: u64,
    pub href: String,
}

impl PaperCard {
    pub fn from_entry(entry: &PaperEntry) -> Self {
        let (domain, rest) = entry.path.split_once('/').unwrap_or((entry.path.as_str(), ""));
        Self {
            domain: domain.to_string(),
            sub_path: format!("/{}", rest),
            visits: entry.count,
            href: format!("https://{}", entry.path),
        }
    }

    fn to_element(&self) -> Element {
        Element::new("li").with_child(
            Element::new("a")
                .with_class("paper-card flex justify-between items-center")
                .with_attr("href", &self.href)
                .with_attr("target", "_blank")
                .with_attr("rel", "noopener noreferrer")
                .with_child(
                    Element::new("div")
                        .with_child(
                            Element::new("strong")
                                .with_class("font-medium text-white")
                                .with_text(self.domain.as_str()),
                        )
                        .with_child(
                            Element::new("span")
                                .with_class("text-gray-400 text-sm")
                                .with_text(self.sub_path.as_str()),
                        ),
                )
                .with_child(
                    Element::new("span")
                        .with_class("badge visits-badge")
                        .with_text(format!("{} visits", self.visits)),
                ),
        )
    }
}

/// Drops profile pages and empty paths, keeping input order.
pub fn visible_papers(entries: &[PaperEntry]) -> Vec<PaperCard> {
    entries
        .iter()
        .filter(|entry| !entry.path.contains("profile"))
        .filter(|entry| !entry.path.is_empty())
        .map(PaperCard::from_entry)
        .collect()
}

#[derive(Debug, Default)]
pub struct TopPapers;

impl Widget for TopPapers {
    type Data = Vec<PaperEntry>;

    fn name(&self) -> &'static str {
        "top papers"
    }

    fn render(&mut self, page: &mut Page, data: Self::Data) -> Result<()> {
        let cards = visible_papers(&data);
        tracing::info!(
            "Showing {} of {} papers ({} filtered)",
            cards.len(),
            data.len(),
            data.len() - cards.len()
        );

        match page.query_mut(PAPERS_COUNT) {
            Some(badge) => badge.set_text(format!("{} Papers", cards.len())),
            None => tracing::warn!("Page target not found: {}", PAPERS_COUNT),
        }

        let list = page
            .query_mut(PAPERS_LIST)
            .ok_or_else(|| DashboardError::MissingTarget {
                selector: PAPERS_LIST.to_string(),
            })?;
        list.clear_children();
        for card in &cards {
            list.append_child(card.to_element());
        }
        Ok(())
    }

    /// Unlike the other widgets this swaps out the whole list node.
    fn render_failure(&mut self, page: &mut Page, _error: &DashboardError) -> Result<()> {
        let error_card = Element::new("div")
            .with_class("card error-card text-red-400 p-4")
            .with_text(PAPERS_ERROR_TEXT);
        if page.replace(PAPERS_LIST, error_card) {
            Ok(())
        } else {
            Err(DashboardError::MissingTarget {
                selector: PAPERS_LIST.to_string(),
            })
        }
    }
}
