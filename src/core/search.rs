//! Similarity search panel.
//!
//! The panel owns the loaded [`SimilarityIndex`]. It moves through
//! `Uninitialized -> Loading -> {Ready, LoadFailed}` exactly once; after that
//! [`SearchPanel::search`] is a pure function of the index and the term.
//!
//! Peers with equal scores keep the order the producer wrote them in (the
//! sort is stable). The producer already emits each list sorted, so this only
//! matters for hand-written indexes.

use crate::core::layout::{LEARNERS_LIST, SEARCH_INPUT};
use crate::core::page::{Element, Page};
use crate::core::widget::Widget;
use crate::domain::model::{ScoredPeer, SimilarMatch, SimilarityIndex};
use crate::utils::error::{DashboardError, Result};

pub const MAX_RESULTS: usize = 5;

pub const ENTER_TERM_TEXT: &str = "Enter email and press Enter to search";
pub const NO_RESULTS_TEXT: &str = "No similar users found";
pub const LOAD_ERROR_TEXT: &str = "Error loading similarity data";
pub const SEARCH_PLACEHOLDER: &str = "Search your email...";

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Uninitialized,
    Loading,
    Ready(SimilarityIndex),
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    EnterTerm,
    NoResults,
    Matches(Vec<SimilarMatch>),
    /// The index never loaded; the panel keeps its error message.
    Disabled,
}

#[derive(Debug)]
pub struct SearchPanel {
    state: PanelState,
}

impl Default for SearchPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPanel {
    pub fn new() -> Self {
        Self {
            state: PanelState::Uninitialized,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn begin_loading(&mut self) {
        if self.state == PanelState::Uninitialized {
            self.state = PanelState::Loading;
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, PanelState::Ready(_))
    }

    pub fn index(&self) -> Option<&SimilarityIndex> {
        match &self.state {
            PanelState::Ready(index) => Some(index),
            _ => None,
        }
    }

    /// Stores the index. Returns false if the panel already settled.
    pub fn load(&mut self, index: SimilarityIndex) -> bool {
        match self.state {
            PanelState::Uninitialized | PanelState::Loading => {
                tracing::info!("Similarity index ready with {} identifiers", index.len());
                self.state = PanelState::Ready(index);
                true
            }
            _ => false,
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        match self.state {
            PanelState::Uninitialized | PanelState::Loading => {
                self.state = PanelState::LoadFailed(reason.into());
                true
            }
            _ => false,
        }
    }

    /// Up to five peers of `term`, best first, as whole percentages.
    pub fn search(&self, term: Option<&str>) -> Vec<SimilarMatch> {
        let Some(index) = self.index() else {
            return Vec::new();
        };
        let Some(term) = term.filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        let Some(peers) = index.get(term) else {
            return Vec::new();
        };

        let mut ranked: Vec<&ScoredPeer> = peers.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
            .into_iter()
            .take(MAX_RESULTS)
            .map(|peer| SimilarMatch::from_score(&peer.identifier, peer.score))
            .collect()
    }

    pub fn outcome(&self, term: Option<&str>) -> SearchOutcome {
        if matches!(self.state, PanelState::LoadFailed(_)) {
            return SearchOutcome::Disabled;
        }
        match term {
            None | Some("") => SearchOutcome::EnterTerm,
            Some(_) => {
                let matches = self.search(term);
                if matches.is_empty() {
                    SearchOutcome::NoResults
                } else {
                    SearchOutcome::Matches(matches)
                }
            }
        }
    }

    /// Enter was pressed with `raw_input` in the search box.
    pub fn submit(&mut self, page: &mut Page, raw_input: &str) -> SearchOutcome {
        let term = raw_input.trim();
        let outcome = self.outcome(Some(term));
        if outcome == SearchOutcome::Disabled {
            tracing::debug!("Search for '{}' ignored, similarity data failed to load", term);
            return outcome;
        }

        tracing::debug!("Searching similar learners for '{}'", term);
        if let Err(e) = render_outcome(page, &outcome) {
            tracing::warn!("Search results not shown: {}", e);
        }
        outcome
    }
}

fn placeholder(text: &str) -> Element {
    Element::new("div")
        .with_class("text-gray-400 p-4")
        .with_text(text)
}

fn match_card(result: &SimilarMatch) -> Element {
    Element::new("div")
        .with_class("learner-card flex justify-between items-center")
        .with_child(
            Element::new("div")
                .with_class("flex items-center gap-4")
                .with_child(Element::new("div").with_class("text-2xl").with_text("👤"))
                .with_child(
                    Element::new("h3")
                        .with_class("font-medium text-white")
                        .with_text(result.identifier.as_str()),
                ),
        )
        .with_child(
            Element::new("span")
                .with_class("badge match-badge")
                .with_text(format!("{}% match", result.percent)),
        )
}

fn render_outcome(page: &mut Page, outcome: &SearchOutcome) -> Result<()> {
    let list = page
        .query_mut(LEARNERS_LIST)
        .ok_or_else(|| DashboardError::MissingTarget {
            selector: LEARNERS_LIST.to_string(),
        })?;
    list.clear_children();
    match outcome {
        SearchOutcome::EnterTerm => list.append_child(placeholder(ENTER_TERM_TEXT)),
        SearchOutcome::NoResults => list.append_child(placeholder(NO_RESULTS_TEXT)),
        SearchOutcome::Matches(matches) => {
            for result in matches {
                list.append_child(match_card(result));
            }
        }
        SearchOutcome::Disabled => list.append_child(placeholder(LOAD_ERROR_TEXT)),
    }
    Ok(())
}

impl Widget for SearchPanel {
    type Data = SimilarityIndex;

    fn name(&self) -> &'static str {
        "similarity search"
    }

    fn render(&mut self, page: &mut Page, data: Self::Data) -> Result<()> {
        if !self.load(data) {
            tracing::warn!("Similarity index delivered twice, keeping the first one");
            return Ok(());
        }

        match page.query_mut(SEARCH_INPUT) {
            Some(input) => input.set_attr("placeholder", SEARCH_PLACEHOLDER),
            None => tracing::warn!("Page target not found: {}", SEARCH_INPUT),
        }
        render_outcome(page, &SearchOutcome::EnterTerm)
    }

    fn render_failure(&mut self, page: &mut Page, error: &DashboardError) -> Result<()> {
        self.fail(error.to_string());
        render_outcome(page, &SearchOutcome::Disabled)
    }
}
