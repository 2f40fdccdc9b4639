use crate::core::chart::DomainChart;
use crate::core::input::SubmitSource;
use crate::core::layout::{self, LEARNERS_LIST};
use crate::core::page::Page;
use crate::core::papers::TopPapers;
use crate::core::peers::ActiveLearners;
use crate::core::search::{SearchOutcome, SearchPanel};
use crate::core::widget::{apply, WidgetStatus};
use crate::domain::ports::{ArtifactPaths, ArtifactSource, ConfigProvider};
use crate::utils::error::{DashboardError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::task::{self, JoinError, JoinSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    MostViewedDomains,
    Peers,
    Similarity,
    TopPapers,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [
        Artifact::MostViewedDomains,
        Artifact::Peers,
        Artifact::Similarity,
        Artifact::TopPapers,
    ];

    pub fn path_in(self, paths: &ArtifactPaths) -> &str {
        match self {
            Artifact::MostViewedDomains => &paths.most_viewed_domains,
            Artifact::Peers => &paths.peers,
            Artifact::Similarity => &paths.similarity,
            Artifact::TopPapers => &paths.top_papers,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::MostViewedDomains => "most-viewed-domains",
            Artifact::Peers => "peers",
            Artifact::Similarity => "similarity",
            Artifact::TopPapers => "top-papers",
        };
        f.write_str(name)
    }
}

/// Outcome of each widget, in the order the fetches completed.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    entries: Vec<(Artifact, WidgetStatus)>,
}

impl LoadReport {
    fn record(&mut self, artifact: Artifact, status: WidgetStatus) {
        self.entries.push((artifact, status));
    }

    pub fn status(&self, artifact: Artifact) -> Option<&WidgetStatus> {
        self.entries
            .iter()
            .find(|(a, _)| *a == artifact)
            .map(|(_, status)| status)
    }

    pub fn completion_order(&self) -> Vec<Artifact> {
        self.entries.iter().map(|(a, _)| *a).collect()
    }

    pub fn rendered(&self) -> usize {
        self.entries.iter().filter(|(_, s)| s.is_rendered()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (Artifact, &WidgetStatus)> {
        self.entries
            .iter()
            .filter(|(_, s)| !s.is_rendered())
            .map(|(a, s)| (*a, s))
    }
}

pub struct DashboardEngine<S: ArtifactSource> {
    source: Arc<S>,
    artifacts: ArtifactPaths,
    title: String,
}

impl<S: ArtifactSource + 'static> DashboardEngine<S> {
    pub fn new(source: S, artifacts: ArtifactPaths, title: impl Into<String>) -> Self {
        Self {
            source: Arc::new(source),
            artifacts,
            title: title.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(source: S, config: &C) -> Self {
        Self::new(source, config.artifacts().clone(), config.title())
    }

    /// Spawns the four artifact fetches and hands back the dashboard right
    /// away, with every widget still showing its loading state. The fetches
    /// stay pending inside the dashboard until it settles them.
    pub fn start(&self) -> Dashboard {
        tracing::info!("Loading dashboard artifacts from {}", self.source.describe());

        let mut panel = SearchPanel::new();
        panel.begin_loading();

        let mut fetches = JoinSet::new();
        let mut in_flight = HashMap::new();
        for artifact in Artifact::ALL {
            let source = Arc::clone(&self.source);
            let path = artifact.path_in(&self.artifacts).to_string();
            let task_path = path.clone();
            let handle = fetches.spawn(async move {
                tracing::debug!("Fetching {} from {}", artifact, task_path);
                source.fetch(&task_path).await
            });
            in_flight.insert(handle.id(), (artifact, path));
        }

        Dashboard {
            page: layout::dashboard_page(&self.title),
            panel,
            report: LoadReport::default(),
            fetches,
            in_flight,
        }
    }

    /// Like [`start`](Self::start), but waits until every fetch has settled.
    pub async fn run(&self) -> Dashboard {
        let mut dashboard = self.start();
        dashboard.settle_all().await;
        dashboard
    }
}

/// Something that changed the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// A fetch settled and its widget was updated.
    Settled(Artifact, WidgetStatus),
    /// A submission was searched; carries what the panel now shows.
    Searched(SearchOutcome, Vec<String>),
}

/// A dashboard page plus the search panel state that lives as long as the
/// page does. Fetches that have not settled yet are owned here, and this is
/// the only place that applies them, so the page and the similarity index
/// have a single writer.
#[derive(Debug)]
pub struct Dashboard {
    page: Page,
    panel: SearchPanel,
    report: LoadReport,
    fetches: JoinSet<Result<Vec<u8>>>,
    in_flight: HashMap<task::Id, (Artifact, String)>,
}

impl Dashboard {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn panel(&self) -> &SearchPanel {
        &self.panel
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Number of fetches that have not settled yet.
    pub fn pending(&self) -> usize {
        self.fetches.len()
    }

    /// Waits for the next fetch to settle and applies it to its widget.
    /// Returns `None` once nothing is pending.
    pub async fn next_settled(&mut self) -> Option<(Artifact, WidgetStatus)> {
        while let Some(joined) = self.fetches.join_next_with_id().await {
            if let Some(settled) = self.settle(joined) {
                return Some(settled);
            }
        }
        None
    }

    pub async fn settle_all(&mut self) {
        while self.next_settled().await.is_some() {}
    }

    /// Settles fetches until `artifact` has been applied. A fetch that never
    /// resolves keeps this waiting.
    pub async fn wait_for(&mut self, artifact: Artifact) {
        while self.report.status(artifact).is_none() {
            if self.next_settled().await.is_none() {
                break;
            }
        }
    }

    fn settle(
        &mut self,
        joined: std::result::Result<(task::Id, Result<Vec<u8>>), JoinError>,
    ) -> Option<(Artifact, WidgetStatus)> {
        let (id, outcome) = match joined {
            Ok((id, fetched)) => (id, Ok(fetched)),
            Err(e) => (e.id(), Err(e)),
        };
        let Some((artifact, path)) = self.in_flight.remove(&id) else {
            tracing::warn!("Fetch task {} settled without a known artifact", id);
            return None;
        };

        let fetched = outcome.unwrap_or_else(|e| {
            tracing::error!("Fetch task for {} aborted: {}", artifact, e);
            Err(DashboardError::FetchAborted {
                artifact: path.clone(),
                message: e.to_string(),
            })
        });
        tracing::debug!("Fetched {} ({})", artifact, path);

        let page = &mut self.page;
        let status = match artifact {
            Artifact::MostViewedDomains => apply(&mut DomainChart, page, &path, fetched),
            Artifact::Peers => apply(&mut ActiveLearners, page, &path, fetched),
            Artifact::Similarity => apply(&mut self.panel, page, &path, fetched),
            Artifact::TopPapers => apply(&mut TopPapers, page, &path, fetched),
        };
        self.report.record(artifact, status.clone());

        if self.fetches.is_empty() {
            tracing::info!(
                "Dashboard ready: {}/{} widgets rendered",
                self.report.rendered(),
                Artifact::ALL.len()
            );
            for (artifact, status) in self.report.failures() {
                tracing::warn!("Widget for {} degraded: {:?}", artifact, status);
            }
        }
        Some((artifact, status))
    }

    pub fn submit(&mut self, raw_input: &str) -> SearchOutcome {
        self.panel.submit(&mut self.page, raw_input)
    }

    /// What the search panel currently shows, one line per card.
    pub fn learners_lines(&self) -> Vec<String> {
        self.page
            .query(LEARNERS_LIST)
            .map(|list| list.child_elements().map(|e| e.text_content()).collect())
            .unwrap_or_default()
    }

    /// Waits for whichever comes first: a pending fetch settling or a
    /// submission from `input`. Settled fetches win ties. Returns `None` once
    /// `input` is closed.
    pub async fn next_event<I>(&mut self, input: &mut I) -> Result<Option<DashboardEvent>>
    where
        I: SubmitSource + ?Sized,
    {
        loop {
            if self.fetches.is_empty() {
                let submitted = input.next_submit().await?;
                return Ok(submitted.map(|line| self.search_event(&line)));
            }

            tokio::select! {
                biased;
                Some(joined) = self.fetches.join_next_with_id() => {
                    if let Some((artifact, status)) = self.settle(joined) {
                        return Ok(Some(DashboardEvent::Settled(artifact, status)));
                    }
                }
                submitted = input.next_submit() => {
                    return Ok(submitted?.map(|line| self.search_event(&line)));
                }
            }
        }
    }

    fn search_event(&mut self, line: &str) -> DashboardEvent {
        let outcome = self.submit(line);
        DashboardEvent::Searched(outcome, self.learners_lines())
    }

    /// Feeds every submission from `input` to the panel until it closes,
    /// applying fetches that settle in between. Returns the number of
    /// searches run.
    pub async fn drive<I, F>(&mut self, input: &mut I, mut on_outcome: F) -> Result<usize>
    where
        I: SubmitSource + ?Sized,
        F: FnMut(&SearchOutcome, &[String]),
    {
        let mut searches = 0;
        while let Some(event) = self.next_event(input).await? {
            if let DashboardEvent::Searched(outcome, lines) = event {
                searches += 1;
                on_outcome(&outcome, &lines);
            }
        }
        Ok(searches)
    }

    pub fn render_html(&self) -> String {
        self.page.render_html(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::ScriptedSubmits;
    use crate::core::layout::{ACTIVE_BADGE, CHART_CANVAS, LOADING_TEXT, PAPERS_COUNT};
    use crate::core::search::{PanelState, ENTER_TERM_TEXT, LOAD_ERROR_TEXT, NO_RESULTS_TEXT};
    use std::time::Duration;
    use tokio::time::timeout;

    struct MemorySource {
        files: HashMap<String, Vec<u8>>,
        /// Fetches of this path never resolve.
        hang: Option<String>,
        /// Fetches of this path panic.
        panic_on: Option<String>,
    }

    impl MemorySource {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, body)| (path.to_string(), body.as_bytes().to_vec()))
                    .collect(),
                hang: None,
                panic_on: None,
            }
        }
    }

    impl ArtifactSource for MemorySource {
        async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
            if self.hang.as_deref() == Some(path) {
                std::future::pending::<()>().await;
            }
            if self.panic_on.as_deref() == Some(path) {
                panic!("storage backend crashed while reading {}", path);
            }
            self.files.get(path).cloned().ok_or_else(|| {
                DashboardError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn full_source() -> MemorySource {
        MemorySource::new(&[
            (
                "outputs/output_most_viewed_domains.json",
                r#"[["www.github.com", 12], ["arxiv.org", 8]]"#,
            ),
            ("outputs/output_peers.json", r#"["a@x.com", "b@x.com"]"#),
            (
                "outputs/output_similarity.json",
                r#"{"a@x.com": [["b@x.com", 0.5]], "b@x.com": [["a@x.com", 0.5]]}"#,
            ),
            (
                "outputs/output_top_papers.json",
                r#"[["arxiv.org/abs/1", 3], ["github.com/profile/me", 9]]"#,
            ),
        ])
    }

    #[tokio::test]
    async fn test_run_renders_every_widget() {
        let engine = DashboardEngine::new(full_source(), ArtifactPaths::default(), "Dashboard");
        let dashboard = engine.run().await;

        assert_eq!(dashboard.report().rendered(), 4);
        assert_eq!(dashboard.report().completion_order().len(), 4);
        assert!(dashboard.panel().is_ready());

        let page = dashboard.page();
        assert_eq!(
            page.query(ACTIVE_BADGE).unwrap().text_content(),
            "2 Active Learners"
        );
        assert_eq!(page.query(PAPERS_COUNT).unwrap().text_content(), "1 Papers");
        assert!(page.query(CHART_CANVAS).unwrap().attr("data-chart").is_some());
        assert_eq!(dashboard.learners_lines(), vec![ENTER_TERM_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn test_missing_chart_artifact_is_isolated() {
        let mut source = full_source();
        source.files.remove("outputs/output_most_viewed_domains.json");
        let engine = DashboardEngine::new(source, ArtifactPaths::default(), "Dashboard");
        let mut dashboard = engine.run().await;

        assert!(matches!(
            dashboard.report().status(Artifact::MostViewedDomains),
            Some(WidgetStatus::Failed(_))
        ));
        assert_eq!(dashboard.report().rendered(), 3);

        let outcome = dashboard.submit("a@x.com");
        assert!(matches!(outcome, SearchOutcome::Matches(_)));
        assert_eq!(dashboard.learners_lines(), vec!["👤 b@x.com 50% match"]);
    }

    #[tokio::test]
    async fn test_drive_runs_each_submission() {
        let engine = DashboardEngine::new(full_source(), ArtifactPaths::default(), "Dashboard");
        let mut dashboard = engine.run().await;

        let mut input = ScriptedSubmits::new(["a@x.com", "", "ghost@x.com"]);
        let mut seen = Vec::new();
        let searches = dashboard
            .drive(&mut input, |outcome, lines| {
                seen.push((outcome.clone(), lines.to_vec()))
            })
            .await
            .unwrap();

        assert_eq!(searches, 3);
        assert!(matches!(seen[0].0, SearchOutcome::Matches(_)));
        assert_eq!(seen[1].1, vec![ENTER_TERM_TEXT.to_string()]);
        assert_eq!(seen[2].1, vec![NO_RESULTS_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn test_hung_fetch_leaves_other_widgets_usable() {
        let mut source = full_source();
        source.hang = Some("outputs/output_similarity.json".to_string());
        let engine = DashboardEngine::new(source, ArtifactPaths::default(), "Dashboard");
        let mut dashboard = engine.start();
        assert_eq!(dashboard.pending(), 4);

        for _ in 0..3 {
            let settled = timeout(Duration::from_secs(2), dashboard.next_settled())
                .await
                .unwrap();
            assert!(matches!(settled, Some((_, WidgetStatus::Rendered))));
        }
        assert_eq!(dashboard.pending(), 1);
        assert_eq!(dashboard.report().status(Artifact::Similarity), None);
        assert_eq!(dashboard.panel().state(), &PanelState::Loading);
        assert_eq!(dashboard.learners_lines(), vec![LOADING_TEXT.to_string()]);

        let mut input = ScriptedSubmits::new(["a@x.com"]);
        let searches = timeout(Duration::from_secs(2), dashboard.drive(&mut input, |_, _| {}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(searches, 1);
        assert_eq!(dashboard.learners_lines(), vec![NO_RESULTS_TEXT.to_string()]);
        assert_eq!(dashboard.pending(), 1);

        let html = dashboard.render_html();
        assert!(html.contains("2 Active Learners"));
        assert!(html.contains("1 Papers"));
    }

    #[tokio::test]
    async fn test_aborted_fetch_fails_its_widget() {
        let mut source = full_source();
        source.panic_on = Some("outputs/output_similarity.json".to_string());
        let engine = DashboardEngine::new(source, ArtifactPaths::default(), "Dashboard");
        let mut dashboard = engine.run().await;

        assert_eq!(dashboard.pending(), 0);
        assert_eq!(dashboard.report().completion_order().len(), 4);
        assert_eq!(dashboard.report().rendered(), 3);
        assert!(matches!(
            dashboard.report().status(Artifact::Similarity),
            Some(WidgetStatus::Failed(_))
        ));
        assert!(matches!(dashboard.panel().state(), PanelState::LoadFailed(_)));
        assert_eq!(dashboard.learners_lines(), vec![LOAD_ERROR_TEXT.to_string()]);
        assert_eq!(dashboard.submit("a@x.com"), SearchOutcome::Disabled);
    }

    #[tokio::test]
    async fn test_wait_for_stops_at_requested_artifact() {
        let mut source = full_source();
        source.hang = Some("outputs/output_top_papers.json".to_string());
        let engine = DashboardEngine::new(source, ArtifactPaths::default(), "Dashboard");
        let mut dashboard = engine.start();

        timeout(Duration::from_secs(2), dashboard.wait_for(Artifact::Similarity))
            .await
            .unwrap();
        assert!(dashboard.panel().is_ready());
        assert!(matches!(
            dashboard.submit("b@x.com"),
            SearchOutcome::Matches(ref m) if m.len() == 1
        ));
    }

    #[test]
    fn test_artifact_paths_resolve() {
        let paths = ArtifactPaths::default();
        assert_eq!(
            Artifact::Similarity.path_in(&paths),
            "outputs/output_similarity.json"
        );
        assert_eq!(Artifact::TopPapers.to_string(), "top-papers");
    }
}
