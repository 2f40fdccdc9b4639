//! Host markup for the dashboard and the selectors widgets rely on.

use crate::core::page::{Element, Page, Selector};

pub const CHART_CANVAS: Selector = Selector::Id("platformChart");
pub const ACTIVE_BADGE: Selector = Selector::Class("active-badge");
pub const PAPERS_LIST: Selector = Selector::Id("papersList");
pub const PAPERS_COUNT: Selector = Selector::Id("papersCount");
pub const LEARNERS_LIST: Selector = Selector::Id("learnersList");
pub const SEARCH_INPUT: Selector = Selector::Id("searchInput");

pub const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Instantiates Chart.js on every canvas that carries a `data-chart` config.
const CHART_BOOTSTRAP: &str = r#"document.querySelectorAll('canvas[data-chart]').forEach(function (canvas) {
    try {
        new Chart(canvas.getContext('2d'), JSON.parse(canvas.dataset.chart));
    } catch (error) {
        console.error('Error rendering chart:', error);
    }
});"#;

pub const LOADING_TEXT: &str = "Loading...";

fn card(title: &str) -> Element {
    Element::new("section")
        .with_class("card")
        .with_child(Element::new("h2").with_class("card-title").with_text(title))
}

pub fn dashboard_page(title: &str) -> Page {
    let header = Element::new("header")
        .with_class("flex justify-between items-center")
        .with_child(Element::new("h1").with_class("text-3xl font-bold").with_text(title))
        .with_child(
            Element::new("span")
                .with_class("badge active-badge")
                .with_text(LOADING_TEXT),
        );

    let chart = card("Most Visited Domains").with_child(
        Element::new("div").with_class("chart-container").with_child(
            Element::new("canvas")
                .with_id("platformChart")
                .with_attr("height", "300"),
        ),
    );

    let papers = Element::new("section")
        .with_class("card")
        .with_child(
            Element::new("div")
                .with_class("flex justify-between items-center")
                .with_child(Element::new("h2").with_class("card-title").with_text("Top Papers"))
                .with_child(
                    Element::new("span")
                        .with_id("papersCount")
                        .with_class("badge")
                        .with_text("0 Papers"),
                ),
        )
        .with_child(
            Element::new("ol")
                .with_id("papersList")
                .with_class("papers-list")
                .with_child(
                    Element::new("li")
                        .with_class("text-gray-400 p-4")
                        .with_text(LOADING_TEXT),
                ),
        );

    let search = card("Find Similar Learners")
        .with_child(
            Element::new("input")
                .with_id("searchInput")
                .with_attr("type", "text")
                .with_class("search-input"),
        )
        .with_child(
            Element::new("div")
                .with_id("learnersList")
                .with_class("learners-list")
                .with_child(
                    Element::new("div")
                        .with_class("text-gray-400 p-4")
                        .with_text(LOADING_TEXT),
                ),
        );

    let body = Element::new("body")
        .with_class("bg-gray-900 text-gray-100")
        .with_child(
            Element::new("main")
                .with_class("container mx-auto p-6")
                .with_child(header)
                .with_child(chart)
                .with_child(papers)
                .with_child(search),
        );

    let mut page = Page::new(title, body);
    page.head_scripts.push(CHART_JS_CDN.to_string());
    page.inline_script = Some(CHART_BOOTSTRAP.to_string());
    page
}
