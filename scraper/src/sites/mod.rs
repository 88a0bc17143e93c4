//! Per-board search URLs and listing-card extraction.
//!
//! Each board declares its selectors in one [`SiteSelectors`] table; every
//! field is an ordered fallback chain, tried until one selector matches.
//! Card traversal, the result cap and skip bookkeeping are shared here so a
//! markup change on one board only touches that board's table.

pub mod indeed;
pub mod linkedin;

use crate::dates::today_utc;
use chrono::NaiveDate;
use common::{JobRecord, Source};
use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::{form_urlencoded, Url};

/// Selector fallback chains for one board's search results page.
#[derive(Debug, Clone, Copy)]
pub struct SiteSelectors {
    pub cards: &'static [&'static str],
    pub title: &'static [&'static str],
    pub link: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub description: &'static [&'static str],
    pub salary: &'static [&'static str],
    pub badges: &'static [&'static str],
    pub posted: &'static [&'static str],
}

pub(crate) struct CompiledSelectors {
    pub cards: Vec<Selector>,
    pub title: Vec<Selector>,
    pub link: Vec<Selector>,
    pub company: Vec<Selector>,
    pub location: Vec<Selector>,
    pub description: Vec<Selector>,
    pub salary: Vec<Selector>,
    pub badges: Vec<Selector>,
    pub posted: Vec<Selector>,
}

fn compile(chain: &[&str]) -> Vec<Selector> {
    chain
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("Skipping invalid selector '{}': {:?}", raw, e);
                None
            }
        })
        .collect()
}

impl CompiledSelectors {
    fn new(table: &SiteSelectors) -> Self {
        CompiledSelectors {
            cards: compile(table.cards),
            title: compile(table.title),
            link: compile(table.link),
            company: compile(table.company),
            location: compile(table.location),
            description: compile(table.description),
            salary: compile(table.salary),
            badges: compile(table.badges),
            posted: compile(table.posted),
        }
    }
}

/// Query inputs shared by both boards' URL builders.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchParams<'a> {
    pub keyword: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub job_types: &'a [String],
    pub remote_flags: &'a [String],
}

impl SearchParams<'_> {
    /// "city, country" with empty parts dropped.
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city.trim(), self.country.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }

    fn has_flag(&self, wanted: &[&str]) -> bool {
        self.remote_flags
            .iter()
            .any(|f| wanted.contains(&f.trim().to_lowercase().as_str()))
    }
}

/// Maps free-text filter values through a fixed vocabulary, dropping unknowns.
fn translate<'t>(table: &[(&str, &'t str)], values: &[String]) -> Vec<&'t str> {
    values
        .iter()
        .filter_map(|v| {
            let key = v.trim().to_lowercase();
            table.iter().find(|(k, _)| *k == key).map(|(_, code)| *code)
        })
        .collect()
}

fn encode_url(base: &str, pairs: &[(&str, String)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{}?{}", base, query)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("card has no title, company or link")]
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSkip {
    /// Position of the card among all matched cards.
    pub index: usize,
    pub reason: SkipReason,
}

/// Outcome of extracting one results page.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub source: Source,
    pub cards_found: usize,
    pub records: Vec<JobRecord>,
    pub skipped: Vec<CardSkip>,
}

impl ExtractReport {
    fn empty(source: Source) -> Self {
        ExtractReport {
            source,
            cards_found: 0,
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// A matched job card, with fallback-aware lookups scoped to it.
pub(crate) struct Card<'a> {
    element: ElementRef<'a>,
}

impl<'a> Card<'a> {
    /// First element matched by the first selector in `chain` that matches anything.
    pub fn first(&self, chain: &[Selector]) -> Option<ElementRef<'a>> {
        chain
            .iter()
            .find_map(|selector| self.element.select(selector).next())
    }

    pub fn first_text(&self, chain: &[Selector]) -> String {
        self.first(chain).map(compact_text).unwrap_or_default()
    }

    pub fn first_spaced_text(&self, chain: &[Selector]) -> String {
        self.first(chain).map(spaced_text).unwrap_or_default()
    }

    /// Every match of every selector, grouped by selector order.
    pub fn all(&self, chain: &[Selector]) -> Vec<ElementRef<'a>> {
        chain
            .iter()
            .flat_map(|selector| self.element.select(selector))
            .collect()
    }

    /// Matches of the first selector in `chain` that matches anything.
    pub fn first_group(&self, chain: &[Selector]) -> Vec<ElementRef<'a>> {
        chain
            .iter()
            .map(|selector| self.element.select(selector).collect::<Vec<_>>())
            .find(|group| !group.is_empty())
            .unwrap_or_default()
    }

    /// Link for the card: the title's own `href` when the title is an anchor,
    /// otherwise the first anchor from `link_chain`. Relative links resolve
    /// against `origin`; an href that cannot be resolved is kept as written.
    pub fn link(
        &self,
        title: Option<ElementRef<'a>>,
        link_chain: &[Selector],
        origin: &str,
    ) -> String {
        let href = title
            .filter(|el| el.value().name() == "a")
            .and_then(|el| el.value().attr("href"))
            .or_else(|| {
                link_chain
                    .iter()
                    .filter_map(|selector| self.element.select(selector).next())
                    .find_map(|el| el.value().attr("href"))
            });
        match href.map(str::trim) {
            None | Some("") => String::new(),
            Some(href) => resolve_link(origin, href).unwrap_or_else(|e| {
                debug!("Keeping unresolvable link '{}' as is: {}", href, e);
                href.to_string()
            }),
        }
    }
}

/// Text nodes trimmed and concatenated, like a compact label.
pub(crate) fn compact_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Text nodes trimmed and joined with single spaces.
pub(crate) fn spaced_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_link(origin: &str, href: &str) -> Result<String, url::ParseError> {
    Url::parse(origin)
        .and_then(|base| base.join(href))
        .map(String::from)
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// One board's URL builder and card parser.
pub(crate) trait SiteParser {
    const SOURCE: Source;
    const SELECTORS: SiteSelectors;

    fn search_url(params: &SearchParams<'_>) -> String;

    fn parse_card(
        card: &Card<'_>,
        selectors: &CompiledSelectors,
        today: NaiveDate,
    ) -> Result<JobRecord, SkipReason>;
}

fn extract<P: SiteParser>(html: &str, max_results: usize, today: NaiveDate) -> ExtractReport {
    let selectors = CompiledSelectors::new(&P::SELECTORS);
    let document = Html::parse_document(html);

    let cards: Vec<ElementRef<'_>> = selectors
        .cards
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    let mut report = ExtractReport::empty(P::SOURCE);
    if cards.is_empty() {
        warn!("No {} job cards found using known selectors.", P::SOURCE);
        return report;
    }
    report.cards_found = cards.len();

    for (index, element) in cards.into_iter().enumerate() {
        if report.records.len() >= max_results {
            break;
        }
        let card = Card { element };
        match P::parse_card(&card, &selectors, today) {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                debug!("Skipping {} job card #{}: {}", P::SOURCE, index, reason);
                report.skipped.push(CardSkip { index, reason });
            }
        }
    }

    report
}

/// Builds the search results URL for `source`.
pub fn search_url(source: Source, params: &SearchParams<'_>) -> String {
    match source {
        Source::Indeed => indeed::Indeed::search_url(params),
        Source::LinkedIn => linkedin::LinkedIn::search_url(params),
    }
}

/// Extracts at most `max_results` job records from a results page,
/// dating relative "posted" text against the current UTC date.
pub fn extract_jobs(source: Source, html: &str, max_results: usize) -> ExtractReport {
    extract_jobs_at(source, html, max_results, today_utc())
}

pub fn extract_jobs_at(
    source: Source,
    html: &str,
    max_results: usize,
    today: NaiveDate,
) -> ExtractReport {
    match source {
        Source::Indeed => extract::<indeed::Indeed>(html, max_results, today),
        Source::LinkedIn => extract::<linkedin::LinkedIn>(html, max_results, today),
    }
}
