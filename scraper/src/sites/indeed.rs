use super::{
    compact_text, encode_url, non_empty, spaced_text, translate, Card, CompiledSelectors, SearchParams,
    SiteParser, SiteSelectors, SkipReason,
};
use crate::dates::DateDialect;
use chrono::NaiveDate;
use common::{JobRecord, JobType, Remote, Source};

const SEARCH_BASE: &str = "https://www.indeed.com/jobs";
const ORIGIN: &str = "https://www.indeed.com";

/// Indeed's `jt` parameter takes a single value.
const JOB_TYPES: &[(&str, &str)] = &[
    ("full-time", "fulltime"),
    ("fulltime", "fulltime"),
    ("part-time", "parttime"),
    ("parttime", "parttime"),
    ("contract", "contract"),
    ("internship", "internship"),
    ("temporary", "temporary"),
];

/// `sc` filter value for remote-only results.
const REMOTE_FILTER: &str = "0kf:jt(telecommute);";

pub struct Indeed;

impl SiteParser for Indeed {
    const SOURCE: Source = Source::Indeed;

    const SELECTORS: SiteSelectors = SiteSelectors {
        cards: &["div.job_seen_beacon", "td.resultContent"],
        title: &["h2.jobTitle a", "a.tapItem"],
        link: &[],
        company: &["span.companyName"],
        location: &["div.companyLocation", "span.companyLocation"],
        description: &["div.job-snippet"],
        salary: &["div.salary-snippet", "span.salary-snippet-container"],
        badges: &["div.attribute_snippet", "div.metadata"],
        posted: &["span.date", "span.dateStamp"],
    };

    fn search_url(params: &SearchParams<'_>) -> String {
        let mut pairs = vec![("q", params.keyword.to_string())];
        if let Some(location) = params.location() {
            pairs.push(("l", location));
        }
        if let Some(code) = translate(JOB_TYPES, params.job_types).first() {
            pairs.push(("jt", code.to_string()));
        }
        if params.has_flag(&["yes", "remote"]) {
            pairs.push(("sc", REMOTE_FILTER.to_string()));
        }
        encode_url(SEARCH_BASE, &pairs)
    }

    fn parse_card(
        card: &Card<'_>,
        selectors: &CompiledSelectors,
        today: NaiveDate,
    ) -> Result<JobRecord, SkipReason> {
        let title_el = card.first(&selectors.title);
        let title = title_el.map(compact_text).unwrap_or_default();
        let link = card.link(title_el, &selectors.link, ORIGIN);

        let badges: Vec<String> = card
            .all(&selectors.badges)
            .into_iter()
            .map(spaced_text)
            .collect();
        let (jobtype, remote) = classify_badges(&badges);

        let record = JobRecord {
            title,
            company: card.first_text(&selectors.company),
            location: card.first_spaced_text(&selectors.location),
            jobtype,
            remote,
            posted_date: DateDialect::Indeed.parse(&card.first_text(&selectors.posted), today),
            link,
            description: card.first_spaced_text(&selectors.description),
            salary: non_empty(card.first_spaced_text(&selectors.salary)),
            source: Self::SOURCE,
        };

        if record.is_blank() {
            return Err(SkipReason::Blank);
        }
        Ok(record)
    }
}

/// Job type from the last badge naming one. Any "remote" badge wins over
/// an on-site one.
fn classify_badges(badges: &[String]) -> (Option<JobType>, Remote) {
    let mut jobtype = None;
    let mut remote = Remote::Unknown;
    let mut on_site = false;

    for text in badges {
        let lower = text.to_lowercase();
        if let Some(found) = JobType::detect(&lower) {
            jobtype = Some(found);
        }
        if lower.contains("remote") {
            remote = Remote::Yes;
        }
        on_site |= lower.contains("on-site") || lower.contains("on site");
    }

    if remote == Remote::Unknown && on_site {
        remote = Remote::No;
    }
    (jobtype, remote)
}
