use super::{
    compact_text, encode_url, non_empty, spaced_text, translate, Card, CompiledSelectors,
    SearchParams, SiteParser, SiteSelectors, SkipReason,
};
use crate::dates::DateDialect;
use chrono::NaiveDate;
use common::{JobRecord, JobType, Remote, Source};

const SEARCH_BASE: &str = "https://www.linkedin.com/jobs/search/";
const ORIGIN: &str = "https://www.linkedin.com";

/// `f_JT` codes; several may be combined.
const JOB_TYPES: &[(&str, &str)] = &[
    ("full-time", "F"),
    ("fulltime", "F"),
    ("part-time", "P"),
    ("parttime", "P"),
    ("contract", "C"),
    ("internship", "I"),
    ("temporary", "T"),
];

const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

pub struct LinkedIn;

impl LinkedIn {
    /// `f_WT` codes: 2 remote, 1 on-site, 3 hybrid.
    fn work_types(params: &SearchParams<'_>) -> Vec<&'static str> {
        let mut codes = Vec::new();
        if params.has_flag(&["yes", "remote"]) {
            codes.push("2");
        }
        if params.has_flag(&["no", "onsite", "on-site"]) {
            codes.push("1");
        }
        if params
            .remote_flags
            .iter()
            .any(|f| f.to_lowercase().contains("hybrid"))
        {
            codes.push("3");
        }
        codes
    }
}

impl SiteParser for LinkedIn {
    const SOURCE: Source = Source::LinkedIn;

    const SELECTORS: SiteSelectors = SiteSelectors {
        cards: &[
            "li.jobs-search-results__list-item",
            "li.jobs-search-results__list-item--active",
            "div.base-card",
        ],
        title: &[
            "h3.base-search-card__title",
            "a.job-card-list__title",
            "a.base-card__full-link",
        ],
        link: &["a.base-card__full-link", "a.job-card-list__title"],
        company: &[
            "h4.base-search-card__subtitle a",
            "a.job-card-container__company-name",
        ],
        location: &["span.job-search-card__location"],
        description: &["p.job-search-card__snippet"],
        salary: &[],
        badges: &[
            "ul.job-card-container__metadata-items li",
            "div.job-search-card__benefits span",
        ],
        posted: &["time"],
    };

    fn search_url(params: &SearchParams<'_>) -> String {
        let mut pairs = vec![("keywords", params.keyword.to_string())];
        if let Some(location) = params.location() {
            pairs.push(("location", location));
        }

        let mut job_codes = translate(JOB_TYPES, params.job_types);
        let mut seen = Vec::new();
        job_codes.retain(|code| {
            let fresh = !seen.contains(code);
            seen.push(*code);
            fresh
        });
        if !job_codes.is_empty() {
            pairs.push(("f_JT", job_codes.join(",")));
        }

        let work_types = Self::work_types(params);
        if !work_types.is_empty() {
            pairs.push(("f_WT", work_types.join(",")));
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

        let mut jobtype = None;
        let mut remote = Remote::Unknown;
        let mut salary = None;
        for badge in card.first_group(&selectors.badges) {
            let text = spaced_text(badge);
            let lower = text.to_lowercase();
            if let Some(found) = JobType::detect(&lower) {
                jobtype = Some(found);
            }
            if lower.contains("remote") {
                remote = Remote::Yes;
            }
            if lower.contains("on-site") || lower.contains("on site") {
                remote = Remote::No;
            }
            if text.contains(CURRENCY_SYMBOLS) {
                salary = non_empty(text);
            }
        }

        let record = JobRecord {
            title,
            company: card.first_text(&selectors.company),
            location: card.first_text(&selectors.location),
            jobtype,
            remote,
            posted_date: DateDialect::LinkedIn.parse(&card.first_text(&selectors.posted), today),
            link,
            description: card.first_spaced_text(&selectors.description),
            salary,
            source: Self::SOURCE,
        };

        if record.is_blank() {
            return Err(SkipReason::Blank);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{extract_jobs_at, CardSkip};
    use chrono::Days;
    use url::Url;

    const FIXTURE: &str = include_str!("../../fixtures/linkedin_search.html");

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_search_url_with_all_filters() {
        let job_types = strings(&["full-time", "contract", "fulltime", "seasonal"]);
        let remote = strings(&["hybrid", "remote"]);
        let url = LinkedIn::search_url(&SearchParams {
            keyword: "rust developer",
            city: "Berlin",
            country: "Germany",
            job_types: &job_types,
            remote_flags: &remote,
        });
        assert_eq!(
            url,
            "https://www.linkedin.com/jobs/search/?keywords=rust+developer\
             &location=Berlin%2C+Germany&f_JT=F%2CC&f_WT=2%2C3"
        );
    }

    #[test]
    fn test_work_type_order() {
        let remote = strings(&["on-site", "hybrid-first", "yes"]);
        let params = SearchParams {
            keyword: "x",
            remote_flags: &remote,
            ..Default::default()
        };
        assert_eq!(LinkedIn::work_types(&params), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_search_url_keyword_only() {
        let url = LinkedIn::search_url(&SearchParams {
            keyword: "devops",
            country: "Canada",
            ..Default::default()
        });
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("keywords".to_string(), "devops".to_string()),
                ("location".to_string(), "Canada".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_always_carries_keyword() {
        let keywords = ["rust", "Müller & Söhne", "data engineer (remote)"];
        let cities = ["", "São Paulo"];
        let countries = ["", "Brazil"];
        let job_types = [
            strings(&[]),
            strings(&["full-time", "fulltime"]),
            strings(&["unknown"]),
        ];
        let remote = [strings(&[]), strings(&["remote", "hybrid"]), strings(&["maybe"])];

        for keyword in keywords {
            for city in cities {
                for country in countries {
                    for jt in &job_types {
                        for flags in &remote {
                            let url = LinkedIn::search_url(&SearchParams {
                                keyword,
                                city,
                                country,
                                job_types: jt,
                                remote_flags: flags,
                            });
                            let parsed = Url::parse(&url).unwrap();
                            assert!(parsed
                                .query_pairs()
                                .any(|(k, v)| k == "keywords" && v == keyword));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_fixture_extraction() {
        let report = extract_jobs_at(Source::LinkedIn, FIXTURE, 50, today());

        assert_eq!(report.source, Source::LinkedIn);
        assert_eq!(report.cards_found, 4);
        assert_eq!(report.records.len(), 3);
        assert_eq!(
            report.skipped,
            vec![CardSkip {
                index: 2,
                reason: SkipReason::Blank
            }]
        );

        let first = &report.records[0];
        assert_eq!(first.title, "Rust Engineer");
        assert_eq!(first.company, "Oxide Computer");
        assert_eq!(first.location, "Berlin, Germany");
        assert_eq!(
            first.link,
            "https://www.linkedin.com/jobs/view/rust-engineer-at-oxide-111?refId=abc"
        );
        assert_eq!(first.jobtype, Some(JobType::FullTime));
        assert_eq!(first.remote, Remote::Yes);
        assert_eq!(first.salary.as_deref(), Some("€70,000 - €90,000"));
        assert_eq!(first.description, "Work on control plane services.");
        assert_eq!(first.posted_date, today() - Days::new(14));
        assert_eq!(first.source, Source::LinkedIn);

        let second = &report.records[1];
        assert_eq!(second.title, "Platform Engineer");
        assert_eq!(second.company, "Initech");
        assert_eq!(second.location, "Remote");
        assert_eq!(second.link, "https://www.linkedin.com/jobs/view/222");
        assert_eq!(second.jobtype, Some(JobType::Contract));
        assert_eq!(second.remote, Remote::No);
        assert_eq!(second.salary, None);
        assert_eq!(second.posted_date, today() - Days::new(1));

        let third = &report.records[2];
        assert_eq!(third.title, "Data Engineer");
        assert_eq!(third.company, "Globex");
        assert_eq!(third.link, "");
        assert_eq!(third.jobtype, None);
        assert_eq!(third.remote, Remote::Unknown);
        assert_eq!(third.description, "");
        assert_eq!(third.posted_date, today());
    }

    #[test]
    fn test_max_results_caps_output() {
        let report = extract_jobs_at(Source::LinkedIn, FIXTURE, 2, today());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[1].title, "Platform Engineer");
    }

    #[test]
    fn test_logged_in_layout_uses_title_anchor_link() {
        let html = r#"
            <ul>
              <li class="jobs-search-results__list-item">
                <a class="job-card-list__title" href="/jobs/view/333/">  Staff Engineer </a>
                <a class="job-card-container__company-name">Umbrella</a>
                <ul class="job-card-container__metadata-items">
                  <li>Remote</li>
                  <li>On-site</li>
                  <li>Part-time</li>
                </ul>
                <time>3 weeks ago</time>
              </li>
            </ul>"#;
        let report = extract_jobs_at(Source::LinkedIn, html, 10, today());

        assert_eq!(report.cards_found, 1);
        let job = &report.records[0];
        assert_eq!(job.title, "Staff Engineer");
        assert_eq!(job.company, "Umbrella");
        assert_eq!(job.link, "https://www.linkedin.com/jobs/view/333/");
        assert_eq!(job.remote, Remote::No);
        assert_eq!(job.jobtype, Some(JobType::PartTime));
        assert_eq!(job.posted_date, today() - Days::new(21));
    }
}
