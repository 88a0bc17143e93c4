use common::JobRecord;
use serde_json::json;
use std::collections::HashSet;

/// Identity used for de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Trimmed, non-empty listing URL.
    Link(String),
    /// Sorted-key JSON of title, company and location, for link-less records.
    Content(String),
}

impl DedupKey {
    pub fn of(job: &JobRecord) -> Self {
        let link = job.link.trim();
        if !link.is_empty() {
            return DedupKey::Link(link.to_string());
        }
        DedupKey::Content(
            json!({
                "company": job.company,
                "location": job.location,
                "title": job.title,
            })
            .to_string(),
        )
    }
}

/// Keeps the first record for each [`DedupKey`], preserving input order.
pub fn merge_dedup<I>(jobs: I) -> Vec<JobRecord>
where
    I: IntoIterator<Item = JobRecord>,
{
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(DedupKey::of(job)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::{Remote, Source};

    fn job(title: &str, company: &str, location: &str, link: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            jobtype: None,
            remote: Remote::Unknown,
            posted_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            link: link.to_string(),
            description: String::new(),
            salary: None,
            source: Source::Indeed,
        }
    }

    #[test]
    fn test_same_link_keeps_first() {
        let mut later = job("Rust Dev (copy)", "Other", "Elsewhere", " https://x.test/1 ");
        later.source = Source::LinkedIn;
        let merged = merge_dedup(vec![
            job("Rust Dev", "Acme", "Austin", "https://x.test/1"),
            job("Go Dev", "Acme", "Austin", "https://x.test/2"),
            later,
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "Rust Dev");
        assert_eq!(merged[0].source, Source::Indeed);
        assert_eq!(merged[1].title, "Go Dev");
    }

    #[test]
    fn test_linkless_records_collapse_on_identical_fields() {
        let merged = merge_dedup(vec![
            job("Rust Dev", "Acme", "Austin", ""),
            job("Rust Dev", "Acme", "Austin", "   "),
        ]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_linkless_records_differing_in_any_field_survive() {
        let merged = merge_dedup(vec![
            job("Rust Dev", "Acme", "Austin", ""),
            job("Rust Dev", "Acme", "Dallas", ""),
            job("Rust Dev", "Globex", "Austin", ""),
            job("Go Dev", "Acme", "Austin", ""),
        ]);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_link_and_content_keys_do_not_collide() {
        let linkless = job("a", "b", "c", "");
        let content_key = match DedupKey::of(&linkless) {
            DedupKey::Content(key) => key,
            other => panic!("expected content key, got {other:?}"),
        };
        assert_eq!(content_key, r#"{"company":"b","location":"c","title":"a"}"#);

        let merged = merge_dedup(vec![linkless.clone(), job("z", "z", "z", &content_key)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_dedup(Vec::new()).is_empty());
    }
}
