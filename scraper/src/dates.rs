//! Relative "posted" text to calendar dates.
//!
//! Each board phrases listing age differently, so parsing is split by
//! dialect. Weeks count as 7 days and months as 30; anything unreadable
//! resolves to `today`.

use chrono::{Days, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateDialect {
    /// "Just posted", "Today", "3 days ago", "30+ days ago".
    Indeed,
    /// "5 hours ago", "Yesterday", "2 weeks ago", "1 month ago".
    LinkedIn,
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

fn days_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\+?\s*days?\b").expect("valid regex"))
}

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\+?(?:\s+([a-z]+))?").expect("valid regex"))
}

fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

impl DateDialect {
    pub fn parse(self, text: &str, today: NaiveDate) -> NaiveDate {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return today;
        }
        match self {
            DateDialect::Indeed => parse_indeed(&text, today),
            DateDialect::LinkedIn => parse_linkedin(&text, today),
        }
    }
}

fn parse_indeed(text: &str, today: NaiveDate) -> NaiveDate {
    if text.contains("today") || text.contains("just posted") {
        return today;
    }
    if text.contains("30+") {
        return days_before(today, 30);
    }
    days_regex()
        .captures(text)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(|n| days_before(today, n))
        .unwrap_or(today)
}

fn parse_linkedin(text: &str, today: NaiveDate) -> NaiveDate {
    if ["hour", "minute", "today"].iter().any(|n| text.contains(n)) {
        return today;
    }
    if text.contains("yesterday") {
        return days_before(today, 1);
    }

    let Some(caps) = amount_regex().captures(text) else {
        return today;
    };
    let Ok(amount) = caps[1].parse::<u64>() else {
        return today;
    };
    let unit = caps.get(2).map_or("days", |m| m.as_str());
    let per_unit = if unit.contains("week") {
        7
    } else if unit.contains("month") {
        30
    } else {
        1
    };
    amount
        .checked_mul(per_unit)
        .map(|days| days_before(today, days))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn minus(days: u64) -> NaiveDate {
        today() - Days::new(days)
    }

    #[test]
    fn test_indeed_phrases() {
        let d = DateDialect::Indeed;
        assert_eq!(d.parse("Just posted", today()), today());
        assert_eq!(d.parse("Today", today()), today());
        assert_eq!(d.parse("", today()), today());
        assert_eq!(d.parse("1 day ago", today()), minus(1));
        assert_eq!(d.parse("3 days ago", today()), minus(3));
        assert_eq!(d.parse("30+ days ago", today()), minus(30));
        assert_eq!(d.parse("PostedPosted 5 days ago", today()), minus(5));
    }

    #[test]
    fn test_indeed_unreadable_falls_back_to_today() {
        let d = DateDialect::Indeed;
        assert_eq!(d.parse("a while back", today()), today());
        assert_eq!(d.parse("2 weeks ago", today()), today());
        assert_eq!(d.parse("99999999999999999999999 days ago", today()), today());
    }

    #[test]
    fn test_linkedin_phrases() {
        let d = DateDialect::LinkedIn;
        assert_eq!(d.parse("5 hours ago", today()), today());
        assert_eq!(d.parse("12 minutes ago", today()), today());
        assert_eq!(d.parse("Today", today()), today());
        assert_eq!(d.parse("Yesterday", today()), minus(1));
        assert_eq!(d.parse("3 days ago", today()), minus(3));
        assert_eq!(d.parse("2 weeks ago", today()), minus(14));
        assert_eq!(d.parse("1 month ago", today()), minus(30));
        assert_eq!(d.parse("4", today()), minus(4));
    }

    #[test]
    fn test_linkedin_unreadable_falls_back_to_today() {
        let d = DateDialect::LinkedIn;
        assert_eq!(d.parse("Reposted recently", today()), today());
        assert_eq!(d.parse("", today()), today());
    }

    #[test]
    fn test_huge_offsets_fall_back_to_today() {
        let d = DateDialect::LinkedIn;
        assert_eq!(d.parse("18446744073709551615 months ago", today()), today());
    }
}
