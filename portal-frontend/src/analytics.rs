//! In-memory shaping of backend data for the dashboards: filtering, chart
//! series and CSV export.

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::{Application, ApplicationStatus, ExtractedJob, JobOffer, Role, User};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostedWithin {
    Today,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
    /// More than 30 days ago.
    Older,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown posting date filter: {0}")]
pub struct UnknownDateFilter(String);

impl FromStr for PostedWithin {
    type Err = UnknownDateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(PostedWithin::Today),
            "week" => Ok(PostedWithin::Week),
            "month" => Ok(PostedWithin::Month),
            "older" => Ok(PostedWithin::Older),
            _ => Err(UnknownDateFilter(s.to_string())),
        }
    }
}

impl PostedWithin {
    fn admits(&self, posted: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            PostedWithin::Today => posted.date() == now.date(),
            PostedWithin::Week => posted >= now - Duration::days(7),
            PostedWithin::Month => posted >= now - Duration::days(30),
            PostedWithin::Older => posted < now - Duration::days(30),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub posted: Option<PostedWithin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub by_role: BTreeMap<String, u64>,
}

pub fn active_only(jobs: Vec<JobOffer>) -> Vec<JobOffer> {
    jobs.into_iter().filter(JobOffer::is_active).collect()
}

/// Keyword matches the title ignoring case. A date filter drops undated offers.
pub fn filter_jobs(jobs: Vec<JobOffer>, filter: &JobFilter, now: NaiveDateTime) -> Vec<JobOffer> {
    let keyword = filter
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase);

    jobs.into_iter()
        .filter(|job| match &keyword {
            Some(k) => job
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(k)),
            None => true,
        })
        .filter(|job| match filter.posted {
            Some(window) => job.created_at.is_some_and(|at| window.admits(at, now)),
            None => true,
        })
        .collect()
}

/// Counts per calendar month, oldest first, labelled like `Jan 2024`.
pub fn monthly_counts<I>(dates: I) -> ChartSeries
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for date in dates {
        *months.entry((date.year(), date.month0())).or_default() += 1;
    }

    let mut series = ChartSeries::default();
    for ((year, month0), count) in months {
        series
            .labels
            .push(format!("{} {}", MONTH_NAMES[month0 as usize], year));
        series.data.push(count);
    }
    series
}

/// Pending, Accepted, Rejected, in that order.
pub fn status_counts(applications: &[Application]) -> ChartSeries {
    let mut series = ChartSeries::default();
    for status in ApplicationStatus::ALL {
        series.labels.push(status.label().to_string());
        series.data.push(
            applications
                .iter()
                .filter(|a| a.status == status)
                .count() as u64,
        );
    }
    series
}

pub fn count_with_status(applications: &[Application], status: ApplicationStatus) -> u64 {
    applications.iter().filter(|a| a.status == status).count() as u64
}

pub fn user_summary(users: &[User]) -> UserSummary {
    let mut by_role: BTreeMap<String, u64> = Role::KNOWN
        .iter()
        .map(|role| (role.as_str().to_string(), 0))
        .collect();
    for user in users {
        *by_role.entry(user.role.as_str().to_string()).or_default() += 1;
    }

    let active = users.iter().filter(|u| u.active).count() as u64;
    UserSummary {
        total: users.len() as u64,
        active,
        inactive: users.len() as u64 - active,
        by_role,
    }
}

/// Two-column `Field,Value` export of one extraction. Fields that are absent are skipped.
pub fn extraction_csv(extracted: &ExtractedJob) -> String {
    let mut rows: Vec<(String, String)> = vec![("Field".into(), "Value".into())];

    let fields = [
        ("Job Title", "job_title"),
        ("Company", "company"),
        ("Location", "location"),
        ("Contract Type", "contract_type"),
        ("Domain", "inferred_domain"),
        ("Type", "type"),
        ("Salary", "salary"),
        ("Duration", "duration"),
        ("Deadline", "deadline"),
        ("Language", "language"),
    ];
    for (label, key) in fields {
        if let Some(value) = extracted.field_text(key) {
            rows.push((label.to_string(), value));
        }
    }

    for (index, skill) in extracted.skills().into_iter().enumerate() {
        rows.push((format!("Skill {}", index + 1), skill));
    }

    for (label, kind) in [
        ("Email Contacts", "emails"),
        ("Phone Contacts", "phones"),
        ("URL Contacts", "urls"),
    ] {
        let contacts = extracted.contacts(kind);
        if !contacts.is_empty() {
            rows.push((label.to_string(), contacts.join(", ")));
        }
    }

    rows.iter()
        .map(|(field, value)| format!("{},{}", quote(field), quote(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn job(id: i64, title: &str, created: Option<&str>, active: bool) -> JobOffer {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "isActive": active,
            "createdAt": created.map(|c| at(c).format("%Y-%m-%dT%H:%M:%S").to_string()),
        }))
        .unwrap()
    }

    fn ids(jobs: &[JobOffer]) -> Vec<i64> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[test]
    fn keeps_only_active_offers() {
        let jobs = vec![
            job(1, "A", None, true),
            job(2, "B", None, false),
            job(3, "C", None, true),
        ];
        assert_eq!(ids(&active_only(jobs)), vec![1, 3]);
    }

    #[test]
    fn filters_by_keyword_and_posting_date() {
        let now = at("2024-03-31 12:00");
        let jobs = vec![
            job(1, "Rust Developer", Some("2024-03-31 08:00"), true),
            job(2, "Data Analyst", Some("2024-03-27 08:00"), true),
            job(3, "rust intern", Some("2024-03-10 08:00"), true),
            job(4, "Designer", Some("2024-01-02 08:00"), true),
            job(5, "Rust Lead", None, true),
        ];

        let keyword = JobFilter {
            keyword: Some("  RUST ".into()),
            posted: None,
        };
        assert_eq!(ids(&filter_jobs(jobs.clone(), &keyword, now)), vec![1, 3, 5]);

        let window = |posted| JobFilter {
            keyword: None,
            posted: Some(posted),
        };
        assert_eq!(ids(&filter_jobs(jobs.clone(), &window(PostedWithin::Today), now)), vec![1]);
        assert_eq!(ids(&filter_jobs(jobs.clone(), &window(PostedWithin::Week), now)), vec![1, 2]);
        assert_eq!(
            ids(&filter_jobs(jobs.clone(), &window(PostedWithin::Month), now)),
            vec![1, 2, 3]
        );
        assert_eq!(ids(&filter_jobs(jobs, &window(PostedWithin::Older), now)), vec![4]);
    }

    #[test]
    fn parses_date_filter_names() {
        assert_eq!("Week".parse::<PostedWithin>().unwrap(), PostedWithin::Week);
        assert!("fortnight".parse::<PostedWithin>().is_err());
    }

    #[test]
    fn groups_by_month_in_order() {
        let series = monthly_counts(vec![
            at("2024-02-10 10:00"),
            at("2023-12-01 10:00"),
            at("2024-02-28 10:00"),
            at("2024-01-15 10:00"),
        ]);

        assert_eq!(series.labels, vec!["Dec 2023", "Jan 2024", "Feb 2024"]);
        assert_eq!(series.data, vec![1, 1, 2]);
    }

    #[test]
    fn counts_statuses_in_fixed_order() {
        let apps: Vec<Application> = serde_json::from_value(json!([
            {"id": 1, "seekerId": 1, "jobOfferId": 1, "status": "ACCEPTED"},
            {"id": 2, "seekerId": 1, "jobOfferId": 2},
            {"id": 3, "seekerId": 1, "jobOfferId": 3, "status": "ACCEPTED"}
        ]))
        .unwrap();

        let series = status_counts(&apps);
        assert_eq!(series.labels, vec!["Pending", "Accepted", "Rejected"]);
        assert_eq!(series.data, vec![1, 2, 0]);
        assert_eq!(count_with_status(&apps, ApplicationStatus::Accepted), 2);
    }

    #[test]
    fn summarizes_users() {
        let users: Vec<User> = serde_json::from_value(json!([
            {"id": 1, "name": "A", "email": "a@x.com", "role": "ADMIN", "active": true},
            {"id": 2, "name": "B", "email": "b@x.com", "role": "SEEKER", "active": false},
            {"id": 3, "name": "C", "email": "c@x.com", "role": "SEEKER", "active": true}
        ]))
        .unwrap();

        let summary = user_summary(&users);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.inactive, 1);
        assert_eq!(summary.by_role["SEEKER"], 2);
        assert_eq!(summary.by_role["OFFERER"], 0);
    }

    #[test]
    fn exports_extraction_as_quoted_csv() {
        let extracted = ExtractedJob(json!({
            "job_title": {"value": "Backend \"Ninja\""},
            "location": {"value": ["Lyon", "Remote"]},
            "inferred_domain": "IT",
            "skills": [{"skill": "Rust"}, {"skill": "SQL"}],
            "contacts": {"emails": ["jobs@acme.io"], "phones": [], "urls": ["acme.io"]}
        }));

        let csv = extraction_csv(&extracted);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                r#""Field","Value""#,
                r#""Job Title","Backend ""Ninja""""#,
                r#""Location","Lyon, Remote""#,
                r#""Domain","IT""#,
                r#""Skill 1","Rust""#,
                r#""Skill 2","SQL""#,
                r#""Email Contacts","jobs@acme.io""#,
                r#""URL Contacts","acme.io""#,
            ]
        );
    }
}
