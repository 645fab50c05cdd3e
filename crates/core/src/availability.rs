//! Per-day availability summary. Pure; recomputed on every read.

use bffhang_domain::utils::format_day_label;
use bffhang_domain::{DaySummary, Response};

/// Summarize which respondents can make each poll day.
///
/// `all_available` is false for every day when there are no responses.
pub fn summarize_availability(days: &[String], responses: &[Response]) -> Vec<DaySummary> {
    days.iter()
        .map(|day| {
            let mut names: Vec<String> = responses
                .iter()
                .filter(|response| response.days.iter().any(|selected| selected == day))
                .map(|response| response.name.clone())
                .collect();
            names.sort();

            DaySummary {
                date: day.clone(),
                label: format_day_label(day),
                all_available: !responses.is_empty() && names.len() == responses.len(),
                names,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn response(name: &str, days: &[&str]) -> Response {
        Response {
            id: name.to_lowercase(),
            name: name.to_string(),
            days: days.iter().map(|d| (*d).to_string()).collect(),
            user_token: format!("tok-{name}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn everyone_available_only_on_shared_day() {
        let days = vec!["2024-01-01".to_string(), "2024-01-02".to_string()];
        let responses = vec![
            response("B", &["2024-01-01", "2024-01-02"]),
            response("A", &["2024-01-01"]),
        ];

        let summaries = summarize_availability(&days, &responses);
        assert_eq!(summaries.len(), 2);

        assert!(summaries[0].all_available);
        assert_eq!(summaries[0].names, vec!["A", "B"]);
        assert_eq!(summaries[0].label, "Mon, Jan 1");

        assert!(!summaries[1].all_available);
        assert_eq!(summaries[1].names, vec!["B"]);
    }

    #[test]
    fn no_responses_means_nobody_is_all_available() {
        let days = vec!["2024-01-01".to_string(), "2024-01-02".to_string()];
        let summaries = summarize_availability(&days, &[]);
        assert!(summaries.iter().all(|s| !s.all_available && s.names.is_empty()));
    }

    #[test]
    fn duplicate_names_are_counted_per_response() {
        let days = vec!["2024-01-01".to_string()];
        let responses =
            vec![response("Sam", &["2024-01-01"]), response("Sam", &[]), response("Ari", &[])];

        let summary = &summarize_availability(&days, &responses)[0];
        assert_eq!(summary.names, vec!["Sam"]);
        assert!(!summary.all_available);
    }
}
