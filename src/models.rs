use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackItem {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub outcome_name: String,
    #[serde(default)]
    pub assignment_title: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub term_title: String,
    #[serde(default)]
    pub created_on: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub weight_numeric: Option<f64>,
}

impl FeedbackItem {
    pub fn outcome_kind(&self) -> OutcomeKind {
        OutcomeKind::of(&self.outcome_name)
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        parse_created_on(&self.created_on)
    }

    pub fn weight_value(&self) -> f64 {
        self.weight_numeric
            .or_else(|| parse_weight(&self.weight))
            .unwrap_or(1.0)
    }

    pub fn weight_label(&self) -> String {
        if self.weight.trim().is_empty() {
            format!("{}x", self.weight_value())
        } else {
            self.weight.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiSummary {
    #[serde(default)]
    pub outcome_name: String,
    #[serde(default)]
    pub outcome_id: Option<i64>,
    #[serde(default)]
    pub outcome_description: String,
    #[serde(default)]
    pub strengths_text: String,
    #[serde(default)]
    pub improvement_text: String,
    #[serde(default)]
    pub last_updated: String,
}

impl AiSummary {
    pub fn first_for<'a>(summaries: &'a [AiSummary], outcome_name: &str) -> Option<&'a AiSummary> {
        summaries.iter().find(|summary| summary.outcome_name == outcome_name)
    }

    pub fn strength_bullets(&self) -> Vec<&str> {
        split_bullets(&self.strengths_text)
    }

    pub fn improvement_bullets(&self) -> Vec<&str> {
        split_bullets(&self.improvement_text)
    }
}

fn split_bullets(text: &str) -> Vec<&str> {
    text.lines()
        .map(|line| {
            line.trim_start_matches(|c: char| c == '-' || c.is_whitespace())
                .trim_end()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseScore {
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub course_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Criterion,
    LearningOutcome,
}

impl OutcomeKind {
    pub fn of(outcome_name: &str) -> OutcomeKind {
        if outcome_name.contains('-') {
            OutcomeKind::LearningOutcome
        } else {
            OutcomeKind::Criterion
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            OutcomeKind::Criterion => "HC",
            OutcomeKind::LearningOutcome => "LO",
        }
    }
}

pub fn outcome_course(outcome_name: &str) -> Option<&str> {
    outcome_name.split_once('-').map(|(code, _)| code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    Poor,
    Fair,
    Average,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> ScoreBand {
        if score >= 4.5 {
            ScoreBand::Excellent
        } else if score >= 3.5 {
            ScoreBand::Good
        } else if score >= 2.5 {
            ScoreBand::Average
        } else if score >= 1.5 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Poor => "Poor",
            ScoreBand::Fair => "Fair",
            ScoreBand::Average => "Average",
            ScoreBand::Good => "Good",
            ScoreBand::Excellent => "Excellent",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Poor => "#E85D5D",
            ScoreBand::Fair => "#E89A5D",
            ScoreBand::Average => "#73C173",
            ScoreBand::Good => "#3A4DB9",
            ScoreBand::Excellent => "#8B6BF2",
        }
    }
}

pub fn score_description(score: u32) -> &'static str {
    match score {
        1 => "Lacks knowledge",
        2 => "Superficial knowledge",
        3 => "Knowledge",
        4 => "Deep knowledge",
        _ => "Profound knowledge",
    }
}

pub fn parse_weight(weight: &str) -> Option<f64> {
    let trimmed = weight.trim().trim_end_matches(['x', 'X']);
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

pub fn parse_created_on(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Timestamps with an offset keep their own wall clock, not UTC.
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> FeedbackItem {
        FeedbackItem {
            score: 4.0,
            comment: "Clear argument structure.".to_string(),
            outcome_name: "CS101-A".to_string(),
            assignment_title: "poll".to_string(),
            course_title: "Intro to Computer Science".to_string(),
            course_code: "CS101".to_string(),
            term_title: "Fall 2024".to_string(),
            created_on: "2024-09-15T10:30:00".to_string(),
            weight: "8x".to_string(),
            weight_numeric: Some(8.0),
        }
    }

    #[test]
    fn hyphenated_outcomes_are_learning_outcomes() {
        assert_eq!(OutcomeKind::of("CS101-A"), OutcomeKind::LearningOutcome);
        assert_eq!(outcome_course("CS101-A"), Some("CS101"));
        assert_eq!(sample_item().outcome_kind(), OutcomeKind::LearningOutcome);
    }

    #[test]
    fn plain_outcomes_are_criteria() {
        assert_eq!(OutcomeKind::of("Professionalism"), OutcomeKind::Criterion);
        assert_eq!(outcome_course("Professionalism"), None);
    }

    #[test]
    fn bands_follow_expected_thresholds() {
        assert_eq!(ScoreBand::for_score(5.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(4.5), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(4.49), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(3.5), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(2.5), ScoreBand::Average);
        assert_eq!(ScoreBand::for_score(1.5), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(1.49), ScoreBand::Poor);
        assert_eq!(ScoreBand::for_score(0.0), ScoreBand::Poor);
    }

    #[test]
    fn bands_are_monotonic_over_the_score_range() {
        let mut previous = ScoreBand::for_score(0.0);
        for step in 0..=100 {
            let score = step as f64 * 0.05;
            let band = ScoreBand::for_score(score);
            assert!(band >= previous, "band dropped at score {score}");
            previous = band;
        }
    }

    #[test]
    fn weight_parsing_strips_the_multiplier_suffix() {
        assert_eq!(parse_weight("8x"), Some(8.0));
        assert_eq!(parse_weight("2.5x"), Some(2.5));
        assert_eq!(parse_weight("10"), Some(10.0));
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("x"), None);
        assert_eq!(parse_weight("heavy"), None);
    }

    #[test]
    fn weight_value_prefers_the_numeric_field() {
        let mut item = sample_item();
        assert_eq!(item.weight_value(), 8.0);

        item.weight_numeric = None;
        assert_eq!(item.weight_value(), 8.0);

        item.weight = String::new();
        assert_eq!(item.weight_value(), 1.0);
        assert_eq!(item.weight_label(), "1x");
    }

    #[test]
    fn created_on_accepts_the_known_timestamp_shapes() {
        let naive = parse_created_on("2024-09-15T10:30:00").expect("naive");
        assert_eq!(naive.to_string(), "2024-09-15 10:30:00");

        let with_micros = parse_created_on("2024-09-15T10:30:00.123456").expect("micros");
        assert_eq!(with_micros.date().to_string(), "2024-09-15");

        let spaced = parse_created_on("2024-09-15 10:30:00").expect("spaced");
        assert_eq!(spaced, naive);

        let date_only = parse_created_on("2024-09-15").expect("date");
        assert_eq!(date_only.to_string(), "2024-09-15 00:00:00");

        assert_eq!(parse_created_on("not a date"), None);
        assert_eq!(parse_created_on(""), None);
    }

    #[test]
    fn offset_timestamps_keep_their_own_wall_clock() {
        let parsed = parse_created_on("2024-09-15T10:30:00+02:00").expect("offset");
        assert_eq!(parsed.to_string(), "2024-09-15 10:30:00");
    }

    #[test]
    fn bullets_split_on_newlines_and_drop_markers() {
        let summary = AiSummary {
            outcome_name: "Professionalism".to_string(),
            outcome_id: Some(3),
            outcome_description: String::new(),
            strengths_text: "- Clear writing\n- Strong citations\n\n  - Good pacing".to_string(),
            improvement_text: "-- Needs more depth\nwell-structured but brief".to_string(),
            last_updated: String::new(),
        };

        assert_eq!(
            summary.strength_bullets(),
            vec!["Clear writing", "Strong citations", "Good pacing"]
        );
        assert_eq!(
            summary.improvement_bullets(),
            vec!["Needs more depth", "well-structured but brief"]
        );
    }

    #[test]
    fn first_summary_wins_on_duplicate_outcomes() {
        let first = AiSummary {
            outcome_name: "Professionalism".to_string(),
            outcome_id: Some(1),
            outcome_description: String::new(),
            strengths_text: "first".to_string(),
            improvement_text: String::new(),
            last_updated: String::new(),
        };
        let mut second = first.clone();
        second.outcome_id = Some(2);
        second.strengths_text = "second".to_string();

        let summaries = vec![first, second];
        let found = AiSummary::first_for(&summaries, "Professionalism").expect("summary");
        assert_eq!(found.outcome_id, Some(1));
        assert!(AiSummary::first_for(&summaries, "Leadership").is_none());
    }

    #[test]
    fn wire_payload_tolerates_missing_and_unknown_fields() {
        let payload = r#"[
            {"score": 4, "outcome_name": "CS101-A", "extra_field": true},
            {"comment": "solid", "course_code": "CS101"}
        ]"#;
        let items: Vec<FeedbackItem> = serde_json::from_str(payload).expect("parse");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].score, 4.0);
        assert_eq!(items[0].outcome_name, "CS101-A");
        assert_eq!(items[1].score, 0.0);
        assert!(items[1].outcome_name.is_empty());
        assert_eq!(items[1].weight_label(), "1x");
    }
}
