use std::collections::HashSet;

use crate::models::FeedbackItem;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct FilterState {
    pub outcomes: HashSet<String>,
    pub courses: HashSet<String>,
    pub terms: HashSet<String>,
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            outcomes: HashSet::new(),
            courses: HashSet::new(),
            terms: HashSet::new(),
            min_score: MIN_SCORE,
            max_score: MAX_SCORE,
        }
    }
}

impl FilterState {
    pub fn new(
        outcomes: Vec<String>,
        courses: Vec<String>,
        terms: Vec<String>,
        min_score: f64,
        max_score: f64,
    ) -> FilterState {
        // An out-of-range bound resets to the domain edge. The min is
        // checked against the requested max before the max is accepted.
        let min = if min_score >= MIN_SCORE && min_score <= max_score {
            min_score
        } else {
            MIN_SCORE
        };
        let max = if max_score <= MAX_SCORE && max_score >= min {
            max_score
        } else {
            MAX_SCORE
        };

        FilterState {
            outcomes: outcomes.into_iter().collect(),
            courses: courses.into_iter().collect(),
            terms: terms.into_iter().collect(),
            min_score: min,
            max_score: max,
        }
    }

    pub fn matches(&self, item: &FeedbackItem) -> bool {
        (self.outcomes.is_empty() || self.outcomes.contains(&item.outcome_name))
            && (self.courses.is_empty() || self.courses.contains(&item.course_code))
            && (self.terms.is_empty() || self.terms.contains(&item.term_title))
            && item.score >= self.min_score
            && item.score <= self.max_score
    }

    pub fn apply(&self, items: &[FeedbackItem]) -> Vec<FeedbackItem> {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }

    pub fn is_default(&self) -> bool {
        self.outcomes.is_empty()
            && self.courses.is_empty()
            && self.terms.is_empty()
            && self.min_score == MIN_SCORE
            && self.max_score == MAX_SCORE
    }

    pub fn selection_label(&self) -> String {
        if self.outcomes.len() == 1 {
            self.outcomes.iter().next().cloned().unwrap_or_default()
        } else {
            "All Outcomes".to_string()
        }
    }

    pub fn sorted_outcomes(&self) -> Vec<String> {
        sorted(&self.outcomes)
    }

    pub fn sorted_courses(&self) -> Vec<String> {
        sorted(&self.courses)
    }

    pub fn sorted_terms(&self) -> Vec<String> {
        sorted(&self.terms)
    }
}

fn sorted(values: &HashSet<String>) -> Vec<String> {
    let mut list: Vec<String> = values.iter().cloned().collect();
    list.sort();
    list
}

pub fn unique_outcomes(items: &[FeedbackItem]) -> Vec<String> {
    unique_values(items, |item| item.outcome_name.as_str())
}

pub fn unique_courses(items: &[FeedbackItem]) -> Vec<String> {
    unique_values(items, |item| item.course_code.as_str())
}

pub fn unique_terms(items: &[FeedbackItem]) -> Vec<String> {
    unique_values(items, |item| item.term_title.as_str())
}

fn unique_values<F>(items: &[FeedbackItem], field: F) -> Vec<String>
where
    F: Fn(&FeedbackItem) -> &str,
{
    let mut values: Vec<String> = items
        .iter()
        .map(|item| field(item).to_string())
        .filter(|value| !value.is_empty())
        .collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(outcome: &str, course: &str, term: &str, score: f64) -> FeedbackItem {
        FeedbackItem {
            score,
            comment: String::new(),
            outcome_name: outcome.to_string(),
            assignment_title: "poll".to_string(),
            course_title: format!("{course} lectures"),
            course_code: course.to_string(),
            term_title: term.to_string(),
            created_on: "2024-09-15T10:30:00".to_string(),
            weight: "1x".to_string(),
            weight_numeric: Some(1.0),
        }
    }

    fn scores_of(items: &[FeedbackItem]) -> Vec<f64> {
        items.iter().map(|item| item.score).collect()
    }

    #[test]
    fn empty_selections_do_not_constrain() {
        let items = vec![
            sample_item("CS101-A", "CS101", "Fall 2024", 3.0),
            sample_item("Professionalism", "HUM200", "Spring 2025", 4.0),
        ];
        let state = FilterState::default();
        assert_eq!(state.apply(&items).len(), 2);
    }

    #[test]
    fn selections_apply_conjunctively() {
        let items = vec![
            sample_item("CS101-A", "CS101", "Fall 2024", 4.0),
            sample_item("CS101-A", "CS101", "Spring 2025", 4.0),
            sample_item("CS101-A", "HUM200", "Fall 2024", 4.0),
            sample_item("Professionalism", "CS101", "Fall 2024", 4.0),
        ];
        let state = FilterState::new(
            vec!["CS101-A".to_string()],
            vec!["CS101".to_string()],
            vec!["Fall 2024".to_string()],
            1.0,
            5.0,
        );

        let filtered = state.apply(&items);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].term_title, "Fall 2024");
    }

    #[test]
    fn score_range_is_inclusive_on_both_ends() {
        let items: Vec<FeedbackItem> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .map(|&score| sample_item("CS101-A", "CS101", "Fall 2024", score))
            .collect();
        let state = FilterState::new(Vec::new(), Vec::new(), Vec::new(), 3.0, 5.0);

        assert_eq!(scores_of(&state.apply(&items)), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = vec![
            sample_item("CS101-A", "CS101", "Fall 2024", 2.0),
            sample_item("CS101-B", "CS101", "Fall 2024", 4.0),
            sample_item("Professionalism", "HUM200", "Fall 2024", 5.0),
        ];
        let state = FilterState::new(Vec::new(), Vec::new(), Vec::new(), 3.0, 5.0);

        let once = state.apply(&items);
        let twice = state.apply(&once);
        assert_eq!(scores_of(&once), scores_of(&twice));
    }

    #[test]
    fn out_of_range_bounds_reset_to_the_edges() {
        let state = FilterState::new(Vec::new(), Vec::new(), Vec::new(), 0.0, 6.0);
        assert_eq!(state.min_score, 1.0);
        assert_eq!(state.max_score, 5.0);

        let kept = FilterState::new(Vec::new(), Vec::new(), Vec::new(), 3.0, 5.0);
        assert_eq!(kept.min_score, 3.0);
        assert_eq!(kept.max_score, 5.0);
    }

    #[test]
    fn inverted_bounds_reset_the_min_first() {
        let state = FilterState::new(Vec::new(), Vec::new(), Vec::new(), 4.0, 2.0);
        assert_eq!(state.min_score, 1.0);
        assert_eq!(state.max_score, 2.0);
    }

    #[test]
    fn unique_lists_are_sorted_and_skip_blanks() {
        let items = vec![
            sample_item("Professionalism", "HUM200", "Spring 2025", 4.0),
            sample_item("CS101-A", "CS101", "Fall 2024", 3.0),
            sample_item("CS101-A", "", "Fall 2024", 3.0),
            sample_item("", "CS101", "", 2.0),
        ];

        assert_eq!(unique_outcomes(&items), vec!["CS101-A", "Professionalism"]);
        assert_eq!(unique_courses(&items), vec!["CS101", "HUM200"]);
        assert_eq!(unique_terms(&items), vec!["Fall 2024", "Spring 2025"]);
    }

    #[test]
    fn selection_label_names_a_single_outcome() {
        let state = FilterState::new(
            vec!["CS101-A".to_string()],
            Vec::new(),
            Vec::new(),
            1.0,
            5.0,
        );
        assert_eq!(state.selection_label(), "CS101-A");
        assert_eq!(FilterState::default().selection_label(), "All Outcomes");
    }
}
