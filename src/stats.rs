use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};

use crate::models::{CourseScore, FeedbackItem, OutcomeKind, ScoreBand};

#[derive(Debug, Clone)]
pub struct GroupAverage {
    pub key: String,
    pub average: f64,
    pub count: usize,
}

pub fn group_and_average<F>(items: &[FeedbackItem], key_of: F) -> Vec<GroupAverage>
where
    F: Fn(&FeedbackItem) -> &str,
{
    let mut groups: HashMap<String, (usize, f64)> = HashMap::new();

    for item in items {
        let key = key_of(item);
        if key.is_empty() {
            continue;
        }
        let entry = groups.entry(key.to_string()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += item.score;
    }

    let mut averages: Vec<GroupAverage> = groups
        .into_iter()
        .map(|(key, (count, total))| GroupAverage {
            key,
            average: if count == 0 { 0.0 } else { total / count as f64 },
            count,
        })
        .collect();

    averages.sort_by(|a, b| a.key.cmp(&b.key));
    averages
}

#[derive(Debug, Clone)]
pub struct OutcomeStanding {
    pub outcome_name: String,
    pub kind: OutcomeKind,
    pub average: f64,
    pub count: usize,
}

pub fn outcome_standings(
    items: &[FeedbackItem],
    kind: Option<OutcomeKind>,
    strongest_first: bool,
) -> Vec<OutcomeStanding> {
    let mut standings: Vec<OutcomeStanding> =
        group_and_average(items, |item| item.outcome_name.as_str())
            .into_iter()
            .map(|group| OutcomeStanding {
                kind: OutcomeKind::of(&group.key),
                outcome_name: group.key,
                average: group.average,
                count: group.count,
            })
            .filter(|standing| kind.map_or(true, |wanted| standing.kind == wanted))
            .collect();

    if strongest_first {
        standings.sort_by(|a, b| {
            b.average
                .partial_cmp(&a.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    } else {
        standings.sort_by(|a, b| {
            a.average
                .partial_cmp(&b.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    standings
}

#[derive(Debug, Clone)]
pub struct CourseComparison {
    pub course_code: String,
    pub average: f64,
    pub count: usize,
    pub official_score: Option<f64>,
}

pub fn course_comparisons(
    items: &[FeedbackItem],
    official: &[CourseScore],
) -> Vec<CourseComparison> {
    group_and_average(items, |item| item.course_code.as_str())
        .into_iter()
        .map(|group| {
            let official_score = official
                .iter()
                .find(|score| score.course_code == group.key)
                .map(|score| score.course_score);
            CourseComparison {
                course_code: group.key,
                average: group.average,
                count: group.count,
                official_score,
            }
        })
        .collect()
}

pub fn reference_average(courses: &[CourseComparison]) -> f64 {
    if courses.is_empty() {
        return 0.0;
    }
    courses.iter().map(|course| course.average).sum::<f64>() / courses.len() as f64
}

#[derive(Debug, Clone)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub average: f64,
    pub count: usize,
}

impl MonthlyPoint {
    pub fn label(&self) -> String {
        self.month.format("%b %Y").to_string()
    }
}

pub fn monthly_trend(items: &[FeedbackItem]) -> Vec<MonthlyPoint> {
    let mut months: HashMap<NaiveDate, (usize, f64)> = HashMap::new();

    for item in items {
        let Some(created) = item.created() else {
            continue;
        };
        let date = created.date();
        let Some(month) = NaiveDate::from_ymd_opt(date.year(), date.month(), 1) else {
            continue;
        };
        let entry = months.entry(month).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += item.score;
    }

    let mut points: Vec<MonthlyPoint> = months
        .into_iter()
        .map(|(month, (count, total))| MonthlyPoint {
            month,
            average: if count == 0 { 0.0 } else { total / count as f64 },
            count,
        })
        .collect();

    points.sort_by(|a, b| a.month.cmp(&b.month));
    points
}

#[derive(Debug, Clone)]
pub struct ScoreBucket {
    pub score: u32,
    pub count: usize,
}

impl ScoreBucket {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score as f64)
    }
}

pub fn score_histogram(items: &[FeedbackItem]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; 5];

    for item in items {
        let rounded = item.score.round();
        if (1.0..=5.0).contains(&rounded) {
            counts[rounded as usize - 1] += 1;
        }
    }

    (1..=5)
        .map(|score| ScoreBucket {
            score,
            count: counts[score as usize - 1],
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub average: f64,
    pub responses: usize,
    pub course_count: usize,
}

pub fn dataset_summary(items: &[FeedbackItem]) -> DatasetSummary {
    let responses = items.len();
    let total: f64 = items.iter().map(|item| item.score).sum();
    let courses: HashSet<&str> = items
        .iter()
        .map(|item| item.course_code.as_str())
        .filter(|code| !code.is_empty())
        .collect();

    DatasetSummary {
        average: if responses == 0 {
            0.0
        } else {
            total / responses as f64
        },
        responses,
        course_count: courses.len(),
    }
}
