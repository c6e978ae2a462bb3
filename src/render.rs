use crate::filter::{self, FilterState};
use crate::models::{
    outcome_course, score_description, AiSummary, CourseScore, FeedbackItem, OutcomeKind,
    ScoreBand,
};
use crate::stats::{
    self, CourseComparison, DatasetSummary, MonthlyPoint, OutcomeStanding, ScoreBucket,
};

const COMMENT_PREVIEW_CHARS: usize = 150;
const BAR_WIDTH: usize = 30;

pub fn print_overview(filters: &FilterState, items: &[FeedbackItem], official: &[CourseScore]) {
    print_summary(&filters.selection_label(), &stats::dataset_summary(items));

    println!();
    println!("Outcome standings (weakest first):");
    print_standings(&stats::outcome_standings(items, None, false), 10);

    println!();
    println!("Monthly trend:");
    print_trend(&stats::monthly_trend(items));

    println!();
    println!("Score distribution:");
    print_histogram(&stats::score_histogram(items));

    println!();
    println!("Course comparison:");
    print_courses(&stats::course_comparisons(items, official));

    println!();
    println!("Recent feedback:");
    print_feedback(items, 10, false, false);
}

pub fn print_summary(label: &str, summary: &DatasetSummary) {
    let band = ScoreBand::for_score(summary.average);
    println!(
        "Average score for {label}: {:.1} ({})",
        summary.average,
        band.label()
    );
    println!(
        "Based on {} responses across {} courses",
        summary.responses, summary.course_count
    );
    println!(
        "Grade scale: 4.5+ {} | 3.5+ {} | 2.5+ {} | 1.5+ {} | below 1.5 {}",
        ScoreBand::Excellent.label(),
        ScoreBand::Good.label(),
        ScoreBand::Average.label(),
        ScoreBand::Fair.label(),
        ScoreBand::Poor.label()
    );
}

pub fn print_standings(standings: &[OutcomeStanding], limit: usize) {
    if standings.is_empty() {
        println!("No outcomes to rank.");
        return;
    }
    for standing in standings.iter().take(limit) {
        println!(
            "- {} {} avg {:.2} across {} responses",
            standing.outcome_name,
            kind_tag(standing),
            standing.average,
            standing.count
        );
    }
}

fn kind_tag(standing: &OutcomeStanding) -> String {
    match standing.kind {
        OutcomeKind::Criterion => "[HC]".to_string(),
        OutcomeKind::LearningOutcome => match outcome_course(&standing.outcome_name) {
            Some(code) if !code.is_empty() => format!("[LO {code}]"),
            _ => "[LO]".to_string(),
        },
    }
}

pub fn print_trend(points: &[MonthlyPoint]) {
    if points.is_empty() {
        println!("No dated feedback to plot.");
        return;
    }
    for point in points {
        println!(
            "- {}: avg {:.2} ({} responses)",
            point.label(),
            point.average,
            point.count
        );
    }
}

pub fn print_histogram(buckets: &[ScoreBucket]) {
    let max = buckets.iter().map(|bucket| bucket.count).max().unwrap_or(0);
    for bucket in buckets {
        let bar_len = if max == 0 || bucket.count == 0 {
            0
        } else {
            (bucket.count * BAR_WIDTH / max).max(1)
        };
        println!(
            "{} {:<22} {:<width$} {} ({})",
            bucket.score,
            score_description(bucket.score),
            "█".repeat(bar_len),
            bucket.count,
            bucket.band().label(),
            width = BAR_WIDTH
        );
    }
}

pub fn print_courses(courses: &[CourseComparison]) {
    if courses.is_empty() {
        println!("No courses in the current selection.");
        return;
    }
    for course in courses {
        match course.official_score {
            Some(official) => println!(
                "- {}: avg {:.2} across {} responses (official {:.2}, diff {:+.2})",
                course.course_code,
                course.average,
                course.count,
                official,
                course.average - official
            ),
            None => println!(
                "- {}: avg {:.2} across {} responses",
                course.course_code, course.average, course.count
            ),
        }
    }
    println!(
        "Reference average across courses: {:.2}",
        stats::reference_average(courses)
    );
}

pub fn print_feedback(items: &[FeedbackItem], limit: usize, oldest_first: bool, full_comments: bool) {
    if items.is_empty() {
        println!("No feedback in the current selection.");
        return;
    }

    let mut ordered = items.to_vec();
    if oldest_first {
        ordered.sort_by(|a, b| a.created().cmp(&b.created()));
    } else {
        ordered.sort_by(|a, b| b.created().cmp(&a.created()));
    }

    for item in ordered.iter().take(limit) {
        let date = item
            .created()
            .map(|created| created.date().to_string())
            .unwrap_or_else(|| "undated".to_string());
        let comment = if full_comments {
            item.comment.clone()
        } else {
            truncate_comment(&item.comment)
        };
        println!(
            "- {} | {} {:.1} | {} ({}) | weight {} | {}",
            date,
            item.outcome_name,
            item.score,
            assignment_display(&item.assignment_title),
            item.course_code,
            item.weight_label(),
            if comment.is_empty() {
                "(no comment)"
            } else {
                comment.as_str()
            }
        );
    }
}

pub fn assignment_display(raw: &str) -> &str {
    match raw {
        "poll" => "Poll",
        "video" => "Class Recording",
        "preclass_assignment" => "Pre-Class Work",
        other => other,
    }
}

pub fn truncate_comment(comment: &str) -> String {
    if comment.chars().count() <= COMMENT_PREVIEW_CHARS {
        return comment.to_string();
    }
    let preview: String = comment.chars().take(COMMENT_PREVIEW_CHARS).collect();
    format!("{preview}...")
}

pub fn print_ai_summary(summary: &AiSummary) {
    println!("{}", summary.outcome_name);
    if !summary.outcome_description.is_empty() {
        println!("{}", summary.outcome_description);
    }

    println!("Strengths:");
    let strengths = summary.strength_bullets();
    if strengths.is_empty() {
        println!("  (none listed)");
    } else {
        for bullet in strengths {
            println!("  - {bullet}");
        }
    }

    println!("Areas for improvement:");
    let improvements = summary.improvement_bullets();
    if improvements.is_empty() {
        println!("  (none listed)");
    } else {
        for bullet in improvements {
            println!("  - {bullet}");
        }
    }

    if !summary.last_updated.is_empty() {
        println!("Last updated: {}", summary.last_updated);
    }
}

pub fn print_missing_summary(outcome_name: &str) {
    println!("No summary available for {outcome_name} yet.");
}

pub fn print_filter_options(items: &[FeedbackItem]) {
    print_value_list("Outcomes", &filter::unique_outcomes(items));
    println!();
    print_value_list("Courses", &filter::unique_courses(items));
    println!();
    print_value_list("Terms", &filter::unique_terms(items));
}

fn print_value_list(label: &str, values: &[String]) {
    println!("{label}:");
    if values.is_empty() {
        println!("  (none)");
        return;
    }
    for value in values {
        println!("- {value}");
    }
}

pub fn print_fetch_error(err: &anyhow::Error) {
    println!("Could not load data from the feedback API.");
    println!("  {err:#}");
    println!("Check that the API is running, or reset your filters and try again.");
}

pub fn print_no_data(unfiltered: bool) {
    if unfiltered {
        println!("No feedback available yet.");
    } else {
        println!("No feedback matches the current filters.");
    }
}
