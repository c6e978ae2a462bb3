use std::fmt::Write;

use chrono::Utc;

use crate::models::{AiSummary, CourseScore, FeedbackItem};
use crate::render;
use crate::stats;

pub fn build_report(
    selection: &str,
    items: &[FeedbackItem],
    official: &[CourseScore],
    summaries: &[AiSummary],
) -> String {
    let summary = stats::dataset_summary(items);
    let standings = stats::outcome_standings(items, None, false);
    let points = stats::monthly_trend(items);
    let buckets = stats::score_histogram(items);
    let courses = stats::course_comparisons(items, official);

    let mut output = String::new();

    let _ = writeln!(output, "# Feedback Dashboard Report");
    let _ = writeln!(
        output,
        "Generated {} for {}",
        Utc::now().date_naive(),
        selection
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "Average score {:.1} across {} responses in {} courses.",
        summary.average, summary.responses, summary.course_count
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Outcome Standings");

    if standings.is_empty() {
        let _ = writeln!(output, "No outcomes in this selection.");
    } else {
        for standing in standings.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} [{}] avg {:.2} across {} responses",
                standing.outcome_name,
                standing.kind.tag(),
                standing.average,
                standing.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Monthly Trend");

    if points.is_empty() {
        let _ = writeln!(output, "No dated feedback in this selection.");
    } else {
        for point in points.iter() {
            let _ = writeln!(
                output,
                "- {}: avg {:.2} ({} responses)",
                point.label(),
                point.average,
                point.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Score Distribution");

    for bucket in buckets.iter() {
        let _ = writeln!(
            output,
            "- {}: {} responses ({})",
            bucket.score,
            bucket.count,
            bucket.band().label()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Course Comparison");

    if courses.is_empty() {
        let _ = writeln!(output, "No courses in this selection.");
    } else {
        for course in courses.iter() {
            match course.official_score {
                Some(official_score) => {
                    let _ = writeln!(
                        output,
                        "- {}: avg {:.2} across {} responses (official {:.2})",
                        course.course_code, course.average, course.count, official_score
                    );
                }
                None => {
                    let _ = writeln!(
                        output,
                        "- {}: avg {:.2} across {} responses",
                        course.course_code, course.average, course.count
                    );
                }
            }
        }
        let _ = writeln!(
            output,
            "Reference average across courses: {:.2}",
            stats::reference_average(&courses)
        );
    }

    let mut commented: Vec<&FeedbackItem> = items
        .iter()
        .filter(|item| !item.comment.trim().is_empty())
        .collect();
    commented.sort_by(|a, b| b.created().cmp(&a.created()));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Comments");

    if commented.is_empty() {
        let _ = writeln!(output, "No comments in this selection.");
    } else {
        for item in commented.iter().take(5) {
            let date = item
                .created()
                .map(|created| created.date().to_string())
                .unwrap_or_else(|| "undated".to_string());
            let _ = writeln!(
                output,
                "- {} {} {:.1}: {}",
                date,
                item.outcome_name,
                item.score,
                render::truncate_comment(&item.comment)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## AI Summaries");

    if summaries.is_empty() {
        let _ = writeln!(output, "No AI summaries available.");
    } else {
        for summary in summaries.iter().take(3) {
            let _ = writeln!(output);
            let _ = writeln!(output, "### {}", summary.outcome_name);
            let _ = writeln!(output, "Strengths:");
            for bullet in summary.strength_bullets() {
                let _ = writeln!(output, "- {bullet}");
            }
            let _ = writeln!(output, "Areas for improvement:");
            for bullet in summary.improvement_bullets() {
                let _ = writeln!(output, "- {bullet}");
            }
        }
    }

    output
}
