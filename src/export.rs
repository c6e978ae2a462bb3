use std::path::Path;

use anyhow::{Context, Result};

use crate::stats::{CourseComparison, MonthlyPoint, OutcomeStanding, ScoreBucket};

pub fn save_download(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

pub fn write_trend_csv(path: &Path, points: &[MonthlyPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["Month", "Average Score", "Responses"])?;
    for point in points {
        writer.write_record([
            point.label(),
            format!("{:.2}", point.average),
            point.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_histogram_csv(path: &Path, buckets: &[ScoreBucket]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["Score", "Band", "Color", "Count"])?;
    for bucket in buckets {
        let band = bucket.band();
        writer.write_record([
            bucket.score.to_string(),
            band.label().to_string(),
            band.color().to_string(),
            bucket.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_standings_csv(path: &Path, standings: &[OutcomeStanding]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["Outcome Name", "Type", "Average Score", "Responses"])?;
    for standing in standings {
        writer.write_record([
            standing.outcome_name.clone(),
            standing.kind.tag().to_string(),
            format!("{:.2}", standing.average),
            standing.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_courses_csv(path: &Path, courses: &[CourseComparison]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["Course Code", "Average Score", "Responses", "Official Score"])?;
    for course in courses {
        let official = course
            .official_score
            .map(|score| format!("{score:.2}"))
            .unwrap_or_default();
        writer.write_record([
            course.course_code.clone(),
            format!("{:.2}", course.average),
            course.count.to_string(),
            official,
        ])?;
    }
    writer.flush()?;
    Ok(())
}
