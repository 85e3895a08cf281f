//! Plain-text rendering of review snapshots

use fb_common::ReviewRecord;
use std::fmt::Write;

use crate::Snapshot;

const REVIEW_WIDTH: usize = 40;
const SUMMARY_WIDTH: usize = 40;

/// Table of reviews: Rating, Review, AI Summary, AI Action, Created At
pub fn render_table(reviews: &[ReviewRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6}  {:<rw$}  {:<sw$}  {:<9}  {}",
        "Rating",
        "Review",
        "AI Summary",
        "AI Action",
        "Created At",
        rw = REVIEW_WIDTH,
        sw = SUMMARY_WIDTH,
    );

    if reviews.is_empty() {
        out.push_str("No reviews found\n");
        return out;
    }

    for review in reviews {
        let _ = writeln!(
            out,
            "{:<6}  {:<rw$}  {:<sw$}  {:<9}  {}",
            review.rating,
            clip(&review.review, REVIEW_WIDTH),
            clip(or_na(&review.ai_summary), SUMMARY_WIDTH),
            review.ai_action.as_str(),
            review.created_at.format("%Y-%m-%d %H:%M:%S"),
            rw = REVIEW_WIDTH,
            sw = SUMMARY_WIDTH,
        );
    }

    out
}

/// Heading, optional error line, then the table
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = format!("Admin Dashboard - Reviews ({})\n", snapshot.reviews.len());

    if let Some(at) = snapshot.fetched_at {
        let _ = writeln!(out, "Updated {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "Error: {}", error);
    }

    out.push_str(&render_table(&snapshot.reviews));
    out
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Single line, at most `width` characters, `...` when cut
fn clip(value: &str, width: usize) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if flat.chars().count() <= width {
        flat
    } else {
        let mut cut: String = flat.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}
