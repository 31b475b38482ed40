//! Markdown KPI report over stored feedback.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use feedsent_core::{summarize, FeedbackFilters, FeedbackSummary, SentimentLabel};

/// Filters for `report`. Lists accept repeated flags or comma-separated values.
#[derive(Debug, Default, Args)]
pub struct ReportArgs {
    /// Restrict to these language codes
    #[arg(long, value_delimiter = ',')]
    pub language: Vec<String>,
    /// Restrict to these sentiment labels
    #[arg(long, value_delimiter = ',', value_parser = crate::parse_label)]
    pub sentiment: Vec<SentimentLabel>,
    /// Minimum rating, inclusive
    #[arg(long)]
    pub rating_min: Option<f64>,
    /// Maximum rating, inclusive
    #[arg(long)]
    pub rating_max: Option<f64>,
    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::parse_date)]
    pub from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::parse_date)]
    pub to: Option<NaiveDate>,
}

impl ReportArgs {
    pub(crate) fn filters(&self) -> anyhow::Result<FeedbackFilters> {
        let rating_range = match (self.rating_min, self.rating_max) {
            (None, None) => None,
            (min, max) => {
                let min = min.unwrap_or(f64::MIN);
                let max = max.unwrap_or(f64::MAX);
                if min > max {
                    anyhow::bail!("--rating-min {min} is greater than --rating-max {max}");
                }
                Some((min, max))
            }
        };

        let date_range = match (self.from, self.to) {
            (None, None) => None,
            (from, to) => {
                let from = from
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map_or(DateTime::UNIX_EPOCH, |t| t.and_utc());
                let to = to
                    .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
                    .map_or_else(Utc::now, |t| t.and_utc());
                if from > to {
                    anyhow::bail!("--from is after --to");
                }
                Some((from, to))
            }
        };

        Ok(FeedbackFilters {
            languages: self.language.clone(),
            sentiments: self.sentiment.clone(),
            rating_range,
            date_range,
        })
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.language.is_empty() {
            parts.push(format!("language={}", self.language.join(",")));
        }
        if !self.sentiment.is_empty() {
            let labels: Vec<&str> = self.sentiment.iter().map(|s| s.as_str()).collect();
            parts.push(format!("sentiment={}", labels.join(",")));
        }
        if let Some(min) = self.rating_min {
            parts.push(format!("rating>={min}"));
        }
        if let Some(max) = self.rating_max {
            parts.push(format!("rating<={max}"));
        }
        if let Some(from) = self.from {
            parts.push(format!("from={from}"));
        }
        if let Some(to) = self.to {
            parts.push(format!("to={to}"));
        }
        if parts.is_empty() {
            "All feedback".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Print a markdown KPI report for feedback matching `args`.
///
/// # Errors
///
/// Returns an error if the filters are inconsistent or the query fails.
pub(crate) async fn run_report(pool: &sqlx::PgPool, args: &ReportArgs) -> anyhow::Result<()> {
    let filters = args.filters()?;
    let records = feedsent_db::list_feedback(pool, &filters, None).await?;
    tracing::debug!(rows = records.len(), filter = %args.describe(), "loaded feedback for report");

    if records.is_empty() {
        println!("{}", empty_report_message(&filters));
        return Ok(());
    }

    let now = Utc::now();
    let summary = summarize(&records, now);
    print!("{}", render_report(&summary, &args.describe(), now));
    Ok(())
}

fn empty_report_message(filters: &FeedbackFilters) -> &'static str {
    if filters.is_empty() {
        "no feedback has been recorded yet"
    } else {
        "no feedback matches the given filters"
    }
}

fn signed(value: f64) -> String {
    format!("{value:+.2}%")
}

/// Render `summary` as markdown.
pub(crate) fn render_report(
    summary: &FeedbackSummary,
    filter_label: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let counts = &summary.sentiment_counts;
    let trends = &summary.trends;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# Feedback Report");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Generated**: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "**Filter**: {filter_label}");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Overview");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Value | Week over week |");
    let _ = writeln!(out, "|--------|-------|----------------|");
    let _ = writeln!(
        out,
        "| Comments | {} | {} |",
        summary.total_comments,
        signed(trends.total_comments)
    );
    let _ = writeln!(
        out,
        "| Average rating | {:.2} | {} |",
        summary.avg_rating,
        signed(trends.avg_rating)
    );
    let _ = writeln!(out, "| Minimum rating | {} | |", summary.min_rating);
    let _ = writeln!(out, "| Top-rated comments | {} | |", summary.top_rating_count);
    let _ = writeln!(out, "| Unique users | {} | |", summary.unique_users);
    let _ = writeln!(
        out,
        "| Comments with emoji | {} | |",
        summary.emoji_comment_count
    );
    if let Some(hour) = summary.peak_hour {
        let _ = writeln!(out, "| Peak hour | {hour:02}:00 | |");
    }
    if let Some(language) = &summary.dominant_language {
        let _ = writeln!(
            out,
            "| Dominant language | {} ({}) | |",
            language.term, language.count
        );
    }
    let _ = writeln!(
        out,
        "| Hours between comments | {:.2} | |",
        summary.avg_hours_between
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Sentiment");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Sentiment | Count | Week over week |");
    let _ = writeln!(out, "|-----------|-------|----------------|");
    for (label, count, trend) in [
        (SentimentLabel::Positive, counts.positive, trends.positive),
        (SentimentLabel::Neutral, counts.neutral, trends.neutral),
        (SentimentLabel::Negative, counts.negative, trends.negative),
    ] {
        let _ = writeln!(out, "| {label} | {count} | {} |", signed(trend));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Ratings");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Rating | Count |");
    let _ = writeln!(out, "|--------|-------|");
    for bucket in &summary.rating_distribution {
        let _ = writeln!(out, "| {} | {} |", bucket.rating, bucket.count);
    }

    if !summary.top_emojis.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Top emoji");
        let _ = writeln!(out);
        for emoji in &summary.top_emojis {
            let _ = writeln!(out, "- {} x{}", emoji.term, emoji.count);
        }
    }

    if !summary.top_words.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Top words");
        let _ = writeln!(out);
        let words: Vec<String> = summary
            .top_words
            .iter()
            .map(|w| format!("{} ({})", w.term, w.count))
            .collect();
        let _ = writeln!(out, "{}", words.join(", "));
    }

    out
}
