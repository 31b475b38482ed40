//! KPI projection over feedback rows for the reporting dashboard.
//!
//! Pure aggregation: callers fetch rows (already filtered) and pass them in
//! together with the reference time used for week-over-week trends.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::feedback::{FeedbackRecord, SentimentLabel};

const TOP_WORDS: usize = 20;
const TOP_EMOJIS: usize = 3;
const TREND_CAP: f64 = 99.99;
const HOURS_PER_WEEK: f64 = 24.0 * 7.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    fn from_records<'a>(records: impl Iterator<Item = &'a FeedbackRecord>) -> Self {
        let mut counts = Self::default();
        for label in records.filter_map(|r| r.sentiment) {
            match label {
                SentimentLabel::Positive => counts.positive += 1,
                SentimentLabel::Neutral => counts.neutral += 1,
                SentimentLabel::Negative => counts.negative += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub rating: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRatingCell {
    pub sentiment: SentimentLabel,
    pub rating: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
    pub cumulative: usize,
}

/// Week-over-week change percentages, each clamped to +/-99.99.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trends {
    pub total_comments: f64,
    pub avg_rating: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub top_rating_count: f64,
    pub min_rating: f64,
    pub avg_hours_between: f64,
    pub avg_hourly_frequency: f64,
    pub unique_users: f64,
    pub emoji_comment_count: f64,
}

/// Scalar KPIs of one window of rows. Every field is zero for an empty window.
#[derive(Debug, Clone, Default, PartialEq)]
struct Headline {
    total_comments: usize,
    avg_rating: f64,
    min_rating: f64,
    top_rating_count: usize,
    sentiment_counts: SentimentCounts,
    avg_hours_between: f64,
    avg_hourly_frequency: f64,
    unique_users: usize,
    emoji_comment_count: usize,
}

impl Headline {
    fn of(records: &[&FeedbackRecord]) -> Self {
        let ratings: Vec<f64> = records.iter().map(|r| r.rating).collect();
        let min_rating = ratings.iter().copied().reduce(f64::min).unwrap_or(0.0);
        let top_rating_count = ratings
            .iter()
            .copied()
            .reduce(f64::max)
            .map_or(0, |max| {
                ratings
                    .iter()
                    .filter(|r| r.total_cmp(&max).is_eq())
                    .count()
            });

        let mut timestamps: Vec<DateTime<Utc>> = records.iter().map(|r| r.timestamp).collect();
        timestamps.sort_unstable();
        let gaps: Vec<f64> = timestamps
            .windows(2)
            .map(|w| hours_between(w[0], w[1]))
            .collect();

        Self {
            total_comments: records.len(),
            avg_rating: mean(&ratings),
            min_rating,
            top_rating_count,
            sentiment_counts: SentimentCounts::from_records(records.iter().copied()),
            avg_hours_between: mean(&gaps),
            avg_hourly_frequency: hourly_frequency(records.len()),
            unique_users: records
                .iter()
                .filter_map(|r| r.unique_code.as_deref())
                .collect::<HashSet<_>>()
                .len(),
            emoji_comment_count: records
                .iter()
                .filter_map(|r| r.comment.as_deref())
                .filter(|c| c.chars().any(is_emoji))
                .count(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn change_from(&self, previous: &Headline) -> Trends {
        let count =
            |current: usize, previous: usize| percent_change(current as f64, previous as f64);
        let now = &self.sentiment_counts;
        let before = &previous.sentiment_counts;
        Trends {
            total_comments: count(self.total_comments, previous.total_comments),
            avg_rating: percent_change(self.avg_rating, previous.avg_rating),
            positive: count(now.positive, before.positive),
            neutral: count(now.neutral, before.neutral),
            negative: count(now.negative, before.negative),
            top_rating_count: count(self.top_rating_count, previous.top_rating_count),
            min_rating: percent_change(self.min_rating, previous.min_rating),
            avg_hours_between: percent_change(self.avg_hours_between, previous.avg_hours_between),
            avg_hourly_frequency: percent_change(
                self.avg_hourly_frequency,
                previous.avg_hourly_frequency,
            ),
            unique_users: count(self.unique_users, previous.unique_users),
            emoji_comment_count: count(self.emoji_comment_count, previous.emoji_comment_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub total_comments: usize,
    pub avg_rating: f64,
    pub min_rating: f64,
    pub top_rating_count: usize,
    pub sentiment_counts: SentimentCounts,
    pub rating_distribution: Vec<RatingBucket>,
    pub sentiment_by_rating: Vec<SentimentRatingCell>,
    pub peak_hour: Option<u32>,
    pub dominant_language: Option<TermCount>,
    pub unique_users: usize,
    pub emoji_comment_count: usize,
    pub top_emojis: Vec<TermCount>,
    pub top_words: Vec<TermCount>,
    pub daily_counts: Vec<DailyCount>,
    pub avg_hours_between: f64,
    pub avg_hourly_frequency: f64,
    pub trends: Trends,
}

/// Compute dashboard KPIs for `records`.
///
/// Trends compare the full set against the rows older than `now - 7 days`,
/// using unrounded values on both sides.
#[must_use]
pub fn summarize(records: &[FeedbackRecord], now: DateTime<Utc>) -> FeedbackSummary {
    let all: Vec<&FeedbackRecord> = records.iter().collect();
    let current = Headline::of(&all);

    let cutoff = now - Duration::days(7);
    let previous: Vec<&FeedbackRecord> = all
        .iter()
        .copied()
        .filter(|r| r.timestamp < cutoff)
        .collect();
    let trends = current.change_from(&Headline::of(&previous));

    let ratings: Vec<f64> = records.iter().map(|r| r.rating).collect();
    let rating_distribution = histogram(&ratings)
        .into_iter()
        .map(|(rating, count)| RatingBucket { rating, count })
        .collect();

    let sentiment_by_rating = SentimentLabel::ALL
        .iter()
        .flat_map(|&label| {
            let labeled: Vec<f64> = records
                .iter()
                .filter(|r| r.sentiment == Some(label))
                .map(|r| r.rating)
                .collect();
            histogram(&labeled)
                .into_iter()
                .map(move |(rating, count)| SentimentRatingCell {
                    sentiment: label,
                    rating,
                    count,
                })
        })
        .collect();

    let peak_hour = most_common(records.iter().map(|r| r.timestamp.hour()), 1)
        .into_iter()
        .next()
        .map(|(hour, _)| hour);

    let dominant_language = most_common(
        records.iter().filter_map(|r| r.language.clone()),
        1,
    )
    .into_iter()
    .next()
    .map(|(term, count)| TermCount { term, count });

    let comments: Vec<&str> = records.iter().filter_map(|r| r.comment.as_deref()).collect();
    let top_emojis = to_term_counts(most_common(
        comments
            .iter()
            .flat_map(|c| c.chars().filter(|ch| is_emoji(*ch)))
            .map(String::from),
        TOP_EMOJIS,
    ));
    let top_words = to_term_counts(most_common(
        comments
            .iter()
            .flat_map(|c| c.split_whitespace())
            .map(str::to_lowercase),
        TOP_WORDS,
    ));

    let daily_counts = daily_counts(records);

    FeedbackSummary {
        total_comments: current.total_comments,
        avg_rating: round2(current.avg_rating),
        min_rating: current.min_rating,
        top_rating_count: current.top_rating_count,
        sentiment_counts: current.sentiment_counts,
        rating_distribution,
        sentiment_by_rating,
        peak_hour,
        dominant_language,
        unique_users: current.unique_users,
        emoji_comment_count: current.emoji_comment_count,
        top_emojis,
        top_words,
        daily_counts,
        avg_hours_between: round2(current.avg_hours_between),
        avg_hourly_frequency: round2(current.avg_hourly_frequency),
        trends,
    }
}

/// Relative change in percent, clamped to +/-99.99.
///
/// A zero baseline has no meaningful ratio: any growth reports the cap and
/// an empty current period reports the negative cap.
#[must_use]
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 {
            TREND_CAP
        } else if current == 0.0 {
            -TREND_CAP
        } else {
            0.0
        };
    }
    let change = (current - previous) / previous.abs() * 100.0;
    change.clamp(-TREND_CAP, TREND_CAP)
}

/// Characters counted as emoji by the dashboard.
#[must_use]
pub fn is_emoji(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F600..=0x1F64F
            | 0x1F300..=0x1F5FF
            | 0x1F680..=0x1F6FF
            | 0x1F700..=0x1F7FF
            | 0x1F800..=0x1F8FF
            | 0x1F900..=0x1F9FF
            | 0x1FA00..=0x1FAFF
            | 0x1F1E6..=0x1F1FF
            | 0x2600..=0x26FF
            | 0x2702..=0x27B0
    )
}

fn daily_counts(records: &[FeedbackRecord]) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.timestamp.date_naive()).or_default() += 1;
    }

    let mut cumulative = 0;
    per_day
        .into_iter()
        .map(|(date, count)| {
            cumulative += count;
            DailyCount {
                date,
                count,
                cumulative,
            }
        })
        .collect()
}

/// Group equal values, ordered by value ascending.
fn histogram(values: &[f64]) -> Vec<(f64, usize)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut buckets: Vec<(f64, usize)> = Vec::new();
    for value in sorted {
        match buckets.last_mut() {
            Some((last, count)) if last.total_cmp(&value).is_eq() => *count += 1,
            _ => buckets.push((value, 1)),
        }
    }
    buckets
}

/// The `limit` most frequent items, count descending then item ascending.
fn most_common<T, I>(items: I, limit: usize) -> Vec<(T, usize)>
where
    T: std::hash::Hash + Eq + Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }
    let mut ranked: Vec<(T, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

fn to_term_counts(ranked: Vec<(String, usize)>) -> Vec<TermCount> {
    ranked
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = values.len() as f64;
    values.iter().sum::<f64>() / denom
}

#[allow(clippy::cast_precision_loss)]
fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / 3600.0
}

#[allow(clippy::cast_precision_loss)]
fn hourly_frequency(total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        total as f64 / HOURS_PER_WEEK
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
