use crate::analysis::rankings::top_by_win_rate;
use crate::api::client::{GatewayExt, StatsGateway};
use crate::api::models::{MatchRecord, Role};
use crate::pipeline::normalize::{as_rows, round_to};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const GOLD_BUCKET_WIDTH: f64 = 500.0;
pub const TOP_CHAMPIONS: usize = 15;
pub const TABLE_ROWS: usize = 50;
pub const DEFAULT_MATCH_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionWinRate {
    pub champion: String,
    pub games: u64,
    pub wins: u64,
    /// Percentage in [0, 100], two decimals.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    pub total: u64,
    pub wins: u64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchesView {
    pub summary: MatchSummary,
    pub top_win_rates: Vec<ChampionWinRate>,
    pub gold_14_histogram: Vec<Bucket>,
    pub recent: Vec<MatchRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilter {
    pub champion: Option<String>,
    pub role: Option<Role>,
    pub limit: Option<u32>,
}

/// Normalized records; rows without a champion or a win field are dropped.
pub fn normalize_matches(body: &Value) -> Vec<MatchRecord> {
    let rows = as_rows(body);
    let records: Vec<MatchRecord> = rows.iter().filter_map(MatchRecord::from_row).collect();
    if records.len() < rows.len() {
        debug!(dropped = rows.len() - records.len(), "dropped incomplete match rows");
    }
    records
}

fn percentage(wins: u64, games: u64) -> f64 {
    if games == 0 {
        return 0.0;
    }
    round_to(wins as f64 / games as f64 * 100.0, 2).clamp(0.0, 100.0)
}

/// Per-champion wins and games, in first-seen order.
pub fn fold_win_rates(matches: &[MatchRecord]) -> Vec<ChampionWinRate> {
    let mut order: Vec<&str> = Vec::new();
    let mut counters: HashMap<&str, (u64, u64)> = HashMap::new();

    for record in matches {
        let counter = counters.entry(record.champion.as_str()).or_insert_with(|| {
            order.push(record.champion.as_str());
            (0, 0)
        });
        counter.1 += 1;
        if record.win {
            counter.0 += 1;
        }
    }

    order
        .into_iter()
        .map(|champion| {
            let (wins, games) = counters[champion];
            let wins = wins.min(games);
            ChampionWinRate {
                champion: champion.to_string(),
                games,
                wins,
                win_rate: percentage(wins, games),
            }
        })
        .collect()
}

// Bucket indices stay well inside i64 so `index + 1` cannot overflow.
const MAX_BUCKET_INDEX: f64 = (1u64 << 53) as f64;

/// Count values per `width`-sized bucket, ascending. Missing and
/// non-finite values are skipped, as are values too large to bucket.
pub fn histogram<I>(values: I, width: f64) -> Vec<Bucket>
where
    I: IntoIterator<Item = Option<f64>>,
{
    if !(width.is_finite() && width > 0.0) {
        return Vec::new();
    }

    let mut counts: HashMap<i64, u64> = HashMap::new();
    for value in values.into_iter().flatten().filter(|v| v.is_finite()) {
        let index = (value / width).floor();
        if index.abs() > MAX_BUCKET_INDEX {
            debug!(value, "value out of histogram range");
            continue;
        }
        *counts.entry(index as i64).or_insert(0) += 1;
    }

    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(index, count)| Bucket {
            lower: index as f64 * width,
            upper: (index + 1) as f64 * width,
            count,
        })
        .collect();
    buckets.sort_by(|a, b| a.lower.total_cmp(&b.lower));
    buckets
}

pub fn summarize(matches: &[MatchRecord]) -> MatchSummary {
    let total = matches.len() as u64;
    let wins = matches.iter().filter(|m| m.win).count() as u64;
    MatchSummary {
        total,
        wins,
        win_rate: percentage(wins, total),
    }
}

/// Highest win rates first; ties keep first-seen order.
pub fn top_win_rates(rates: Vec<ChampionWinRate>, n: usize) -> Vec<ChampionWinRate> {
    top_by_win_rate(rates, n, |rate| rate.win_rate)
}

pub fn build_matches_view(matches: Vec<MatchRecord>) -> MatchesView {
    let summary = summarize(&matches);
    let top = top_win_rates(fold_win_rates(&matches), TOP_CHAMPIONS);
    let gold = histogram(matches.iter().map(|m| m.gold_14), GOLD_BUCKET_WIDTH);
    let recent = matches.into_iter().take(TABLE_ROWS).collect();

    MatchesView {
        summary,
        top_win_rates: top,
        gold_14_histogram: gold,
        recent,
    }
}

/// Fetch and shape the match list. A failed request yields an empty view.
pub fn load_matches_view<G>(gateway: &G, filter: &MatchFilter) -> MatchesView
where
    G: StatsGateway + ?Sized,
{
    let limit = filter.limit.unwrap_or(DEFAULT_MATCH_LIMIT);
    match gateway.matches(filter.champion.as_deref(), filter.role, Some(limit)) {
        Ok(body) => build_matches_view(normalize_matches(&body)),
        Err(err) => {
            warn!(error = %err, "matches unavailable");
            MatchesView::default()
        }
    }
}

/// Matches of one champion: all, best or worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChampionMatchesKind {
    All,
    Best,
    Worst,
}

pub fn load_champion_matches<G>(
    gateway: &G,
    champion: &str,
    kind: ChampionMatchesKind,
    limit: Option<u32>,
) -> Vec<MatchRecord>
where
    G: StatsGateway + ?Sized,
{
    let response = match kind {
        ChampionMatchesKind::All => gateway.champion_matches(champion, limit),
        ChampionMatchesKind::Best => gateway.champion_best_matches(champion, limit),
        ChampionMatchesKind::Worst => gateway.champion_worst_matches(champion, limit),
    };
    match response {
        Ok(body) => normalize_matches(&body),
        Err(err) => {
            warn!(champion, error = %err, "champion matches unavailable");
            Vec::new()
        }
    }
}

/// A single match, if the gateway has it and it is well-formed.
pub fn load_match<G>(gateway: &G, match_id: &str) -> Option<MatchRecord>
where
    G: StatsGateway + ?Sized,
{
    match gateway.match_by_id(match_id) {
        // Some deployments wrap the match in a one-element list.
        Ok(Value::Array(rows)) => rows.first().and_then(MatchRecord::from_row),
        Ok(body) => MatchRecord::from_row(&body),
        Err(err) => {
            warn!(match_id, error = %err, "match unavailable");
            None
        }
    }
}
