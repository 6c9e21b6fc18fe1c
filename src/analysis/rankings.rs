use crate::api::client::{GatewayExt, StatsGateway};
use crate::api::models::{KdaRankingEntry, Role};
use crate::pipeline::normalize::{as_rows, round_to};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::warn;

pub const DEFAULT_MIN_GAMES: u32 = 20;
pub const DEFAULT_RANKING_LIMIT: u32 = 50;
const TOP_KDA: usize = 20;
const WIN_RATE_SERIES: usize = 15;

/// Keep the `n` entries with the highest win rate.
///
/// The sort is stable, so entries with equal rates keep their input order.
/// Non-finite rates sort last.
pub fn top_by_win_rate<T, F>(mut entries: Vec<T>, n: usize, win_rate: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let key = |entry: &T| {
        let rate = win_rate(entry);
        if rate.is_finite() {
            rate
        } else {
            f64::NEG_INFINITY
        }
    };
    entries.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    entries.truncate(n);
    entries
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRateVsKda {
    pub champion: String,
    /// Percentage, one decimal.
    pub win_rate: f64,
    pub kda: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingView {
    pub entries: Vec<KdaRankingEntry>,
    pub top_kda: Vec<KdaRankingEntry>,
    pub win_rate_vs_kda: Vec<WinRateVsKda>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingFilter {
    pub role: Option<Role>,
    pub min_games: u32,
    pub limit: u32,
}

impl Default for RankingFilter {
    fn default() -> Self {
        RankingFilter {
            role: None,
            min_games: DEFAULT_MIN_GAMES,
            limit: DEFAULT_RANKING_LIMIT,
        }
    }
}

/// The gateway already orders the ranking by KDA; the view keeps that order.
pub fn build_ranking_view(entries: Vec<KdaRankingEntry>) -> RankingView {
    let top_kda = entries.iter().take(TOP_KDA).cloned().collect();
    let win_rate_vs_kda = entries
        .iter()
        .take(WIN_RATE_SERIES)
        .map(|entry| WinRateVsKda {
            champion: entry.champion.clone(),
            win_rate: round_to(entry.win_rate * 100.0, 1),
            kda: entry.avg_kda,
        })
        .collect();

    RankingView {
        entries,
        top_kda,
        win_rate_vs_kda,
    }
}

pub fn load_kda_ranking<G>(
    gateway: &G,
    role: Option<Role>,
    min_games: Option<u32>,
    limit: Option<u32>,
) -> Vec<KdaRankingEntry>
where
    G: StatsGateway + ?Sized,
{
    match gateway.kda_ranking(role, min_games, limit) {
        Ok(body) => as_rows(&body)
            .iter()
            .filter_map(KdaRankingEntry::from_row)
            .collect(),
        Err(err) => {
            warn!(error = %err, "KDA ranking unavailable");
            Vec::new()
        }
    }
}

pub fn load_ranking_view<G>(gateway: &G, filter: &RankingFilter) -> RankingView
where
    G: StatsGateway + ?Sized,
{
    let entries = load_kda_ranking(
        gateway,
        filter.role,
        Some(filter.min_games),
        Some(filter.limit),
    );
    build_ranking_view(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::FakeGateway;
    use serde_json::json;

    #[test]
    fn top_n_is_stable_and_deterministic() {
        let entries = vec![("A", 0.5), ("B", 0.7), ("C", 0.5), ("D", f64::NAN), ("E", 0.5)];
        let top = top_by_win_rate(entries, 4, |(_, rate)| *rate);
        let names: Vec<_> = top.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["B", "A", "C", "E"]);
    }

    #[test]
    fn ranking_uses_filters_and_keeps_gateway_order() {
        let gateway = FakeGateway::new().respond(
            "/champions/kda-ranking?role=adc&minGames=20&limit=50",
            json!([
                {"champion": "Jinx", "role": "adc", "games": 90, "wins": 50, "avg_kda": 3.9, "win_rate": 0.5556},
                {"champion": "Vayne", "role": "adc", "games": 60, "wins": 27, "avg_kda": "3.1", "win_rate": 0.45},
                {"role": "adc", "games": 1}
            ]),
        );
        let filter = RankingFilter {
            role: Some(Role::Adc),
            ..RankingFilter::default()
        };
        let view = load_ranking_view(&gateway, &filter);

        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.top_kda[0].champion, "Jinx");
        assert_eq!(view.win_rate_vs_kda[0].win_rate, 55.6);
        assert_eq!(view.win_rate_vs_kda[1].kda, Some(3.1));
    }

    #[test]
    fn failed_ranking_is_empty() {
        let view = load_ranking_view(&FakeGateway::new(), &RankingFilter::default());
        assert_eq!(view, RankingView::default());
    }
}
