use crate::analysis::correlations::{format_percent, CorrelationSet};
use crate::analysis::rankings::top_by_win_rate;
use crate::api::client::{GatewayExt, StatsGateway};
use crate::api::models::{KdaRankingEntry, WinRateEntry};
use crate::pipeline::fanout::fan_out;
use crate::pipeline::normalize::{as_rows, round_to};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

const OVERVIEW_MIN_GAMES: u32 = 20;
const OVERVIEW_WIN_RATE_LIMIT: u32 = 200;
const OVERVIEW_TOP: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRateBar {
    pub champion: String,
    /// Percentage in [0, 100], one decimal.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub top_win_rates: Vec<WinRateBar>,
    pub top_kda: Vec<KdaRankingEntry>,
    pub best_kda: Option<String>,
    pub gold_vs_win: String,
    pub xp_vs_win: String,
}

/// Top champions by overall win rate. Rows whose rate is missing or outside
/// [0, 1] are left out rather than clamped.
pub fn top_win_rate_bars(entries: Vec<WinRateEntry>, n: usize) -> Vec<WinRateBar> {
    let valid: Vec<(String, f64)> = entries
        .into_iter()
        .filter_map(|entry| match entry.win_rate {
            Some(rate) if (0.0..=1.0).contains(&rate) => Some((entry.champion, rate)),
            _ => None,
        })
        .collect();

    top_by_win_rate(valid, n, |(_, rate)| *rate)
        .into_iter()
        .map(|(champion, rate)| WinRateBar {
            champion,
            win_rate: round_to((rate * 100.0).clamp(0.0, 100.0), 1),
        })
        .collect()
}

pub fn build_overview(
    win_rates: Vec<WinRateEntry>,
    kda: Vec<KdaRankingEntry>,
    correlations: &CorrelationSet,
) -> OverviewView {
    let top_kda: Vec<KdaRankingEntry> = kda.into_iter().take(OVERVIEW_TOP).collect();
    OverviewView {
        top_win_rates: top_win_rate_bars(win_rates, OVERVIEW_TOP),
        best_kda: top_kda.first().map(|entry| entry.champion.clone()),
        top_kda,
        gold_vs_win: format_percent(correlations.gold_vs_win),
        xp_vs_win: format_percent(correlations.xp_vs_win),
    }
}

#[derive(Debug, Clone, Copy)]
enum Panel {
    WinRate,
    Kda,
    Correlations,
}

/// The three overview requests run concurrently and fail independently.
pub fn load_overview<G>(gateway: &G) -> OverviewView
where
    G: StatsGateway + ?Sized,
{
    let panels = [Panel::WinRate, Panel::Kda, Panel::Correlations];
    let mut bodies = fan_out(&panels, |panel| match panel {
        Panel::WinRate => {
            gateway.champion_win_rate(Some(OVERVIEW_MIN_GAMES), Some(OVERVIEW_WIN_RATE_LIMIT))
        }
        Panel::Kda => gateway.kda_ranking(None, None, Some(OVERVIEW_TOP as u32)),
        Panel::Correlations => gateway.advanced_correlations(),
    })
    .into_iter()
    .zip(panels)
    .map(|(body, panel)| {
        body.unwrap_or_else(|err| {
            warn!(?panel, error = %err, "overview panel unavailable");
            Value::Null
        })
    });

    let win_rates = bodies.next().unwrap_or(Value::Null);
    let kda = bodies.next().unwrap_or(Value::Null);
    let correlations = bodies.next().unwrap_or(Value::Null);

    build_overview(
        as_rows(&win_rates).iter().filter_map(WinRateEntry::from_row).collect(),
        as_rows(&kda).iter().filter_map(KdaRankingEntry::from_row).collect(),
        &CorrelationSet::from_advanced(&correlations),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::FakeGateway;
    use serde_json::json;

    fn entry(champion: &str, win_rate: Option<f64>) -> WinRateEntry {
        WinRateEntry {
            champion: champion.to_string(),
            win_rate,
            games: None,
        }
    }

    #[test]
    fn out_of_range_rates_are_dropped() {
        let bars = top_win_rate_bars(
            vec![
                entry("Ahri", Some(0.534)),
                entry("Broken", Some(1.7)),
                entry("Negative", Some(-0.2)),
                entry("Missing", None),
                entry("Zed", Some(0.55)),
            ],
            10,
        );
        assert_eq!(
            bars,
            vec![
                WinRateBar { champion: "Zed".to_string(), win_rate: 55.0 },
                WinRateBar { champion: "Ahri".to_string(), win_rate: 53.4 },
            ]
        );
    }

    #[test]
    fn one_failed_panel_leaves_the_others() {
        let gateway = FakeGateway::new()
            .respond(
                "/champions/win-rate?minGames=20&limit=200",
                json!([{"champion": "Garen", "win_rate": 0.52}]),
            )
            .respond(
                "/champions/kda-ranking?limit=10",
                json!([{"champion": "Jinx", "games": 10, "wins": 6, "avg_kda": 3.2, "win_rate": 0.6}]),
            );
        let view = load_overview(&gateway);

        assert_eq!(view.top_win_rates.len(), 1);
        assert_eq!(view.best_kda.as_deref(), Some("Jinx"));
        assert_eq!(view.gold_vs_win, "0.0%");
        assert_eq!(view.xp_vs_win, "0.0%");
    }

    #[test]
    fn total_failure_is_an_empty_overview() {
        let view = load_overview(&FakeGateway::new());
        assert!(view.top_win_rates.is_empty());
        assert!(view.top_kda.is_empty());
        assert_eq!(view.best_kda, None);
    }
}
