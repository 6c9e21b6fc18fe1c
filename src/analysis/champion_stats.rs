use crate::analysis::rankings::top_by_win_rate;
use crate::api::client::{GatewayExt, StatsGateway};
use crate::api::models::{ChampionStat, Role};
use crate::pipeline::normalize::{as_rows, round_to};
use serde::Serialize;
use tracing::warn;

const TOP_WIN_RATE: usize = 15;
pub const TABLE_ROWS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldXpPoint {
    pub champion: String,
    pub gold: f64,
    pub xp: f64,
    /// Percentage, one decimal.
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChampionStatsView {
    pub stats: Vec<ChampionStat>,
    pub top_win_rate: Vec<ChampionStat>,
    pub gold_vs_xp: Vec<GoldXpPoint>,
}

pub fn build_champion_stats_view(stats: Vec<ChampionStat>, search: &str) -> ChampionStatsView {
    let term = search.trim().to_lowercase();
    let stats: Vec<ChampionStat> = stats
        .into_iter()
        .filter(|stat| term.is_empty() || stat.champion.to_lowercase().contains(&term))
        .collect();

    let top_win_rate = top_by_win_rate(stats.clone(), TOP_WIN_RATE, |stat| stat.win_rate);

    // Champions without both averages have no place on the scatter.
    let gold_vs_xp = stats
        .iter()
        .filter_map(|stat| {
            Some(GoldXpPoint {
                champion: stat.champion.clone(),
                gold: stat.avg_gold_14?,
                xp: stat.avg_xp_14?,
                win_rate: round_to(stat.win_rate * 100.0, 1),
            })
        })
        .collect();

    ChampionStatsView {
        stats,
        top_win_rate,
        gold_vs_xp,
    }
}

pub fn load_champion_stats<G>(gateway: &G, role: Option<Role>, search: &str) -> ChampionStatsView
where
    G: StatsGateway + ?Sized,
{
    match gateway.champion_stats(role) {
        Ok(body) => {
            let stats = as_rows(&body)
                .iter()
                .filter_map(ChampionStat::from_row)
                .collect();
            build_champion_stats_view(stats, search)
        }
        Err(err) => {
            warn!(error = %err, "champion stats unavailable");
            ChampionStatsView::default()
        }
    }
}
