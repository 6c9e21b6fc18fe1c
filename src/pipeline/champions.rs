//! Champion x role tables merged from role-partitioned gateway responses.
//!
//! A table is seeded with every reference champion and then filled from
//! whichever requests succeed. A failed request leaves its slots empty, so
//! the reference roster is always the floor of the result.

use crate::api::client::{GatewayExt, StatsGateway};
use crate::api::models::{ChampionStat, PickRateRow, Role};
use crate::pipeline::fanout::fan_out;
use crate::pipeline::normalize::as_rows;
use crate::reference::{champion_url, ReferenceData};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleMetric {
    WinRate {
        win_rate: f64,
        games: u64,
        wins: u64,
    },
    PickRate {
        pick_rate: f64,
        games: u64,
        total_games: u64,
        pick_rank: u64,
    },
}

impl RoleMetric {
    pub fn games(&self) -> u64 {
        match self {
            RoleMetric::WinRate { games, .. } | RoleMetric::PickRate { games, .. } => *games,
        }
    }

    /// The headline fraction: win rate or pick rate.
    pub fn rate(&self) -> f64 {
        match self {
            RoleMetric::WinRate { win_rate, .. } => *win_rate,
            RoleMetric::PickRate { pick_rate, .. } => *pick_rate,
        }
    }
}

impl From<&ChampionStat> for RoleMetric {
    fn from(stat: &ChampionStat) -> Self {
        RoleMetric::WinRate {
            win_rate: stat.win_rate,
            games: stat.games,
            wins: stat.wins.min(stat.games),
        }
    }
}

impl From<&PickRateRow> for RoleMetric {
    fn from(row: &PickRateRow) -> Self {
        RoleMetric::PickRate {
            pick_rate: row.pick_rate,
            games: row.games,
            total_games: row.total_games,
            pick_rank: row.pick_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionRecord {
    pub champion: String,
    pub classes: Vec<String>,
    pub url: String,
    pub top: Option<RoleMetric>,
    pub jungle: Option<RoleMetric>,
    pub mid: Option<RoleMetric>,
    pub adc: Option<RoleMetric>,
    pub support: Option<RoleMetric>,
}

impl ChampionRecord {
    pub fn new(champion: &str, reference: &ReferenceData) -> Self {
        ChampionRecord {
            champion: champion.to_string(),
            classes: reference.classes_for(champion),
            url: champion_url(champion),
            top: None,
            jungle: None,
            mid: None,
            adc: None,
            support: None,
        }
    }

    pub fn slot(&self, role: Role) -> Option<&RoleMetric> {
        match role {
            Role::Top => self.top.as_ref(),
            Role::Jungle => self.jungle.as_ref(),
            Role::Mid => self.mid.as_ref(),
            Role::Adc => self.adc.as_ref(),
            Role::Support => self.support.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<RoleMetric> {
        match role {
            Role::Top => &mut self.top,
            Role::Jungle => &mut self.jungle,
            Role::Mid => &mut self.mid,
            Role::Adc => &mut self.adc,
            Role::Support => &mut self.support,
        }
    }

    pub fn has_data(&self) -> bool {
        Role::ALL.iter().any(|role| self.slot(*role).is_some())
    }
}

/// Champions in insertion order: reference order first, then champions
/// the gateway reported that the reference table lacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChampionTable {
    records: Vec<ChampionRecord>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ChampionTable {
    pub fn seeded(reference: &ReferenceData) -> Self {
        let mut table = ChampionTable::default();
        for name in reference.names() {
            table.entry(name, reference);
        }
        table
    }

    fn entry(&mut self, champion: &str, reference: &ReferenceData) -> &mut ChampionRecord {
        let pos = match self.index.get(champion) {
            Some(&pos) => pos,
            None => {
                if !reference.contains(champion) {
                    debug!(champion, "champion missing from reference data");
                }
                let pos = self.records.len();
                self.records.push(ChampionRecord::new(champion, reference));
                self.index.insert(champion.to_string(), pos);
                pos
            }
        };
        &mut self.records[pos]
    }

    /// Write one role metric. An existing value for the same
    /// (champion, role) is replaced.
    pub fn set(
        &mut self,
        champion: &str,
        role: Role,
        metric: RoleMetric,
        reference: &ReferenceData,
    ) {
        let slot = self.entry(champion, reference).slot_mut(role);
        if slot.is_some() {
            debug!(champion, %role, "duplicate role row, keeping the later one");
        }
        *slot = Some(metric);
    }

    pub fn get(&self, champion: &str) -> Option<&ChampionRecord> {
        self.index.get(champion).map(|&pos| &self.records[pos])
    }

    pub fn records(&self) -> &[ChampionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Case-insensitive substring match on the champion name.
    pub fn search(&self, term: &str) -> Vec<&ChampionRecord> {
        let term = term.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| term.is_empty() || record.champion.to_lowercase().contains(&term))
            .collect()
    }
}

/// Merge one `/champions/stats?role=..` body. The role comes from the
/// request, not from the rows.
pub fn merge_win_rate_rows(
    table: &mut ChampionTable,
    role: Role,
    body: &Value,
    reference: &ReferenceData,
) -> usize {
    let mut merged = 0;
    for stat in as_rows(body).iter().filter_map(ChampionStat::from_row) {
        table.set(&stat.champion, role, RoleMetric::from(&stat), reference);
        merged += 1;
    }
    merged
}

/// Merge a `/champions/roles/pick-rate` body. Rows without a recognizable
/// role are skipped.
pub fn merge_pick_rate_rows(
    table: &mut ChampionTable,
    body: &Value,
    reference: &ReferenceData,
) -> usize {
    let mut merged = 0;
    for row in as_rows(body).iter().filter_map(PickRateRow::from_row) {
        let Some(role) = row.role else {
            debug!(champion = %row.champion, "pick-rate row without a usable role");
            continue;
        };
        table.set(&row.champion, role, RoleMetric::from(&row), reference);
        merged += 1;
    }
    merged
}

/// Win rate per role for every champion, one request per role.
pub fn build_win_rate_table<G>(gateway: &G, reference: &ReferenceData) -> ChampionTable
where
    G: StatsGateway + ?Sized,
{
    let mut table = ChampionTable::seeded(reference);
    let responses = fan_out(&Role::ALL, |role| gateway.champion_stats(Some(*role)));

    for (role, response) in Role::ALL.iter().zip(responses) {
        match response {
            Ok(body) => {
                let merged = merge_win_rate_rows(&mut table, *role, &body, reference);
                debug!(%role, merged, "merged champion stats");
            }
            Err(err) => warn!(%role, error = %err, "champion stats unavailable, leaving role empty"),
        }
    }
    table
}

/// Pick rate per role for every champion, from the combined endpoint.
pub fn build_pick_rate_table<G>(
    gateway: &G,
    reference: &ReferenceData,
    min_games: Option<u32>,
) -> ChampionTable
where
    G: StatsGateway + ?Sized,
{
    let mut table = ChampionTable::seeded(reference);
    match gateway.pick_rates(min_games) {
        Ok(body) => {
            let merged = merge_pick_rate_rows(&mut table, &body, reference);
            debug!(merged, "merged pick rates");
        }
        Err(err) => warn!(error = %err, "pick rates unavailable, showing reference champions only"),
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::FakeGateway;
    use crate::reference::UNKNOWN_CLASS;
    use serde_json::json;

    fn small_reference() -> ReferenceData {
        ReferenceData::from_entries(vec![
            ("Ahri".to_string(), vec!["Mage".to_string(), "Assassin".to_string()]),
            ("Garen".to_string(), vec!["Fighter".to_string()]),
            ("Lux".to_string(), vec!["Mage".to_string()]),
        ])
    }

    fn stats_gateway() -> FakeGateway {
        FakeGateway::new()
            .respond(
                "/champions/stats?role=top",
                json!([{"champion": "Garen", "role": "top", "games": 40, "wins": 22, "win_rate": 0.55}]),
            )
            .respond(
                "/champions/stats?role=mid",
                json!([
                    {"champion": "Ahri", "role": "mid", "games": 100, "wins": 51, "win_rate": 0.51},
                    {"champion": "Smolder", "role": "mid", "games": 8, "wins": 5, "win_rate": 0.625}
                ]),
            )
            .respond("/champions/stats?role=support", json!({"error": "not a list"}))
        // jungle and adc answer 503
    }

    #[test]
    fn every_reference_champion_appears_once() {
        let reference = small_reference();
        let table = build_win_rate_table(&stats_gateway(), &reference);

        for name in reference.names() {
            let count = table.records().iter().filter(|r| r.champion == name).count();
            assert_eq!(count, 1, "{} should appear exactly once", name);
        }
        let lux = table.get("Lux").unwrap();
        assert!(!lux.has_data());
    }

    #[test]
    fn issues_one_request_per_role() {
        let gateway = stats_gateway();
        build_win_rate_table(&gateway, &small_reference());
        assert_eq!(
            gateway.calls(),
            vec![
                "/champions/stats?role=adc",
                "/champions/stats?role=jungle",
                "/champions/stats?role=mid",
                "/champions/stats?role=support",
                "/champions/stats?role=top",
            ]
        );
    }

    #[test]
    fn failed_roles_stay_empty_while_others_fill() {
        let table = build_win_rate_table(&stats_gateway(), &small_reference());
        let garen = table.get("Garen").unwrap();
        assert_eq!(
            garen.top,
            Some(RoleMetric::WinRate { win_rate: 0.55, games: 40, wins: 22 })
        );
        assert!(garen.jungle.is_none());
        assert!(garen.adc.is_none());
        assert!(garen.support.is_none());
    }

    #[test]
    fn api_only_champion_is_appended_as_unknown() {
        let table = build_win_rate_table(&stats_gateway(), &small_reference());
        let names: Vec<_> = table.records().iter().map(|r| r.champion.as_str()).collect();
        assert_eq!(names, vec!["Ahri", "Garen", "Lux", "Smolder"]);

        let smolder = table.get("Smolder").unwrap();
        assert_eq!(smolder.classes, vec![UNKNOWN_CLASS]);
        assert!(smolder.mid.is_some());
    }

    #[test]
    fn total_failure_degrades_to_reference_seed() {
        let reference = small_reference();
        let table = build_win_rate_table(&FakeGateway::new(), &reference);
        assert_eq!(table, ChampionTable::seeded(&reference));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn duplicate_rows_are_last_write_wins() {
        let reference = small_reference();
        let mut table = ChampionTable::seeded(&reference);
        let body = json!([
            {"champion": "Ahri", "games": 10, "wins": 2, "win_rate": 0.2},
            {"champion": "Ahri", "games": 20, "wins": 12, "win_rate": 0.6}
        ]);
        assert_eq!(merge_win_rate_rows(&mut table, Role::Mid, &body, &reference), 2);
        assert_eq!(table.get("Ahri").unwrap().mid.as_ref().unwrap().games(), 20);
    }

    #[test]
    fn pick_rate_failure_keeps_reference_champions() {
        let reference = small_reference();
        let table = build_pick_rate_table(&FakeGateway::new(), &reference, Some(10));

        assert_eq!(table.len(), reference.len());
        assert!(table.records().iter().all(|r| !r.has_data()));
    }

    #[test]
    fn pick_rates_use_row_roles() {
        let reference = small_reference();
        let gateway = FakeGateway::new().respond(
            "/champions/roles/pick-rate?minGames=10",
            json!([
                {"champion": "Lux", "role": "support", "pick_rate": 0.08, "games": 80, "total_games": 1000, "pick_rank": 3},
                {"champion": "Lux", "role": "MIDDLE", "pick_rate": 0.05, "games": 50, "total_games": 1000, "pick_rank": 9},
                {"champion": "Lux", "role": "nowhere", "pick_rate": 0.5, "games": 1, "total_games": 2, "pick_rank": 1}
            ]),
        );
        let table = build_pick_rate_table(&gateway, &reference, Some(10));
        let lux = table.get("Lux").unwrap();

        assert_eq!(
            lux.support,
            Some(RoleMetric::PickRate { pick_rate: 0.08, games: 80, total_games: 1000, pick_rank: 3 })
        );
        assert_eq!(lux.mid.as_ref().map(RoleMetric::rate), Some(0.05));
        assert!(lux.top.is_none());
    }

    #[test]
    fn repeated_runs_serialize_identically() {
        let reference = small_reference();
        let gateway = stats_gateway();
        let first = serde_json::to_string(&build_win_rate_table(&gateway, &reference)).unwrap();
        let second = serde_json::to_string(&build_win_rate_table(&gateway, &reference)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn role_metric_is_tagged() {
        let metric = RoleMetric::WinRate { win_rate: 0.5, games: 2, wins: 1 };
        assert_eq!(
            serde_json::to_value(&metric).unwrap(),
            json!({"kind": "win_rate", "win_rate": 0.5, "games": 2, "wins": 1})
        );
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let table = ChampionTable::seeded(&ReferenceData::builtin());
        let hits: Vec<_> = table.search("LU").iter().map(|r| r.champion.clone()).collect();
        assert_eq!(hits, vec!["Lucian", "Lulu", "Lux", "Nautilus", "Nunu & Willump"]);
    }
}
