use crate::pipeline::normalize::{
    clamp_fraction, coerce_count, field_count, field_f64, field_name, normalize_win,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Adc => "adc",
            Role::Support => "support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Role::Top),
            "jungle" | "jg" => Ok(Role::Jungle),
            "mid" | "middle" => Ok(Role::Mid),
            "adc" | "bottom" | "bot" | "carry" => Ok(Role::Adc),
            "support" | "utility" | "sup" => Ok(Role::Support),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

fn field_role(row: &Value, key: &str) -> Option<Role> {
    row.get(key).and_then(Value::as_str).and_then(|s| s.parse().ok())
}

// /champions/stats row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionStat {
    pub champion: String,
    pub role: Option<Role>,
    pub games: u64,
    pub wins: u64,
    pub win_rate: f64,
    pub avg_gold_14: Option<f64>,
    pub avg_xp_14: Option<f64>,
}

impl ChampionStat {
    pub fn from_row(row: &Value) -> Option<Self> {
        let champion = field_name(row, "champion")?;
        let games = field_count(row, "games");
        Some(ChampionStat {
            champion,
            role: field_role(row, "role"),
            games,
            wins: field_count(row, "wins").min(games),
            win_rate: field_f64(row, "win_rate").map(clamp_fraction).unwrap_or(0.0),
            avg_gold_14: field_f64(row, "avg_gold_14"),
            avg_xp_14: field_f64(row, "avg_xp_14"),
        })
    }
}

// /champions/roles/pick-rate row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickRateRow {
    pub champion: String,
    pub role: Option<Role>,
    pub pick_rate: f64,
    pub games: u64,
    pub total_games: u64,
    pub pick_rank: u64,
}

impl PickRateRow {
    pub fn from_row(row: &Value) -> Option<Self> {
        let champion = field_name(row, "champion")?;
        let total_games = field_count(row, "total_games");
        let games = field_count(row, "games");
        Some(PickRateRow {
            champion,
            role: field_role(row, "role"),
            pick_rate: field_f64(row, "pick_rate").map(clamp_fraction).unwrap_or(0.0),
            games: if total_games > 0 { games.min(total_games) } else { games },
            total_games,
            pick_rank: field_count(row, "pick_rank"),
        })
    }
}

// /champions/kda-ranking row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KdaRankingEntry {
    pub champion: String,
    pub role: Option<Role>,
    pub games: u64,
    pub wins: u64,
    pub avg_kda: Option<f64>,
    pub win_rate: f64,
}

impl KdaRankingEntry {
    pub fn from_row(row: &Value) -> Option<Self> {
        let champion = field_name(row, "champion")?;
        let games = field_count(row, "games");
        Some(KdaRankingEntry {
            champion,
            role: field_role(row, "role"),
            games,
            wins: field_count(row, "wins").min(games),
            avg_kda: field_f64(row, "avg_kda"),
            win_rate: field_f64(row, "win_rate").map(clamp_fraction).unwrap_or(0.0),
        })
    }
}

// /champions/win-rate row. The rate stays unclamped: the overview drops
// rows whose rate is outside [0, 1] instead of pinning them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRateEntry {
    pub champion: String,
    pub win_rate: Option<f64>,
    pub games: Option<u64>,
}

impl WinRateEntry {
    pub fn from_row(row: &Value) -> Option<Self> {
        Some(WinRateEntry {
            champion: field_name(row, "champion")?,
            win_rate: field_f64(row, "win_rate"),
            games: row.get("games").map(coerce_count),
        })
    }
}

const MATCH_ID_KEYS: [&str; 4] = ["matchid_simplified", "match_id", "matchId", "id"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub match_id: Option<String>,
    pub champion: String,
    pub role: Option<Role>,
    pub win: bool,
    pub gold_14: Option<f64>,
    pub xp_14: Option<f64>,
}

impl MatchRecord {
    /// `None` for rows without a champion or without a win field; those are
    /// dropped from every aggregate.
    pub fn from_row(row: &Value) -> Option<Self> {
        let champion = field_name(row, "champion")?;
        let win = match row.get("win") {
            None | Some(Value::Null) => return None,
            Some(value) => normalize_win(value),
        };
        let match_id = MATCH_ID_KEYS.iter().find_map(|key| field_name(row, key));

        Some(MatchRecord {
            match_id,
            champion,
            role: field_role(row, "role"),
            win,
            gold_14: field_f64(row, "gold_14"),
            xp_14: field_f64(row, "xp_14"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_aliases() {
        assert_eq!("MIDDLE".parse::<Role>(), Ok(Role::Mid));
        assert_eq!("utility".parse::<Role>(), Ok(Role::Support));
        assert_eq!("bottom".parse::<Role>(), Ok(Role::Adc));
        assert!("feeder".parse::<Role>().is_err());
    }

    #[test]
    fn match_without_win_is_dropped() {
        assert!(MatchRecord::from_row(&json!({"champion": "Ahri"})).is_none());
        assert!(MatchRecord::from_row(&json!({"champion": "Ahri", "win": null})).is_none());
        assert!(MatchRecord::from_row(&json!({"win": true})).is_none());
        assert!(MatchRecord::from_row(&json!({"champion": "", "win": true})).is_none());
    }

    #[test]
    fn match_fields_are_coerced() {
        let record = MatchRecord::from_row(&json!({
            "matchid_simplified": "BR1_42",
            "champion": "Ahri",
            "role": "MIDDLE",
            "win": "TRUE",
            "gold_14": "5120",
            "xp_14": "n/a"
        }))
        .unwrap();

        assert_eq!(record.match_id.as_deref(), Some("BR1_42"));
        assert_eq!(record.role, Some(Role::Mid));
        assert!(record.win);
        assert_eq!(record.gold_14, Some(5120.0));
        assert_eq!(record.xp_14, None);
    }

    #[test]
    fn champion_stat_wins_never_exceed_games() {
        let stat = ChampionStat::from_row(&json!({
            "champion": "Garen", "role": "top", "games": 10, "wins": 14, "win_rate": 1.4
        }))
        .unwrap();
        assert_eq!(stat.wins, 10);
        assert_eq!(stat.win_rate, 1.0);
    }

    #[test]
    fn pick_rate_row_reads_all_fields() {
        let row = PickRateRow::from_row(&json!({
            "champion": "Lee Sin", "role": "jungle", "pick_rate": 0.12,
            "games": 120, "total_games": 1000, "pick_rank": 1
        }))
        .unwrap();
        assert_eq!(row.role, Some(Role::Jungle));
        assert_eq!(row.games, 120);
        assert_eq!(row.total_games, 1000);
        assert_eq!(row.pick_rank, 1);
    }

    #[test]
    fn pick_rate_games_never_exceed_total() {
        let row = PickRateRow::from_row(&json!({
            "champion": "Lee Sin", "role": "jungle", "pick_rate": 1.3,
            "games": 1500, "total_games": 1000, "pick_rank": 1
        }))
        .unwrap();
        assert_eq!(row.games, 1000);
        assert_eq!(row.pick_rate, 1.0);
    }

    #[test]
    fn pick_rate_games_kept_without_total() {
        let row = PickRateRow::from_row(&json!({
            "champion": "Lee Sin", "role": "jungle", "pick_rate": 0.12,
            "games": 120, "total_games": 0
        }))
        .unwrap();
        assert_eq!(row.games, 120);
        assert_eq!(row.total_games, 0);
    }
}
