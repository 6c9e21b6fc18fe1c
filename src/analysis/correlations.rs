//! Correlation coefficients reshaped for display.
//!
//! Coefficients are fractions in [-1, 1]; every display value is a
//! percentage with one decimal, and anything that is not a finite number
//! shows as zero.

use crate::api::client::{GatewayExt, StatsGateway};
use crate::error::AppError;
use crate::pipeline::fanout::fan_out;
use crate::pipeline::normalize::{as_rows, coerce_count, coerce_f64, field_count, round_to};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

pub fn percent_value(coefficient: Option<f64>) -> f64 {
    match coefficient.map(|c| c * 100.0) {
        // `+ 0.0` folds -0.0 into 0.0
        Some(percent) if percent.is_finite() => round_to(percent, 1) + 0.0,
        _ => 0.0,
    }
}

pub fn format_percent(coefficient: Option<f64>) -> String {
    format!("{:.1}%", percent_value(coefficient))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCorrelation {
    pub role: Option<String>,
    pub kda_vs_win: Option<f64>,
    pub games: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationSet {
    pub gold_vs_win: Option<f64>,
    pub xp_vs_win: Option<f64>,
    pub kda_vs_win: Option<f64>,
    pub games: u64,
    pub by_role: Vec<RoleCorrelation>,
}

// Look a coefficient up at the top level or inside one of `sections`.
fn lookup(body: &Value, sections: &[&str], key: &str) -> Option<f64> {
    body.get(key).and_then(coerce_f64).or_else(|| {
        sections
            .iter()
            .find_map(|section| body.get(*section)?.get(key).and_then(coerce_f64))
    })
}

fn lookup_games(body: &Value, sections: &[&str]) -> u64 {
    body.get("games").map(coerce_count).filter(|g| *g > 0).unwrap_or_else(|| {
        sections
            .iter()
            .find_map(|section| body.get(*section)?.get("games").map(coerce_count))
            .unwrap_or(0)
    })
}

fn by_role(body: &Value) -> Vec<RoleCorrelation> {
    let rows = ["kdaByRole", "byRole", "roles"]
        .iter()
        .map(|key| body.get(*key).map(as_rows).unwrap_or(&[]))
        .find(|rows| !rows.is_empty())
        .unwrap_or(&[]);

    rows.iter()
        .filter(|row| row.is_object())
        .map(|row| RoleCorrelation {
            role: row
                .get("role")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            kda_vs_win: row.get("corr_kda_win").and_then(coerce_f64),
            games: field_count(row, "games"),
        })
        .collect()
}

impl CorrelationSet {
    /// From `/stats/advanced-correlations`:
    /// `{ earlyGlobal: {corr_gold14_win, corr_xp14_win}, kdaGlobal: {corr_kda_win, games}, kdaByRole: [..] }`
    pub fn from_advanced(body: &Value) -> Self {
        CorrelationSet {
            gold_vs_win: lookup(body, &["earlyGlobal"], "corr_gold14_win"),
            xp_vs_win: lookup(body, &["earlyGlobal"], "corr_xp14_win"),
            kda_vs_win: lookup(body, &["kdaGlobal"], "corr_kda_win"),
            games: lookup_games(body, &["kdaGlobal"]),
            by_role: by_role(body),
        }
    }

    /// From `/stats/correlations`, the early-game coefficients only.
    pub fn from_early(body: &Value) -> Self {
        CorrelationSet {
            gold_vs_win: lookup(body, &["earlyGlobal", "global"], "corr_gold14_win"),
            xp_vs_win: lookup(body, &["earlyGlobal", "global"], "corr_xp14_win"),
            ..CorrelationSet::default()
        }
    }

    /// From `/stats/kda-vs-win`.
    pub fn from_kda(body: &Value) -> Self {
        CorrelationSet {
            kda_vs_win: lookup(body, &["kdaGlobal", "global"], "corr_kda_win"),
            games: lookup_games(body, &["kdaGlobal", "global"]),
            by_role: by_role(body),
            ..CorrelationSet::default()
        }
    }

    /// Fill whatever `self` lacks from `other`; present values win.
    pub fn fill_missing(&mut self, other: CorrelationSet) {
        self.gold_vs_win = self.gold_vs_win.or(other.gold_vs_win);
        self.xp_vs_win = self.xp_vs_win.or(other.xp_vs_win);
        self.kda_vs_win = self.kda_vs_win.or(other.kda_vs_win);
        if self.games == 0 {
            self.games = other.games;
        }
        if self.by_role.is_empty() {
            self.by_role = other.by_role;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Advanced,
    Early,
    Kda,
}

/// All correlation endpoints fetched concurrently. The advanced endpoint is
/// authoritative; the other two only fill gaps. Each one may fail alone.
pub fn load_correlations<G>(gateway: &G) -> CorrelationSet
where
    G: StatsGateway + ?Sized,
{
    let sources = [Source::Advanced, Source::Early, Source::Kda];
    let responses = fan_out(&sources, |source| -> Result<CorrelationSet, AppError> {
        Ok(match source {
            Source::Advanced => CorrelationSet::from_advanced(&gateway.advanced_correlations()?),
            Source::Early => CorrelationSet::from_early(&gateway.correlations()?),
            Source::Kda => CorrelationSet::from_kda(&gateway.kda_vs_win()?),
        })
    });

    let mut set = CorrelationSet::default();
    for (source, response) in sources.iter().zip(responses) {
        match response {
            Ok(partial) => set.fill_missing(partial),
            Err(err) => warn!(?source, error = %err, "correlations unavailable"),
        }
    }
    set
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub games: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationView {
    pub gold_vs_win: String,
    pub xp_vs_win: String,
    pub kda_vs_win: String,
    pub total_games: u64,
    pub early_game: Vec<Bar>,
    pub kda_by_role: Vec<Bar>,
}

pub fn build_correlation_view(set: &CorrelationSet) -> CorrelationView {
    let early_game = if set.gold_vs_win.is_some() || set.xp_vs_win.is_some() {
        vec![
            Bar {
                label: "Gold vs Win".to_string(),
                value: percent_value(set.gold_vs_win),
                games: None,
            },
            Bar {
                label: "XP vs Win".to_string(),
                value: percent_value(set.xp_vs_win),
                games: None,
            },
        ]
    } else {
        Vec::new()
    };

    let kda_by_role = set
        .by_role
        .iter()
        .map(|role| Bar {
            label: role
                .role
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_else(|| "-".to_string()),
            value: percent_value(role.kda_vs_win),
            games: Some(role.games),
        })
        .collect();

    CorrelationView {
        gold_vs_win: format_percent(set.gold_vs_win),
        xp_vs_win: format_percent(set.xp_vs_win),
        kda_vs_win: format_percent(set.kda_vs_win),
        total_games: set.games,
        early_game,
        kda_by_role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::FakeGateway;
    use serde_json::json;

    #[test]
    fn coefficient_to_one_decimal_percent() {
        assert_eq!(format_percent(Some(0.4567)), "45.7%");
        assert_eq!(format_percent(Some(-0.1234)), "-12.3%");
        assert_eq!(format_percent(Some(-0.0001)), "0.0%");
    }

    #[test]
    fn missing_or_non_numeric_is_zero_never_nan() {
        assert_eq!(format_percent(None), "0.0%");
        assert_eq!(format_percent(coerce_f64(&Value::Null)), "0.0%");
        assert_eq!(format_percent(coerce_f64(&json!("abc"))), "0.0%");
        assert_eq!(format_percent(Some(f64::NAN)), "0.0%");
        assert_eq!(format_percent(Some(f64::MAX)), "0.0%");
    }

    fn advanced_body() -> Value {
        json!({
            "earlyGlobal": {"corr_gold14_win": 0.4567, "corr_xp14_win": "0.3120"},
            "kdaGlobal": {"corr_kda_win": 0.52, "games": 12000},
            "kdaByRole": [
                {"role": "top", "corr_kda_win": 0.48, "games": 2400},
                {"role": null, "corr_kda_win": "bad", "games": 10}
            ]
        })
    }

    #[test]
    fn advanced_body_parses() {
        let set = CorrelationSet::from_advanced(&advanced_body());
        assert_eq!(set.gold_vs_win, Some(0.4567));
        assert_eq!(set.xp_vs_win, Some(0.312));
        assert_eq!(set.games, 12000);
        assert_eq!(set.by_role.len(), 2);
    }

    #[test]
    fn view_labels_roles_and_guards_values() {
        let view = build_correlation_view(&CorrelationSet::from_advanced(&advanced_body()));
        assert_eq!(view.gold_vs_win, "45.7%");
        assert_eq!(view.xp_vs_win, "31.2%");
        assert_eq!(view.kda_vs_win, "52.0%");
        assert_eq!(view.early_game[0].value, 45.7);
        assert_eq!(view.kda_by_role[0].label, "TOP");
        assert_eq!(view.kda_by_role[1].label, "-");
        assert_eq!(view.kda_by_role[1].value, 0.0);
    }

    #[test]
    fn empty_set_has_no_bars() {
        let view = build_correlation_view(&CorrelationSet::default());
        assert!(view.early_game.is_empty());
        assert!(view.kda_by_role.is_empty());
        assert_eq!(view.gold_vs_win, "0.0%");
    }

    #[test]
    fn legacy_endpoints_fill_gaps_when_advanced_fails() {
        let gateway = FakeGateway::new()
            .respond("/stats/correlations", json!({"corr_gold14_win": 0.41, "corr_xp14_win": 0.38}))
            .respond("/stats/kda-vs-win", json!({"corr_kda_win": 0.5, "games": 900}));
        let set = load_correlations(&gateway);

        assert_eq!(set.gold_vs_win, Some(0.41));
        assert_eq!(set.kda_vs_win, Some(0.5));
        assert_eq!(set.games, 900);
    }

    #[test]
    fn advanced_values_take_precedence() {
        let gateway = FakeGateway::new()
            .respond("/stats/advanced-correlations", advanced_body())
            .respond("/stats/correlations", json!({"corr_gold14_win": 0.1}));
        let set = load_correlations(&gateway);
        assert_eq!(set.gold_vs_win, Some(0.4567));
    }

    #[test]
    fn total_failure_is_empty_set() {
        assert_eq!(load_correlations(&FakeGateway::new()), CorrelationSet::default());
    }
}
