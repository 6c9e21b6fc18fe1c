use crate::analysis::champion_stats::{ChampionStatsView, TABLE_ROWS};
use crate::analysis::correlations::CorrelationView;
use crate::analysis::overview::OverviewView;
use crate::analysis::rankings::RankingView;
use crate::api::models::{MatchRecord, Role};
use crate::pipeline::champions::{ChampionRecord, RoleMetric};
use crate::pipeline::matches::MatchesView;
use crate::theme::{DisplayContext, Theme};
use chrono::{DateTime, Local, Utc};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

const BAR_WIDTH: usize = 30;

#[derive(Tabled)]
struct BarRow {
    label: String,
    value: String,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Tabled)]
struct ChampionRow {
    #[tabled(rename = "Champion")]
    champion: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Top")]
    top: String,
    #[tabled(rename = "JG")]
    jungle: String,
    #[tabled(rename = "Mid")]
    mid: String,
    #[tabled(rename = "ADC")]
    adc: String,
    #[tabled(rename = "Sup")]
    support: String,
}

#[derive(Tabled)]
struct StatRow {
    champion: String,
    role: String,
    games: String,
    wins: String,
    win_rate: String,
    gold_14: String,
    xp_14: String,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "Match ID")]
    match_id: String,
    champion: String,
    role: String,
    result: String,
    gold_14: String,
    xp_14: String,
}

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: String,
    champion: String,
    role: String,
    games: String,
    wins: String,
    kda: String,
    win_rate: String,
}

#[derive(Tabled)]
struct RoleCorrelationRow {
    role: String,
    kda_vs_win: String,
    games: String,
}

fn render<T: Tabled>(ctx: &DisplayContext, rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    match ctx.theme {
        Theme::Dark => {
            table.with(Style::rounded());
        }
        Theme::Light => {
            table.with(Style::modern());
        }
    }
    table.to_string()
}

fn bar(value: f64, max: f64) -> String {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.clamp(1, BAR_WIDTH))
}

fn heading(ctx: &DisplayContext, title: &str) {
    println!("\n{}", title.color(ctx.palette.primary).bold());
    println!("{}\n", "=".repeat(60).color(ctx.palette.primary));
}

fn subheading(ctx: &DisplayContext, title: &str) {
    println!("\n{}", title.color(ctx.palette.secondary).bold());
}

fn optional_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

fn role_label(role: Option<Role>) -> String {
    role.map(|r| r.as_str().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn metric_cell(metric: Option<&RoleMetric>) -> String {
    match metric {
        Some(RoleMetric::WinRate { win_rate, games, .. }) => {
            format!("{:.1}% ({})", win_rate * 100.0, games)
        }
        Some(RoleMetric::PickRate {
            pick_rate,
            pick_rank,
            ..
        }) => format!("{:.1}% #{}", pick_rate * 100.0, pick_rank),
        None => "-".to_string(),
    }
}

fn result_cell(ctx: &DisplayContext, won: bool) -> String {
    if won {
        "WIN".color(ctx.palette.positive).to_string()
    } else {
        "LOSS".color(ctx.palette.negative).to_string()
    }
}

fn bar_rows(items: impl Iterator<Item = (String, f64)> + Clone, suffix: &str) -> Vec<BarRow> {
    let max = items.clone().map(|(_, v)| v).fold(0.0, f64::max);
    items
        .map(|(label, value)| BarRow {
            label,
            value: format!("{:.1}{}", value, suffix),
            bar: bar(value, max),
        })
        .collect()
}

fn print_bars(ctx: &DisplayContext, rows: Vec<BarRow>) {
    if rows.is_empty() {
        println!("{}", "No data".color(ctx.palette.muted));
    } else {
        println!("{}", render(ctx, rows));
    }
}

pub fn display_overview(ctx: &DisplayContext, view: &OverviewView) {
    heading(ctx, "📊 Dashboard Overview");

    println!(
        "{} {}    {} {}    {} {}    {} {}",
        "Champions analyzed:".bold(),
        view.top_win_rates.len(),
        "Gold/Win:".bold(),
        view.gold_vs_win,
        "Best KDA:".bold(),
        view.best_kda.as_deref().unwrap_or("-"),
        "XP/Win:".bold(),
        view.xp_vs_win,
    );

    subheading(ctx, "Top 10 Champions by Win Rate");
    print_bars(
        ctx,
        bar_rows(
            view.top_win_rates
                .iter()
                .map(|b| (b.champion.clone(), b.win_rate)),
            "%",
        ),
    );

    subheading(ctx, "Top 10 KDA Ranking");
    print_bars(
        ctx,
        bar_rows(
            view.top_kda
                .iter()
                .map(|e| (e.champion.clone(), e.avg_kda.unwrap_or(0.0))),
            "",
        ),
    );
    println!();
}

/// Champion x role table, win-rate or pick-rate shaped.
pub fn display_champion_table(ctx: &DisplayContext, title: &str, records: &[&ChampionRecord]) {
    heading(ctx, title);

    let rows: Vec<ChampionRow> = records
        .iter()
        .map(|record| ChampionRow {
            champion: record.champion.clone(),
            class: record.classes.join(", "),
            top: metric_cell(record.slot(Role::Top)),
            jungle: metric_cell(record.slot(Role::Jungle)),
            mid: metric_cell(record.slot(Role::Mid)),
            adc: metric_cell(record.slot(Role::Adc)),
            support: metric_cell(record.slot(Role::Support)),
        })
        .collect();

    println!("{}", render(ctx, rows));
    println!("Total: {} champions", records.len());
    println!(
        "{}",
        "Use `open <champion>` for the official champion page".color(ctx.palette.muted)
    );
    println!();
}

pub fn display_champion_stats(ctx: &DisplayContext, view: &ChampionStatsView) {
    heading(ctx, "🏆 Champion Statistics");

    if view.stats.is_empty() {
        println!("{}", "No champion statistics available".yellow());
        return;
    }

    subheading(ctx, "Top 15 Win Rate");
    print_bars(
        ctx,
        bar_rows(
            view.top_win_rate
                .iter()
                .map(|s| (s.champion.clone(), s.win_rate * 100.0)),
            "%",
        ),
    );

    subheading(ctx, "Gold vs XP at 14 min");
    print_bars(
        ctx,
        view.gold_vs_xp
            .iter()
            .map(|p| BarRow {
                label: p.champion.clone(),
                value: format!("{:.0} gold / {:.0} xp", p.gold, p.xp),
                bar: format!("{:.1}% WR", p.win_rate),
            })
            .collect(),
    );

    subheading(ctx, "Full Statistics");
    let rows: Vec<StatRow> = view
        .stats
        .iter()
        .take(TABLE_ROWS)
        .map(|s| StatRow {
            champion: s.champion.clone(),
            role: role_label(s.role),
            games: s.games.to_string(),
            wins: s.wins.to_string(),
            win_rate: format!("{:.1}%", s.win_rate * 100.0),
            gold_14: optional_number(s.avg_gold_14, 0),
            xp_14: optional_number(s.avg_xp_14, 0),
        })
        .collect();
    println!("{}\n", render(ctx, rows));
}

fn match_rows(ctx: &DisplayContext, matches: &[MatchRecord]) -> Vec<MatchRow> {
    matches
        .iter()
        .map(|m| MatchRow {
            match_id: m.match_id.clone().unwrap_or_else(|| "-".to_string()),
            champion: m.champion.clone(),
            role: role_label(m.role),
            result: result_cell(ctx, m.win),
            gold_14: optional_number(m.gold_14, 0),
            xp_14: optional_number(m.xp_14, 0),
        })
        .collect()
}

pub fn display_matches(ctx: &DisplayContext, view: &MatchesView) {
    heading(ctx, "⚔️ Match Analysis");

    let summary = &view.summary;
    println!(
        "{} {}    {} {}    {} {:.1}%",
        "Matches:".bold(),
        summary.total,
        "Wins:".bold(),
        summary.wins.to_string().color(ctx.palette.positive),
        "Win rate:".bold(),
        summary.win_rate,
    );

    subheading(ctx, "Win Rate by Champion (Top 15)");
    print_bars(
        ctx,
        bar_rows(
            view.top_win_rates
                .iter()
                .map(|r| (format!("{} ({})", r.champion, r.games), r.win_rate)),
            "%",
        ),
    );

    subheading(ctx, "Gold at 14 min Distribution");
    let max = view
        .gold_14_histogram
        .iter()
        .map(|b| b.count as f64)
        .fold(0.0, f64::max);
    print_bars(
        ctx,
        view.gold_14_histogram
            .iter()
            .map(|b| BarRow {
                label: format!("{:.0}-{:.0}", b.lower, b.upper),
                value: b.count.to_string(),
                bar: bar(b.count as f64, max),
            })
            .collect(),
    );

    subheading(ctx, "Latest Matches");
    if view.recent.is_empty() {
        println!("{}", "No matches".color(ctx.palette.muted));
    } else {
        println!("{}", render(ctx, match_rows(ctx, &view.recent)));
    }
    println!();
}

pub fn display_match_list(ctx: &DisplayContext, title: &str, matches: &[MatchRecord]) {
    heading(ctx, title);
    if matches.is_empty() {
        println!("{}", "No matches".color(ctx.palette.muted));
        return;
    }
    println!("{}\n", render(ctx, match_rows(ctx, matches)));
}

pub fn display_rankings(ctx: &DisplayContext, view: &RankingView) {
    heading(ctx, "🥇 Champion Rankings");

    if view.entries.is_empty() {
        println!("{}", "No ranking data available".yellow());
        return;
    }

    subheading(ctx, "Top 20 KDA");
    print_bars(
        ctx,
        bar_rows(
            view.top_kda
                .iter()
                .map(|e| (e.champion.clone(), e.avg_kda.unwrap_or(0.0))),
            "",
        ),
    );

    subheading(ctx, "Win Rate vs KDA (Top 15)");
    print_bars(
        ctx,
        view.win_rate_vs_kda
            .iter()
            .map(|p| BarRow {
                label: p.champion.clone(),
                value: format!("{:.1}%", p.win_rate),
                bar: format!("KDA {}", optional_number(p.kda, 2)),
            })
            .collect(),
    );

    subheading(ctx, "Full Ranking");
    let rows: Vec<RankingRow> = view
        .entries
        .iter()
        .enumerate()
        .map(|(idx, e)| RankingRow {
            rank: format!("{}", idx + 1),
            champion: e.champion.clone(),
            role: role_label(e.role),
            games: e.games.to_string(),
            wins: e.wins.to_string(),
            kda: optional_number(e.avg_kda, 2),
            win_rate: format!("{:.1}%", e.win_rate * 100.0),
        })
        .collect();
    println!("{}\n", render(ctx, rows));
}

pub fn display_correlations(ctx: &DisplayContext, view: &CorrelationView) {
    heading(ctx, "📈 Statistics & Correlations");

    println!("{} {}", "Gold/Win correlation:".bold(), view.gold_vs_win);
    println!("{} {}", "XP/Win correlation:".bold(), view.xp_vs_win);
    println!("{} {}", "KDA/Win correlation (global):".bold(), view.kda_vs_win);
    println!("{} {}", "Matches analyzed:".bold(), view.total_games);

    subheading(ctx, "Early Game vs Win");
    print_bars(
        ctx,
        bar_rows(
            view.early_game.iter().map(|b| (b.label.clone(), b.value)),
            "%",
        ),
    );

    subheading(ctx, "KDA vs Win by Role");
    let rows: Vec<RoleCorrelationRow> = view
        .kda_by_role
        .iter()
        .map(|b| RoleCorrelationRow {
            role: b.label.clone(),
            kda_vs_win: format!("{:.1}%", b.value),
            games: b.games.unwrap_or(0).to_string(),
        })
        .collect();
    if rows.is_empty() {
        println!("{}", "No data".color(ctx.palette.muted));
    } else {
        println!("{}", render(ctx, rows));
    }
    println!();
}

pub fn display_updated(ctx: &DisplayContext, generation: u64, at: DateTime<Utc>) {
    println!(
        "{}",
        format!(
            "Updated {} (cycle {})",
            at.with_timezone(&Local).format("%H:%M:%S"),
            generation
        )
        .color(ctx.palette.muted)
    );
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
