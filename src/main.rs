use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use lol_dashboard::analysis::champion_stats::{load_champion_stats, ChampionStatsView};
use lol_dashboard::analysis::correlations::{build_correlation_view, load_correlations, CorrelationView};
use lol_dashboard::analysis::overview::{load_overview, OverviewView};
use lol_dashboard::analysis::rankings::{
    load_ranking_view, RankingFilter, RankingView, DEFAULT_MIN_GAMES, DEFAULT_RANKING_LIMIT,
};
use lol_dashboard::api::client::{StatsClient, StatsGateway};
use lol_dashboard::api::models::{MatchRecord, Role};
use lol_dashboard::config::Config;
use lol_dashboard::display::output::{
    display_champion_stats, display_champion_table, display_correlations, display_error,
    display_info, display_match_list, display_matches, display_overview, display_rankings,
    display_success, display_updated,
};
use lol_dashboard::logging::init_logging;
use lol_dashboard::pipeline::champions::{build_pick_rate_table, build_win_rate_table, ChampionRecord};
use lol_dashboard::pipeline::cycle::{CycleTracker, Latest, RefreshSchedule};
use lol_dashboard::pipeline::matches::{
    load_champion_matches, load_match, load_matches_view, ChampionMatchesKind, MatchFilter,
    MatchesView,
};
use lol_dashboard::reference::{champion_url, ReferenceData};
use lol_dashboard::theme::{DisplayContext, Theme, ThemeStore};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "lol-dashboard")]
#[command(about = "League of Legends statistics dashboard", long_about = None)]
struct Args {
    /// Print the view as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Refresh the view every SECS seconds
    #[arg(long, global = true, value_name = "SECS")]
    watch: Option<u64>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Statistics gateway base URL (overrides LOL_DASHBOARD_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overview: top win rates, top KDA and early-game correlations
    Home,

    /// Per-champion statistics
    Champions {
        #[arg(short, long)]
        role: Option<Role>,

        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Champion x role win-rate table
    Table {
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Champion x role pick-rate table
    PickRates {
        #[arg(long)]
        min_games: Option<u32>,

        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Match analysis
    Matches {
        #[arg(short, long)]
        champion: Option<String>,

        #[arg(short, long)]
        role: Option<Role>,

        /// Number of matches (default: 100)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// A single match
    Match { id: String },

    /// Matches of one champion
    ChampionMatches {
        name: String,

        #[arg(long, conflicts_with = "worst")]
        best: bool,

        #[arg(long)]
        worst: bool,

        /// Number of matches (default: 20)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// KDA rankings
    Rankings {
        #[arg(short, long)]
        role: Option<Role>,

        #[arg(long, default_value_t = DEFAULT_MIN_GAMES)]
        min_games: u32,

        #[arg(short, long, default_value_t = DEFAULT_RANKING_LIMIT)]
        limit: u32,
    },

    /// Correlation statistics
    Stats,

    /// Show or change the stored theme
    Theme { action: Option<ThemeAction> },

    /// Print the official page of a champion
    Open { champion: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

/// A view that goes through a fetch cycle.
#[derive(Debug, Clone)]
enum ViewRequest {
    Overview,
    ChampionStats { role: Option<Role>, search: String },
    WinRateTable { search: String },
    PickRateTable { min_games: Option<u32>, search: String },
    Matches(MatchFilter),
    Match { id: String },
    ChampionMatches { name: String, kind: ChampionMatchesKind, limit: Option<u32> },
    Rankings(RankingFilter),
    Correlations,
}

#[derive(Debug, Clone)]
enum View {
    Overview(OverviewView),
    ChampionStats(ChampionStatsView),
    Table { title: String, records: Vec<ChampionRecord> },
    Matches(MatchesView),
    Match { id: String, record: Option<MatchRecord> },
    MatchList { title: String, matches: Vec<MatchRecord> },
    Rankings(RankingView),
    Correlations(CorrelationView),
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let store = ThemeStore::new(ThemeStore::default_path());
    let reference = ReferenceData::builtin();

    let request = match args.command {
        Command::Theme { action } => return run_theme(&store, action),
        Command::Open { champion } => return run_open(&reference, &champion, args.json),
        Command::Home => ViewRequest::Overview,
        Command::Champions { role, search } => ViewRequest::ChampionStats { role, search },
        Command::Table { search } => ViewRequest::WinRateTable { search },
        Command::PickRates { min_games, search } => ViewRequest::PickRateTable { min_games, search },
        Command::Matches {
            champion,
            role,
            limit,
        } => ViewRequest::Matches(MatchFilter {
            champion,
            role,
            limit,
        }),
        Command::Match { id } => ViewRequest::Match { id },
        Command::ChampionMatches {
            name,
            best,
            worst,
            limit,
        } => {
            let kind = if best {
                ChampionMatchesKind::Best
            } else if worst {
                ChampionMatchesKind::Worst
            } else {
                ChampionMatchesKind::All
            };
            ViewRequest::ChampionMatches { name, kind, limit }
        }
        Command::Rankings {
            role,
            min_games,
            limit,
        } => ViewRequest::Rankings(RankingFilter {
            role,
            min_games,
            limit,
        }),
        Command::Stats => ViewRequest::Correlations,
    };

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = args.api_url {
        config = config
            .with_api_url(api_url)
            .context("Invalid --api-url")?;
    }
    info!(api = %config.api_base_url, "using statistics gateway");

    let client = StatsClient::new(&config).context("Failed to create the gateway client")?;
    let ctx = DisplayContext::new(store.load());

    let schedule = match args.watch {
        Some(secs) => RefreshSchedule::every(Duration::from_secs(secs.max(1))),
        None => RefreshSchedule::once(),
    };
    let json = args.json;

    schedule.run(
        &CycleTracker::new(),
        &Latest::<View>::new(),
        || {
            let spinner = (!json).then(|| loading_spinner(&request));
            let view = load_view(&client, &reference, &request);
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            view
        },
        |generation, view| {
            render(&ctx, view, json)?;
            if !json {
                display_updated(&ctx, generation, Utc::now());
            }
            Ok(())
        },
    )
}

fn loading_spinner(request: &ViewRequest) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Loading {}...", request.label()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

impl ViewRequest {
    fn label(&self) -> &'static str {
        match self {
            ViewRequest::Overview => "overview",
            ViewRequest::ChampionStats { .. } => "champion statistics",
            ViewRequest::WinRateTable { .. } => "win-rate table",
            ViewRequest::PickRateTable { .. } => "pick-rate table",
            ViewRequest::Matches(_) => "matches",
            ViewRequest::Match { .. } => "match",
            ViewRequest::ChampionMatches { .. } => "champion matches",
            ViewRequest::Rankings(_) => "rankings",
            ViewRequest::Correlations => "correlations",
        }
    }
}

fn load_view<G>(gateway: &G, reference: &ReferenceData, request: &ViewRequest) -> View
where
    G: StatsGateway + ?Sized,
{
    debug!(view = request.label(), "loading view");
    match request {
        ViewRequest::Overview => View::Overview(load_overview(gateway)),
        ViewRequest::ChampionStats { role, search } => {
            View::ChampionStats(load_champion_stats(gateway, *role, search))
        }
        ViewRequest::WinRateTable { search } => {
            let table = build_win_rate_table(gateway, reference);
            View::Table {
                title: "📋 Champion Win Rate by Role".to_string(),
                records: table.search(search).into_iter().cloned().collect(),
            }
        }
        ViewRequest::PickRateTable { min_games, search } => {
            let table = build_pick_rate_table(gateway, reference, *min_games);
            View::Table {
                title: "📋 Champion Pick Rate by Role".to_string(),
                records: table.search(search).into_iter().cloned().collect(),
            }
        }
        ViewRequest::Matches(filter) => View::Matches(load_matches_view(gateway, filter)),
        ViewRequest::Match { id } => View::Match {
            id: id.clone(),
            record: load_match(gateway, id),
        },
        ViewRequest::ChampionMatches { name, kind, limit } => {
            let title = match kind {
                ChampionMatchesKind::All => format!("⚔️ {} Matches", name),
                ChampionMatchesKind::Best => format!("⚔️ {} Best Matches", name),
                ChampionMatchesKind::Worst => format!("⚔️ {} Worst Matches", name),
            };
            View::MatchList {
                title,
                matches: load_champion_matches(gateway, name, *kind, *limit),
            }
        }
        ViewRequest::Rankings(filter) => View::Rankings(load_ranking_view(gateway, filter)),
        ViewRequest::Correlations => {
            View::Correlations(build_correlation_view(&load_correlations(gateway)))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize view")?;
    println!("{}", json);
    Ok(())
}

fn render(ctx: &DisplayContext, view: &View, json: bool) -> Result<()> {
    if json {
        return match view {
            View::Overview(v) => print_json(v),
            View::ChampionStats(v) => print_json(v),
            View::Table { records, .. } => print_json(records),
            View::Matches(v) => print_json(v),
            View::Match { record, .. } => print_json(record),
            View::MatchList { matches, .. } => print_json(matches),
            View::Rankings(v) => print_json(v),
            View::Correlations(v) => print_json(v),
        };
    }

    match view {
        View::Overview(v) => display_overview(ctx, v),
        View::ChampionStats(v) => display_champion_stats(ctx, v),
        View::Table { title, records } => {
            let records: Vec<&ChampionRecord> = records.iter().collect();
            display_champion_table(ctx, title, &records);
        }
        View::Matches(v) => display_matches(ctx, v),
        View::Match { id, record } => match record {
            Some(record) => {
                display_match_list(ctx, &format!("⚔️ Match {}", id), std::slice::from_ref(record))
            }
            None => display_info(&format!("Match {} not found", id)),
        },
        View::MatchList { title, matches } => display_match_list(ctx, title, matches),
        View::Rankings(v) => display_rankings(ctx, v),
        View::Correlations(v) => display_correlations(ctx, v),
    }
    Ok(())
}

fn run_theme(store: &ThemeStore, action: Option<ThemeAction>) -> Result<()> {
    let current = store.load();
    let next = match action {
        None => {
            display_info(&format!("Current theme: {}", current));
            return Ok(());
        }
        Some(ThemeAction::Light) => Theme::Light,
        Some(ThemeAction::Dark) => Theme::Dark,
        Some(ThemeAction::Toggle) => current.toggled(),
    };

    store
        .save(next)
        .with_context(|| format!("Failed to save theme to {}", store.path().display()))?;
    display_success(&format!("Theme set to {}", next));
    Ok(())
}

fn run_open(reference: &ReferenceData, champion: &str, json: bool) -> Result<()> {
    let url = champion_url(champion);
    if json {
        return print_json(&serde_json::json!({ "champion": champion, "url": url }));
    }
    if !reference.contains(champion) {
        display_info(&format!("{} is not in the champion list", champion));
    }
    println!("{}", url);
    Ok(())
}
