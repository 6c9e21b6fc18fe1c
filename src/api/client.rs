use crate::config::Config;
use crate::error::AppError;
use crate::api::models::Role;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::endpoints::{self, Query};

/// Read-only access to the statistics gateway.
///
/// `Sync` because one aggregation cycle calls it from several threads.
pub trait StatsGateway: Sync {
    fn get(&self, path: &str, query: &Query) -> Result<Value, AppError>;
}

pub struct StatsClient {
    base_url: Url,
    agent: ureq::Agent,
}

impl StatsClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Config(format!("invalid gateway URL: {}", e)))?;

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.timeout)
            .user_agent(concat!("lol_dashboard/", env!("CARGO_PKG_VERSION")))
            .build();

        Ok(StatsClient { base_url, agent })
    }

    pub fn build_url(&self, path: &str, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        let full_path = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&full_path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        url
    }
}

impl StatsGateway for StatsClient {
    fn get(&self, path: &str, query: &Query) -> Result<Value, AppError> {
        let url = self.build_url(path, query);
        debug!(%url, "GET");

        let response = self.agent.request_url("GET", &url).call().map_err(|e| {
            let err = AppError::from(e);
            warn!(%url, error = %err, "gateway request failed");
            err
        })?;

        response.into_json::<Value>().map_err(|e| {
            warn!(%url, error = %e, "gateway returned a non-JSON body");
            AppError::MalformedData(format!("{}: {}", url, e))
        })
    }
}

/// Percent-encode user input for use as a single path segment.
pub fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Typed wrappers over the gateway endpoints.
pub trait GatewayExt: StatsGateway {
    fn matches(
        &self,
        champion: Option<&str>,
        role: Option<Role>,
        limit: Option<u32>,
    ) -> Result<Value, AppError> {
        let query = Query::new()
            .opt_param("champion", champion)
            .opt_param("role", role)
            .opt_param("limit", limit);
        self.get(endpoints::MATCHES, &query)
    }

    fn match_by_id(&self, match_id: &str) -> Result<Value, AppError> {
        let path = format!("{}/{}", endpoints::MATCHES, encode_segment(match_id));
        self.get(&path, &Query::new())
    }

    fn champion_stats(&self, role: Option<Role>) -> Result<Value, AppError> {
        self.get(
            endpoints::CHAMPION_STATS,
            &Query::new().opt_param("role", role),
        )
    }

    fn champion_win_rate(
        &self,
        min_games: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value, AppError> {
        let query = Query::new()
            .opt_param("minGames", min_games)
            .opt_param("limit", limit);
        self.get(endpoints::CHAMPION_WIN_RATE, &query)
    }

    fn kda_ranking(
        &self,
        role: Option<Role>,
        min_games: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value, AppError> {
        let query = Query::new()
            .opt_param("role", role)
            .opt_param("minGames", min_games)
            .opt_param("limit", limit);
        self.get(endpoints::KDA_RANKING, &query)
    }

    fn pick_rates(&self, min_games: Option<u32>) -> Result<Value, AppError> {
        self.get(
            endpoints::PICK_RATE,
            &Query::new().opt_param("minGames", min_games),
        )
    }

    fn champion_matches(&self, champion: &str, limit: Option<u32>) -> Result<Value, AppError> {
        let path = format!("/champions/{}/matches", encode_segment(champion));
        self.get(&path, &Query::new().opt_param("limit", limit))
    }

    fn champion_best_matches(&self, champion: &str, limit: Option<u32>) -> Result<Value, AppError> {
        let path = format!("/champions/{}/best-matches", encode_segment(champion));
        let limit = limit.unwrap_or(endpoints::DEFAULT_CHAMPION_MATCH_LIMIT);
        self.get(&path, &Query::new().param("limit", limit))
    }

    fn champion_worst_matches(
        &self,
        champion: &str,
        limit: Option<u32>,
    ) -> Result<Value, AppError> {
        let path = format!("/champions/{}/worst-matches", encode_segment(champion));
        let limit = limit.unwrap_or(endpoints::DEFAULT_CHAMPION_MATCH_LIMIT);
        self.get(&path, &Query::new().param("limit", limit))
    }

    fn correlations(&self) -> Result<Value, AppError> {
        self.get(endpoints::CORRELATIONS, &Query::new())
    }

    fn kda_vs_win(&self) -> Result<Value, AppError> {
        self.get(endpoints::KDA_VS_WIN, &Query::new())
    }

    fn advanced_correlations(&self) -> Result<Value, AppError> {
        self.get(endpoints::ADVANCED_CORRELATIONS, &Query::new())
    }
}

impl<G: StatsGateway + ?Sized> GatewayExt for G {}
