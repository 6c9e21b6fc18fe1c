// Gateway paths, relative to the configured `/api` base URL

pub const MATCHES: &str = "/matches";
pub const CHAMPION_STATS: &str = "/champions/stats";
pub const CHAMPION_WIN_RATE: &str = "/champions/win-rate";
pub const KDA_RANKING: &str = "/champions/kda-ranking";
pub const PICK_RATE: &str = "/champions/roles/pick-rate";
pub const CORRELATIONS: &str = "/stats/correlations";
pub const KDA_VS_WIN: &str = "/stats/kda-vs-win";
pub const ADVANCED_CORRELATIONS: &str = "/stats/advanced-correlations";

pub const DEFAULT_CHAMPION_MATCH_LIMIT: u32 = 20;

/// Flat query parameters for a gateway request.
///
/// Values are stringified on insertion. Absent and empty values are dropped
/// so they never reach the wire as `""` or `"undefined"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    pub fn opt_param<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_values_are_omitted() {
        let query = Query::new()
            .param("champion", "")
            .opt_param::<&str>("role", None)
            .param("limit", 100)
            .opt_param("minGames", Some(20));

        let pairs: Vec<_> = query.pairs().collect();
        assert_eq!(pairs, vec![("limit", "100"), ("minGames", "20")]);
    }

    #[test]
    fn whitespace_only_value_is_omitted() {
        assert!(Query::new().param("champion", "   ").is_empty());
    }
}
