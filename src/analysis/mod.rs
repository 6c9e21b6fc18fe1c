pub mod champion_stats;
pub mod correlations;
pub mod overview;
pub mod rankings;
