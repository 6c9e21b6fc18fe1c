pub mod analysis;
pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reference;
pub mod theme;
