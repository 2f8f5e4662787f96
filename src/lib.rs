pub mod api_football;
pub mod config;
pub mod dossier;
pub mod extract;
pub mod fallback;
pub mod fixture_fetch;
pub mod geocode;
pub mod h2h;
pub mod http_cache;
pub mod http_client;
pub mod injury_fetch;
pub mod lineup_fetch;
pub mod market_values;
pub mod match_input;
pub mod optimize;
pub mod referee_fetch;
pub mod standings_fetch;
pub mod storage;
pub mod team_search;
pub mod team_stats;
pub mod understat_fetch;
pub mod weather_fetch;
