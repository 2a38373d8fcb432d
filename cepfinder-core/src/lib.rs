pub mod config;
pub mod error;
pub mod http_client;
pub mod model;
pub mod normalizer;
pub mod provider;
pub mod provider_factory;
pub mod providers;
pub mod race;
pub mod server;
pub mod telemetry;
#[cfg(test)]
pub mod test_util;
