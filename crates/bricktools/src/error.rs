#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),
}
