use once_cell::sync::Lazy;

pub mod card;
pub mod database;
pub mod deck;
pub mod text_utils;

pub(crate) static AGENT: Lazy<ureq::Agent> = Lazy::new(|| {
    ureq::Agent::config_builder()
        .timeout_connect(Some(std::time::Duration::from_secs(5)))
        .user_agent(concat!("grimoire/", env!("CARGO_PKG_VERSION")))
        .build()
        .into()
});
