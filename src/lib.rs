rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod i18n;
pub mod launcher;
pub mod logging;
pub mod utils;
