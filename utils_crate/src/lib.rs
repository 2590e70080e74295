// utils_crate/src/lib.rs

#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! # `utils_crate`
//!
//! Общие утилиты для крейтов воркспейса:
//!
//! - `error`: общий тип ошибки `UtilsError`.
//! - `config`: многоуровневая конфигурация приложения (`AppConfig<M>`): TOML-файл и переменные окружения.
//! - `logger`: инициализация глобального подписчика `tracing`.

pub mod config;
pub mod error;
pub mod logger;

pub use crate::config::{AppConfig, LoggingSettings, VocabSettings};
pub use error::UtilsError;
pub use logger::init_tracing_logger;
