// utils_crate/src/error.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Общий тип ошибки утилит.

use std::path::Path;

use thiserror::Error;

/// Общий тип ошибки для утилит `utils_crate`.
#[derive(Error, Debug)]
pub enum UtilsError {
    /// Ошибка ввода-вывода с опциональным путем, на котором она возникла.
    #[error("Ошибка ввода-вывода{}: {source}", .path.as_ref().map(|p| format!(" ({p})")).unwrap_or_default())]
    Io {
        /// Исходная ошибка I/O.
        #[source]
        source: std::io::Error,
        /// Путь, связанный с ошибкой.
        path: Option<String>,
    },

    /// Ошибка конфигурации: не найден обязательный раздел, неверный тип значения и т.п.
    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    /// В утилиту передан неверный параметр.
    #[error("Неверный параметр: {0}")]
    InvalidParameter(String),

    /// Общая ошибка для случаев, не покрытых другими вариантами.
    #[error("Произошла общая ошибка утилиты: {0}")]
    Generic(String),
}

impl From<std::io::Error> for UtilsError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

impl From<::config::ConfigError> for UtilsError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl UtilsError {
    /// Создает `UtilsError::Io` с указанием пути.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().display().to_string()),
        }
    }
}
