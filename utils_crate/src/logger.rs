// utils_crate/src/logger.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Инициализация глобального логгера на основе `tracing`.

use std::{fs, io};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::{config::LoggingSettings, error::UtilsError};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Строит фильтр: `RUST_LOG` (если задан) плюс явный уровень для приложения и `seq2seq_core`.
///
/// # Errors
/// `UtilsError::InvalidParameter`, если уровень не разбирается как директива `EnvFilter`.
pub fn build_env_filter(app_name: &str, level: &str) -> Result<EnvFilter, UtilsError> {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Дефисы в имени бинарника становятся подчеркиваниями в имени target.
    let sanitized_app_name = app_name.replace('-', "_");

    let targets = [sanitized_app_name.as_str(), "seq2seq_core", "utils_crate"];
    let filter = targets.into_iter().try_fold(base, |filter, target| {
        let directive = format!("{target}={level}").parse().map_err(|e| {
            UtilsError::InvalidParameter(format!("неверный уровень логирования '{level}': {e}"))
        })?;
        Ok::<_, UtilsError>(filter.add_directive(directive))
    })?;
    Ok(filter)
}

/// Инициализирует глобальный подписчик `tracing`.
///
/// Вывод в консоль (stderr) в «красивом» или JSON формате и, если задана `log_dir`,
/// в файл `<app_name>.log` с ежедневной ротацией.
///
/// # Errors
/// * `UtilsError::InvalidParameter` при неверном уровне логирования.
/// * `UtilsError::Io` если не удалось создать директорию логов.
/// * `UtilsError::Generic` если глобальный подписчик уже установлен.
#[allow(clippy::module_name_repetitions)]
pub fn init_tracing_logger(app_name: &str, settings: &LoggingSettings) -> Result<(), UtilsError> {
    let console_filter = build_env_filter(app_name, &settings.level)?;

    let console_layer: BoxedLayer = if settings.json {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .pretty()
            .with_filter(console_filter)
            .boxed()
    };

    let mut layers = vec![console_layer];

    if let Some(dir) = &settings.log_dir {
        fs::create_dir_all(dir).map_err(|e| UtilsError::io_with_path(e, dir))?;

        let file_appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_filter(build_env_filter(app_name, &settings.level)?)
            .boxed();
        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| UtilsError::Generic(format!("Не удалось инициализировать логгер: {e}")))?;

    match &settings.log_dir {
        Some(dir) => tracing::info!(
            level = %settings.level,
            json = settings.json,
            log_dir = %dir.display(),
            "Логгер инициализирован, логи дублируются в файл"
        ),
        None => tracing::info!(
            level = %settings.level,
            json = settings.json,
            "Логгер инициализирован, только вывод в консоль"
        ),
    }
    Ok(())
}
