// utils_crate/src/config.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Многоуровневая конфигурация приложения.
//!
//! Слои (от младшего к старшему): значения по умолчанию, TOML-файл (опционально),
//! переменные окружения с префиксом. Для префикса `SEQ2SEQ` переменная
//! `SEQ2SEQ__MODEL__HIDDEN_SIZE=256` переопределяет `model.hidden_size`.

use std::path::{Path, PathBuf};

use ::config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::UtilsError;

/// Разделитель уровней вложенности в именах переменных окружения.
pub const ENV_SEPARATOR: &str = "__";

/// Глобальная конфигурация приложения.
///
/// `M` — раздел с гиперпараметрами модели; он обязателен, остальные разделы имеют значения по умолчанию.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig<M> {
    /// Гиперпараметры модели.
    pub model: M,

    /// Размеры словарей.
    #[serde(default)]
    pub vocab: VocabSettings,

    /// Настройки логирования.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Размеры словарей источника и цели.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabSettings {
    /// Размер словаря исходного языка.
    #[serde(default = "default_vocab_size")]
    pub source_vocab_size: usize,
    /// Размер словаря целевого языка.
    #[serde(default = "default_vocab_size")]
    pub target_vocab_size: usize,
}

const fn default_vocab_size() -> usize {
    1000
}

impl Default for VocabSettings {
    fn default() -> Self {
        Self {
            source_vocab_size: default_vocab_size(),
            target_vocab_size: default_vocab_size(),
        }
    }
}

/// Настройки логирования (раздел `[logging]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Уровень логирования приложения (`trace`, `debug`, `info`, `warn`, `error`).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Выводить логи в консоль в формате JSON.
    #[serde(default)]
    pub json: bool,
    /// Директория для файлов логов с ежедневной ротацией. Без нее логи пишутся только в консоль.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            log_dir: None,
        }
    }
}

/// Обертка, помещающая значения по умолчанию модели в раздел `model`.
#[derive(Serialize)]
struct ModelDefaults<'a, D> {
    model: &'a D,
}

impl<M: DeserializeOwned> AppConfig<M> {
    /// Загружает конфигурацию из TOML-файла и переменных окружения с префиксом `env_prefix`.
    ///
    /// Отсутствующий файл не является ошибкой: выводится предупреждение, и используются
    /// только переменные окружения и значения по умолчанию.
    ///
    /// # Errors
    /// `UtilsError::Config`, если файл не разбирается, значение имеет неверный тип
    /// или отсутствует обязательный раздел `model`.
    pub fn load(path: Option<&Path>, env_prefix: &str) -> Result<Self, UtilsError> {
        Self::load_layers(Config::builder(), path, env_prefix)
    }

    /// Как [`AppConfig::load`], но раздел `model` сначала заполняется из `model_defaults`.
    ///
    /// Нужен для типов, чьи значения по умолчанию не выражены через `#[serde(default)]`
    /// (например, `#[derive(burn::config::Config)]`). Файл и переменные окружения
    /// переопределяют эти значения поле за полем.
    ///
    /// # Errors
    /// Те же, что у [`AppConfig::load`], плюс `UtilsError::Config`, если `model_defaults`
    /// не сериализуется в дерево конфигурации.
    pub fn load_with_model_defaults<D: Serialize>(
        path: Option<&Path>,
        env_prefix: &str,
        model_defaults: &D,
    ) -> Result<Self, UtilsError> {
        let defaults = Config::try_from(&ModelDefaults { model: model_defaults })?;
        Self::load_layers(Config::builder().add_source(defaults), path, env_prefix)
    }

    fn load_layers(
        mut builder: ConfigBuilder<DefaultState>,
        path: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self, UtilsError> {
        if let Some(path) = path {
            if path.exists() {
                debug!(path = %path.display(), "Загрузка конфигурации из файла");
            } else {
                warn!(
                    path = %path.display(),
                    "Файл конфигурации не найден, используются переменные окружения и значения по умолчанию"
                );
            }
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize().map_err(|e| {
            UtilsError::Config(format!("Не удалось разобрать конфигурацию приложения: {e}"))
        })
    }
}
