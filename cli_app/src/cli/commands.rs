// cli_app/src/cli/commands.rs

//! Подкоманды и их аргументы.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::runner::parse_token_ids;

/// Подкоманды `seq2seq-cli`.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Строит модель и выполняет прямой проход в режиме инференса.
    Forward(ForwardArgs),

    /// Печатает сводку о модели в формате JSON.
    Summary(SummaryArgs),

    /// Записывает `TransformerConfig` по умолчанию в JSON-файл.
    WriteModelConfig(WriteModelConfigArgs),
}

/// Аргументы команды `forward`.
#[derive(Args, Debug)]
pub struct ForwardArgs {
    /// Путь к TOML-файлу конфигурации
    #[arg(long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Исходная последовательность, идентификаторы через запятую (0 = паддинг).
    /// Повторите флаг для каждого элемента батча.
    #[arg(long = "source", required = true, value_parser = parse_token_ids)]
    pub sources: Vec<Vec<i64>>,

    /// Целевая последовательность, идентификаторы через запятую.
    /// Количество флагов должно совпадать с `--source`.
    #[arg(long = "target", required = true, value_parser = parse_token_ids)]
    pub targets: Vec<Vec<i64>>,
}

/// Аргументы команды `summary`.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Путь к TOML-файлу конфигурации
    #[arg(long, default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Аргументы команды `write-model-config`.
#[derive(Args, Debug)]
pub struct WriteModelConfigArgs {
    /// Куда записать конфигурацию модели
    #[arg(long, default_value = "model_config.json")]
    pub out: PathBuf,
}
