// cli_app/src/cli/mod.rs

//! Разбор командной строки и маршрутизация по подкомандам.
//! Вся работа с моделью делегируется модулю `runner`.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use utils_crate::{init_tracing_logger, LoggingSettings};

use crate::runner::{self, APP_NAME};
use commands::{Commands, ForwardArgs, SummaryArgs, WriteModelConfigArgs};

/// Аргументы командной строки `seq2seq-cli`.
#[derive(Parser, Debug)]
#[command(
    name = "seq2seq-cli",
    version,
    about = "Построение encoder-decoder трансформера и прогон прямого прохода на CPU."
)]
pub struct Cli {
    /// Подкоманда
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Выполняет выбранную подкоманду.
    ///
    /// # Errors
    /// Любая ошибка загрузки конфигурации, построения модели или ввода-вывода.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Forward(args) => run_forward(args),
            Commands::Summary(args) => run_summary(args),
            Commands::WriteModelConfig(args) => run_write_model_config(&args),
        }
    }
}

fn run_forward(args: ForwardArgs) -> Result<()> {
    let app_config = runner::load_app_config(&args.config)?;
    init_tracing_logger(APP_NAME, &app_config.logging).context("Не удалось инициализировать логгер")?;

    let report = runner::run_forward(&app_config, &args.sources, &args.targets)?;

    let [batch_size, target_len, vocab_size] = report.logits_shape;
    println!("logits: [{batch_size}, {target_len}, {vocab_size}]");
    for (row, predictions) in report.predictions.iter().enumerate() {
        let tokens: Vec<String> = predictions.iter().map(ToString::to_string).collect();
        println!("batch[{row}] argmax: {}", tokens.join(","));
    }
    Ok(())
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let app_config = runner::load_app_config(&args.config)?;
    init_tracing_logger(APP_NAME, &app_config.logging).context("Не удалось инициализировать логгер")?;

    let info = runner::model_summary(&app_config)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&info).context("Не удалось сериализовать сводку модели")?
    );
    Ok(())
}

fn run_write_model_config(args: &WriteModelConfigArgs) -> Result<()> {
    init_tracing_logger(APP_NAME, &LoggingSettings::default()).context("Не удалось инициализировать логгер")?;

    runner::write_default_model_config(&args.out)?;
    println!("Конфигурация модели записана в {}", args.out.display());
    Ok(())
}
