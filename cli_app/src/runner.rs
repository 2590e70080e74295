// cli_app/src/runner.rs

//! Сценарии команд: загрузка конфигурации, построение модели и прямой проход.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use burn::{
    config::Config,
    tensor::{backend::Backend, Int, Tensor, TensorData},
};
use burn_ndarray::{NdArray, NdArrayDevice};
use seq2seq_core::{ModelInfo, Seq2SeqInput, Transformer, TransformerConfig};
use tracing::info;
use utils_crate::AppConfig;

/// Бэкенд, на котором CLI строит модель.
pub type CliBackend = NdArray<f32>;

/// Имя приложения для логгера и файла логов.
pub const APP_NAME: &str = "seq2seq-cli";

/// Префикс переменных окружения, например `SEQ2SEQ__MODEL__HIDDEN_SIZE`.
pub const ENV_PREFIX: &str = "SEQ2SEQ";

/// Результат команды `forward`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardReport {
    /// Форма логитов `[batch_size, target_len, target_vocab_size]`.
    pub logits_shape: [usize; 3],
    /// Наиболее вероятный токен для каждой позиции цели.
    pub predictions: Vec<Vec<i64>>,
}

/// Разбирает строку вида `"1,2,3,0,0"` в последовательность идентификаторов.
///
/// # Errors
/// Текстовое описание ошибки для `clap`, если строка пуста или содержит не-число.
pub fn parse_token_ids(input: &str) -> Result<Vec<i64>, String> {
    let ids = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|e| format!("'{part}' не является идентификатором токена: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err("последовательность не содержит ни одного токена".to_string());
    }
    Ok(ids)
}

/// Собирает батч `[batch_size, seq_len]` из строк одинаковой длины.
///
/// # Errors
/// Если батч пуст или строки имеют разную длину.
pub fn ids_tensor<B: Backend>(rows: &[Vec<i64>], device: &B::Device) -> Result<Tensor<B, 2, Int>> {
    let Some(first) = rows.first() else {
        bail!("батч пуст");
    };
    let seq_len = first.len();
    if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != seq_len) {
        bail!(
            "все последовательности батча должны иметь одинаковую длину (дополните нулями): \
             строка {index} имеет длину {}, ожидалось {seq_len}",
            row.len()
        );
    }

    let values: Vec<i64> = rows.iter().flatten().copied().collect();
    Ok(Tensor::from_data(TensorData::new(values, [rows.len(), seq_len]), device))
}

/// Поля `TransformerConfig` без значения по умолчанию; их обязан задать пользователь.
pub const REQUIRED_MODEL_FIELDS: [&str; 4] =
    ["hidden_size", "num_attention_heads", "intermediate_size", "num_blocks"];

/// Значения по умолчанию раздела `[model]`: все поля `TransformerConfig`,
/// кроме обязательных.
///
/// # Errors
/// Если конфигурация не сериализуется в JSON-объект.
pub fn model_config_defaults() -> Result<serde_json::Map<String, serde_json::Value>> {
    let prototype = serde_json::to_value(TransformerConfig::new(0, 0, 0, 0))
        .context("Не удалось сериализовать конфигурацию модели по умолчанию")?;
    let serde_json::Value::Object(mut defaults) = prototype else {
        bail!("конфигурация модели сериализуется не в объект");
    };
    for field in REQUIRED_MODEL_FIELDS {
        defaults.remove(field);
    }
    Ok(defaults)
}

/// Загружает конфигурацию приложения: значения по умолчанию модели, TOML-файл,
/// затем переменные окружения `SEQ2SEQ__*`.
///
/// # Errors
/// Ошибки чтения или разбора конфигурации.
pub fn load_app_config(path: &Path) -> Result<AppConfig<TransformerConfig>> {
    AppConfig::load_with_model_defaults(Some(path), ENV_PREFIX, &model_config_defaults()?)
        .with_context(|| format!("Не удалось загрузить конфигурацию из {}", path.display()))
}

/// Строит модель по конфигурации приложения.
///
/// # Errors
/// Невалидные гиперпараметры или размеры словарей.
pub fn build_model(app_config: &AppConfig<TransformerConfig>, device: &NdArrayDevice) -> Result<Transformer<CliBackend>> {
    app_config
        .model
        .init::<CliBackend>(
            app_config.vocab.source_vocab_size,
            app_config.vocab.target_vocab_size,
            device,
        )
        .context("Не удалось построить модель")
}

/// Выполняет прямой проход в режиме инференса и выбирает argmax по словарю цели.
///
/// # Errors
/// Ошибки построения модели, формы батча или самого прямого прохода.
pub fn run_forward(
    app_config: &AppConfig<TransformerConfig>,
    sources: &[Vec<i64>],
    targets: &[Vec<i64>],
) -> Result<ForwardReport> {
    let device = NdArrayDevice::default();
    let model = build_model(app_config, &device)?;

    let inputs = Seq2SeqInput::new(
        ids_tensor::<CliBackend>(sources, &device).context("Неверный батч --source")?,
        ids_tensor::<CliBackend>(targets, &device).context("Неверный батч --target")?,
    );
    let logits = model.forward(inputs, false).context("Ошибка прямого прохода")?;
    let logits_shape = logits.dims();
    let [batch_size, target_len, _] = logits_shape;

    let flat = logits
        .argmax(2)
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| anyhow!("Не удалось прочитать предсказания: {e:?}"))?;
    let predictions = flat.chunks(target_len.max(1)).map(<[i64]>::to_vec).collect();

    info!(batch_size, target_len, "Прямой проход завершен");
    Ok(ForwardReport {
        logits_shape,
        predictions,
    })
}

/// Строит модель и возвращает сводку о ней.
///
/// # Errors
/// Ошибки построения модели.
pub fn model_summary(app_config: &AppConfig<TransformerConfig>) -> Result<ModelInfo> {
    let model = build_model(app_config, &NdArrayDevice::default())?;
    Ok(model.info())
}

/// Конфигурация модели по умолчанию: 6 блоков, 8 голов, `hidden_size = 512`.
#[must_use]
pub fn default_model_config() -> TransformerConfig {
    TransformerConfig::new(512, 8, 2048, 6)
}

/// Записывает конфигурацию модели по умолчанию в JSON-файл.
///
/// # Errors
/// Ошибки записи файла.
pub fn write_default_model_config(out: &Path) -> Result<TransformerConfig> {
    let config = default_model_config();
    config
        .save(out)
        .with_context(|| format!("Не удалось записать конфигурацию модели в {}", out.display()))?;
    info!(path = %out.display(), "Конфигурация модели записана");
    Ok(config)
}
