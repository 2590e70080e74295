// seq2seq_core/src/config.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Гиперпараметры модели.
//!
//! `TransformerConfig` создается один раз до построения модели и после этого только читается.
//! Все проверки выполняются при построении (`validate`), а не при первом вызове `forward`.

use std::{fmt, str::FromStr};

use burn::{config::Config, tensor::backend::Backend};
use serde::{Deserialize, Serialize};

use crate::{architectures::transformer::Transformer, TransformerError};

/// Стратегия добавления позиционной информации к эмбеддингам токенов.
///
/// В конфигурационных файлах записывается строками `"embs"` и `"sinu"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionalInformationType {
    /// Обучаемая таблица позиций (`"embs"`).
    #[serde(rename = "embs")]
    Learned,
    /// Фиксированная синусоидальная функция (`"sinu"`).
    #[serde(rename = "sinu")]
    Sinusoidal,
}

impl PositionalInformationType {
    /// Каноническое строковое имя стратегии.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Learned => "embs",
            Self::Sinusoidal => "sinu",
        }
    }
}

impl fmt::Display for PositionalInformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionalInformationType {
    type Err = TransformerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embs" => Ok(Self::Learned),
            "sinu" => Ok(Self::Sinusoidal),
            other => Err(TransformerError::UnsupportedPositionalType(other.to_string())),
        }
    }
}

/// Конфигурация encoder-decoder трансформера.
///
/// Обязательные поля передаются в `TransformerConfig::new`, остальные имеют значения
/// по умолчанию и задаются через `with_*`. Сохранение и загрузка в JSON доступны через
/// трейт `burn::config::Config` (`save` / `load`).
#[derive(Config, Debug)]
pub struct TransformerConfig {
    /// Размерность скрытого состояния (и эмбеддингов).
    pub hidden_size: usize,
    /// Количество голов внимания; `hidden_size` должен делиться на него нацело.
    pub num_attention_heads: usize,
    /// Ширина промежуточного слоя feed-forward.
    pub intermediate_size: usize,
    /// Количество блоков энкодера и (столько же) блоков декодера.
    pub num_blocks: usize,
    /// Стратегия позиционной информации.
    #[config(default = "PositionalInformationType::Sinusoidal")]
    pub positional_information_type: PositionalInformationType,
    /// Размер обучаемой таблицы позиций (максимальная длина последовательности для `embs`).
    #[config(default = 512)]
    pub max_position_embeddings: usize,
    /// Вероятность дропаута внутри эмбеддингов и блоков.
    #[config(default = 0.1)]
    pub hidden_dropout_prob: f64,
    /// Вероятность дропаута перед выходной проекцией.
    #[config(default = 0.1)]
    pub final_dropout_prob: f64,
    /// Вероятность дропаута весов внимания (после softmax).
    #[config(default = 0.0)]
    pub attention_dropout_prob: f64,
    /// Эпсилон для `LayerNorm`.
    #[config(default = 1e-5)]
    pub layer_norm_eps: f64,
}

impl TransformerConfig {
    /// Размерность одной головы внимания (`hidden_size / num_attention_heads`).
    ///
    /// Возвращает 0, если количество голов равно нулю; такая конфигурация не проходит `validate`.
    #[must_use]
    pub const fn head_dim(&self) -> usize {
        if self.num_attention_heads == 0 {
            0
        } else {
            self.hidden_size / self.num_attention_heads
        }
    }

    /// Проверяет согласованность всех гиперпараметров.
    ///
    /// Собирает все нарушения сразу, чтобы пользователь увидел полный список.
    ///
    /// # Errors
    /// `TransformerError::InvalidConfig` с перечислением всех найденных проблем.
    pub fn validate(&self) -> Result<(), TransformerError> {
        let mut errors: Vec<String> = Vec::new();

        if self.hidden_size == 0 {
            errors.push("hidden_size должен быть больше нуля".to_string());
        }
        if self.num_attention_heads == 0 {
            errors.push("num_attention_heads должен быть больше нуля".to_string());
        } else if self.hidden_size % self.num_attention_heads != 0 {
            errors.push(format!(
                "hidden_size ({}) должен делиться на num_attention_heads ({})",
                self.hidden_size, self.num_attention_heads
            ));
        }
        if self.intermediate_size == 0 {
            errors.push("intermediate_size должен быть больше нуля".to_string());
        }
        if self.num_blocks == 0 {
            errors.push("num_blocks должен быть не меньше 1".to_string());
        }
        if self.max_position_embeddings == 0 {
            errors.push("max_position_embeddings должен быть больше нуля".to_string());
        }

        for (name, prob) in [
            ("hidden_dropout_prob", self.hidden_dropout_prob),
            ("final_dropout_prob", self.final_dropout_prob),
            ("attention_dropout_prob", self.attention_dropout_prob),
        ] {
            if !(0.0..1.0).contains(&prob) {
                errors.push(format!("{name} ({prob}) должен лежать в диапазоне [0, 1)"));
            }
        }

        if self.layer_norm_eps.is_nan() || self.layer_norm_eps <= 0.0 {
            errors.push(format!(
                "layer_norm_eps ({}) должен быть положительным",
                self.layer_norm_eps
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TransformerError::InvalidConfig(errors.join("; ")))
        }
    }

    /// Создает модель `Transformer` для заданных размеров словарей.
    ///
    /// # Errors
    /// Любая ошибка конфигурации, обнаруженная при построении.
    pub fn init<B: Backend>(
        &self,
        source_vocab_size: usize,
        target_vocab_size: usize,
        device: &B::Device,
    ) -> Result<Transformer<B>, TransformerError> {
        Transformer::new(self, source_vocab_size, target_vocab_size, device)
    }
}
