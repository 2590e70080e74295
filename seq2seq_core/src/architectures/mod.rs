// seq2seq_core/src/architectures/mod.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Корневой модуль архитектур и общих типов для их описания.

pub mod transformer;

use serde::{Deserialize, Serialize};

use crate::config::PositionalInformationType;

/// Мета-информация о построенной модели.
///
/// Используется высокоуровневым кодом (например, CLI) для вывода сводки.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    /// Размер словаря источника.
    pub source_vocab_size: usize,
    /// Размер словаря цели (ширина логитов).
    pub target_vocab_size: usize,
    /// Размерность скрытого состояния.
    pub hidden_size: usize,
    /// Количество голов внимания.
    pub num_attention_heads: usize,
    /// Количество блоков в каждом из стеков.
    pub num_blocks: usize,
    /// Стратегия позиционной информации.
    pub positional_information_type: PositionalInformationType,
    /// Общее количество обучаемых параметров.
    pub num_params: usize,
}
