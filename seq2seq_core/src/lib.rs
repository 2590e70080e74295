// seq2seq_core/src/lib.rs

// Включаем строгие правила линтинга для всего крейта.
#![warn(
    missing_docs, // Предупреждать об отсутствующей документации для публичных элементов.
    clippy::all, // Все стандартные проверки Clippy.
    clippy::pedantic, // Более строгие ("педантичные") проверки Clippy.
    clippy::nursery // Экспериментальные проверки Clippy (могут быть нестабильны).
)]
// Запрещаем использование небезопасных конструкций и потенциально проблемных методов.
#![deny(
    unsafe_code, // Запрет `unsafe` блоков без явного `allow`.
    clippy::unwrap_used, // Запрет использования `.unwrap()`.
    clippy::expect_used // Запрет использования `.expect()`.
)]

//! # `seq2seq_core`
//!
//! Вычислительный граф sequence-to-sequence трансформера (encoder-decoder) на
//! фреймворке [Burn](https://burn.dev/). Граф обобщен по бэкенду `B: Backend`.
//!
//! ## Структура
//!
//! - `config`: гиперпараметры модели (`TransformerConfig`) и их проверка.
//! - `error`: тип ошибки крейта.
//! - `mask`: маски паддинга и аддитивные смещения для внимания.
//! - `state`: пара «скрытое состояние + маска».
//! - `positional`: обучаемая и синусоидальная позиционная информация.
//! - `embeddings`: эмбеддинги токенов с позиционной информацией.
//! - `architectures`: внимание, блоки энкодера/декодера и сама модель.
//!
//! Поток данных: идентификаторы источника -> эмбеддинги -> энкодер -> `encoder_output`;
//! идентификаторы цели -> эмбеддинги -> декодер (с `encoder_output`) -> логиты.

pub mod architectures;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod mask;
pub mod positional;
pub mod state;

// Ошибки
pub use error::TransformerError;

// Конфигурация
pub use config::{PositionalInformationType, TransformerConfig};

// Компоненты модели
pub use embeddings::Embeddings;
pub use positional::{LearnedPositionalEmbedding, PositionalInformation, SinusoidalPositionalEncoding};
pub use state::HiddenState;

// Архитектура и сводка
pub use architectures::transformer::{
    attention_weights, scaled_dot_product_attention, AttentionHead, DecoderBlock, EncoderBlock, FeedForward,
    MultiHeadAttention, Seq2SeqInput, Transformer,
};
pub use architectures::ModelInfo;
