// seq2seq_core/src/architectures/transformer/attention.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Scaled dot-product attention и multi-head attention.
//!
//! Каждая голова имеет собственные проекции Q, K, V размерности `head_dim`.
//! Выходы голов конкатенируются по последней оси и проходят через одну выходную проекцию.

use burn::{
    module::Module,
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    tensor::{activation::softmax, backend::Backend, Tensor},
};

use crate::{config::TransformerConfig, state::dropout_if_training, TransformerError};

/// Веса внимания `softmax(Q·K^T / sqrt(head_dim) + bias)`, форма `[batch_size, query_len, key_len]`.
///
/// Смещение `bias` добавляется ДО softmax; без масштабирования на `1/sqrt(head_dim)`
/// меняется температура softmax и веса обученной модели становятся несовместимы.
#[allow(clippy::cast_precision_loss)]
pub fn attention_weights<B: Backend>(
    query: Tensor<B, 3>,
    key: Tensor<B, 3>,
    bias: Option<Tensor<B, 3>>,
) -> Tensor<B, 3> {
    let head_dim = query.dims()[2];

    let scores = query
        .matmul(key.swap_dims(1, 2))
        .div_scalar((head_dim as f64).sqrt());
    let scores = match bias {
        Some(bias) => scores + bias,
        None => scores,
    };

    softmax(scores, 2)
}

/// Вычисляет `softmax(Q·K^T / sqrt(head_dim) + bias) · V`.
///
/// # Аргументы
/// * `query`: `[batch_size, query_len, head_dim]`.
/// * `key`: `[batch_size, key_len, head_dim]`.
/// * `value`: `[batch_size, key_len, head_dim]`.
/// * `bias`: аддитивное смещение `[batch_size, query_len, key_len]`.
///
/// # Возвращает
/// Кортеж `(выход [batch_size, query_len, head_dim], веса внимания [batch_size, query_len, key_len])`.
pub fn scaled_dot_product_attention<B: Backend>(
    query: Tensor<B, 3>,
    key: Tensor<B, 3>,
    value: Tensor<B, 3>,
    bias: Option<Tensor<B, 3>>,
) -> (Tensor<B, 3>, Tensor<B, 3>) {
    let weights = attention_weights(query, key, bias);
    (weights.clone().matmul(value), weights)
}

/// Одна голова внимания со своими проекциями Q, K, V.
#[derive(Module, Debug)]
pub struct AttentionHead<B: Backend> {
    /// Проекция для Query: `hidden_size -> head_dim`.
    q: Linear<B>,
    /// Проекция для Key: `hidden_size -> head_dim`.
    k: Linear<B>,
    /// Проекция для Value: `hidden_size -> head_dim`.
    v: Linear<B>,
    /// Дропаут весов внимания.
    attn_dropout: Dropout,
}

impl<B: Backend> AttentionHead<B> {
    /// Создает голову с проекциями `hidden_size -> head_dim`.
    pub fn new(hidden_size: usize, head_dim: usize, attention_dropout_prob: f64, device: &B::Device) -> Self {
        Self {
            q: LinearConfig::new(hidden_size, head_dim).init(device),
            k: LinearConfig::new(hidden_size, head_dim).init(device),
            v: LinearConfig::new(hidden_size, head_dim).init(device),
            attn_dropout: DropoutConfig::new(attention_dropout_prob).init(),
        }
    }

    /// Прямой проход одной головы, выход `[batch_size, query_len, head_dim]`.
    pub fn forward(
        &self,
        query: Tensor<B, 3>,
        key: Tensor<B, 3>,
        value: Tensor<B, 3>,
        bias: Option<Tensor<B, 3>>,
        training: bool,
    ) -> Tensor<B, 3> {
        let query = self.q.forward(query);
        let key = self.k.forward(key);
        let value = self.v.forward(value);

        let weights = attention_weights(query, key, bias);
        dropout_if_training(&self.attn_dropout, weights, training).matmul(value)
    }
}

/// Multi-head attention: `num_attention_heads` независимых голов и выходная проекция.
#[derive(Module, Debug)]
pub struct MultiHeadAttention<B: Backend> {
    /// Головы внимания, каждая владеет своими весами.
    heads: Vec<AttentionHead<B>>,
    /// Выходная проекция `hidden_size -> hidden_size`.
    output_linear: Linear<B>,
    /// Размерность одной головы.
    head_dim: usize,
}

impl<B: Backend> MultiHeadAttention<B> {
    /// Создает слой внимания по конфигурации.
    ///
    /// # Errors
    /// `TransformerError::InvalidConfig`, если `hidden_size` не делится на количество голов.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Result<Self, TransformerError> {
        config.validate()?;
        let head_dim = config.head_dim();

        let heads = (0..config.num_attention_heads)
            .map(|_| {
                AttentionHead::new(
                    config.hidden_size,
                    head_dim,
                    config.attention_dropout_prob,
                    device,
                )
            })
            .collect();

        Ok(Self {
            heads,
            output_linear: LinearConfig::new(config.hidden_size, config.hidden_size).init(device),
            head_dim,
        })
    }

    /// Количество голов.
    #[must_use]
    pub fn num_heads(&self) -> usize {
        self.heads.len()
    }

    /// Размерность одной головы.
    #[must_use]
    pub const fn head_dim(&self) -> usize {
        self.head_dim
    }

    /// Прямой проход.
    ///
    /// Для self-attention `query`, `key` и `value` совпадают; для cross-attention
    /// `query` берется из декодера, а `key`/`value` из выхода энкодера.
    ///
    /// # Возвращает
    /// Тензор `[batch_size, query_len, hidden_size]`.
    pub fn forward(
        &self,
        query: Tensor<B, 3>,
        key: Tensor<B, 3>,
        value: Tensor<B, 3>,
        bias: Option<Tensor<B, 3>>,
        training: bool,
    ) -> Tensor<B, 3> {
        let head_outputs: Vec<Tensor<B, 3>> = self
            .heads
            .iter()
            .map(|head| {
                head.forward(
                    query.clone(),
                    key.clone(),
                    value.clone(),
                    bias.clone(),
                    training,
                )
            })
            .collect();

        self.output_linear.forward(Tensor::cat(head_outputs, 2))
    }
}
