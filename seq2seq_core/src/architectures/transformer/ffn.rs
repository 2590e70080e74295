// seq2seq_core/src/architectures/transformer/ffn.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Позиционная полносвязная сеть (Feed-Forward Network, FFN).
//!
//! `output = dropout(linear_2(gelu(linear_1(x))))`, форма выхода совпадает с формой входа.

use burn::{
    module::Module,
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    tensor::{activation::gelu, backend::Backend, Tensor},
};

use crate::{config::TransformerConfig, state::dropout_if_training};

/// Двухслойная позиционная сеть с активацией GELU.
#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    /// Расширяющая проекция `hidden_size -> intermediate_size`.
    linear_1: Linear<B>,
    /// Сжимающая проекция `intermediate_size -> hidden_size`.
    linear_2: Linear<B>,
    /// Дропаут выхода.
    dropout: Dropout,
}

impl<B: Backend> FeedForward<B> {
    /// Создает слой по конфигурации.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Self {
        Self {
            linear_1: LinearConfig::new(config.hidden_size, config.intermediate_size).init(device),
            linear_2: LinearConfig::new(config.intermediate_size, config.hidden_size).init(device),
            dropout: DropoutConfig::new(config.hidden_dropout_prob).init(),
        }
    }

    /// Прямой проход, `[batch_size, seq_len, hidden_size] -> [batch_size, seq_len, hidden_size]`.
    pub fn forward(&self, hidden_states: Tensor<B, 3>, training: bool) -> Tensor<B, 3> {
        let intermediate = gelu(self.linear_1.forward(hidden_states));
        let output = self.linear_2.forward(intermediate);
        dropout_if_training(&self.dropout, output, training)
    }
}
