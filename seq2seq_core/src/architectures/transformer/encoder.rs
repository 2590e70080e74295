// seq2seq_core/src/architectures/transformer/encoder.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Блок энкодера с post-norm residual.
//!
//! Порядок фиксирован:
//! 1. `h = LayerNorm(MultiHeadAttention(h, h, h) + h)`;
//! 2. `h = LayerNorm(FeedForward(h) + h)`;
//! 3. `h = Dropout(h)` (только в режиме обучения).

use burn::{
    module::Module,
    nn::{Dropout, DropoutConfig, LayerNorm, LayerNormConfig},
    tensor::backend::Backend,
};

use super::{attention::MultiHeadAttention, ffn::FeedForward};
use crate::{
    config::TransformerConfig,
    state::{dropout_if_training, HiddenState},
    TransformerError,
};

/// Один блок энкодера. Трансформер владеет `num_blocks` независимыми экземплярами.
#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    /// Self-attention.
    multihead_attention: MultiHeadAttention<B>,
    /// Нормализация после внимания.
    norm_1: LayerNorm<B>,
    /// Нормализация после feed-forward.
    norm_2: LayerNorm<B>,
    /// Позиционная сеть.
    feed_forward: FeedForward<B>,
    /// Финальный дропаут блока.
    dropout: Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    /// Создает блок по конфигурации.
    ///
    /// # Errors
    /// Ошибки конфигурации слоя внимания.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Result<Self, TransformerError> {
        Ok(Self {
            multihead_attention: MultiHeadAttention::new(config, device)?,
            norm_1: LayerNormConfig::new(config.hidden_size)
                .with_epsilon(config.layer_norm_eps)
                .init(device),
            norm_2: LayerNormConfig::new(config.hidden_size)
                .with_epsilon(config.layer_norm_eps)
                .init(device),
            feed_forward: FeedForward::new(config, device),
            dropout: DropoutConfig::new(config.hidden_dropout_prob).init(),
        })
    }

    /// Прямой проход. Маска паддинга не меняется и возвращается вместе с новым состоянием.
    ///
    /// Self-attention энкодера выполняется без маски: все позиции, включая паддинг,
    /// видят друг друга. Паддинг источника маскируется только в cross-attention декодера.
    pub fn forward(&self, input: HiddenState<B>, training: bool) -> HiddenState<B> {
        let (hidden_state, padding_mask) = input.into_parts();

        let attention_output = self.multihead_attention.forward(
            hidden_state.clone(),
            hidden_state.clone(),
            hidden_state.clone(),
            None,
            training,
        );
        let hidden_state = self.norm_1.forward(attention_output + hidden_state);

        let feed_forward_output = self.feed_forward.forward(hidden_state.clone(), training);
        let hidden_state = self.norm_2.forward(feed_forward_output + hidden_state);

        let hidden_state = dropout_if_training(&self.dropout, hidden_state, training);
        HiddenState::new(hidden_state, padding_mask)
    }
}
