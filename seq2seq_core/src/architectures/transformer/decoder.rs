// seq2seq_core/src/architectures/transformer/decoder.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Блок декодера: каузальный self-attention, cross-attention к выходу энкодера и feed-forward.
//!
//! Каждый подслой обернут в тот же post-norm residual, что и в энкодере.

use burn::{
    module::Module,
    nn::{Dropout, DropoutConfig, LayerNorm, LayerNormConfig},
    tensor::backend::Backend,
};

use super::{attention::MultiHeadAttention, ffn::FeedForward};
use crate::{
    config::TransformerConfig,
    mask::{decoder_self_attention_bias, key_padding_bias},
    state::{dropout_if_training, HiddenState},
    TransformerError,
};

/// Один блок декодера.
#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    self_attention: MultiHeadAttention<B>,
    cross_attention: MultiHeadAttention<B>,
    norm_1: LayerNorm<B>,
    norm_2: LayerNorm<B>,
    norm_3: LayerNorm<B>,
    feed_forward: FeedForward<B>,
    dropout: Dropout,
}

impl<B: Backend> DecoderBlock<B> {
    /// Создает блок по конфигурации.
    ///
    /// # Errors
    /// Ошибки конфигурации слоев внимания.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Result<Self, TransformerError> {
        let norm = || {
            LayerNormConfig::new(config.hidden_size)
                .with_epsilon(config.layer_norm_eps)
                .init(device)
        };

        Ok(Self {
            self_attention: MultiHeadAttention::new(config, device)?,
            cross_attention: MultiHeadAttention::new(config, device)?,
            norm_1: norm(),
            norm_2: norm(),
            norm_3: norm(),
            feed_forward: FeedForward::new(config, device),
            dropout: DropoutConfig::new(config.hidden_dropout_prob).init(),
        })
    }

    /// Прямой проход.
    ///
    /// * Self-attention: каузальная маска + паддинг целевой последовательности.
    /// * Cross-attention: запросы из декодера, ключи/значения из `encoder_output`,
    ///   маскируется только паддинг исходной последовательности.
    ///
    /// Возвращает новое состояние с маской паддинга целевой последовательности.
    pub fn forward(
        &self,
        input: HiddenState<B>,
        encoder_output: &HiddenState<B>,
        training: bool,
    ) -> HiddenState<B> {
        let (hidden_state, target_mask) = input.into_parts();
        let [_, target_len, _] = hidden_state.dims();

        let self_bias = decoder_self_attention_bias(target_mask.clone());
        let attention_output = self.self_attention.forward(
            hidden_state.clone(),
            hidden_state.clone(),
            hidden_state.clone(),
            Some(self_bias),
            training,
        );
        let hidden_state = self.norm_1.forward(attention_output + hidden_state);

        let cross_bias = key_padding_bias(encoder_output.padding_mask.clone(), target_len);
        let cross_output = self.cross_attention.forward(
            hidden_state.clone(),
            encoder_output.hidden.clone(),
            encoder_output.hidden.clone(),
            Some(cross_bias),
            training,
        );
        let hidden_state = self.norm_2.forward(cross_output + hidden_state);

        let feed_forward_output = self.feed_forward.forward(hidden_state.clone(), training);
        let hidden_state = self.norm_3.forward(feed_forward_output + hidden_state);

        let hidden_state = dropout_if_training(&self.dropout, hidden_state, training);
        HiddenState::new(hidden_state, target_mask)
    }
}
