// seq2seq_core/src/architectures/transformer/model.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Оркестрация encoder-decoder трансформера.
//!
//! Исходные идентификаторы -> эмбеддинги источника -> стек энкодера -> `encoder_output`;
//! целевые идентификаторы -> эмбеддинги цели -> стек декодера (с `encoder_output`)
//! -> дропаут -> выходная проекция -> логиты.

use burn::{
    module::Module,
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    tensor::{backend::Backend, Int, Tensor},
};
use tracing::{debug, info};

use super::{decoder::DecoderBlock, encoder::EncoderBlock};
use crate::{
    architectures::ModelInfo,
    config::TransformerConfig,
    embeddings::Embeddings,
    state::{dropout_if_training, HiddenState},
    TransformerError,
};

/// Вход модели: ровно два тензора идентификаторов `[batch_size, seq_len]`.
#[derive(Debug, Clone)]
pub struct Seq2SeqInput<B: Backend> {
    /// Идентификаторы исходной последовательности.
    pub encoder_inputs: Tensor<B, 2, Int>,
    /// Идентификаторы целевой последовательности.
    pub decoder_inputs: Tensor<B, 2, Int>,
}

impl<B: Backend> Seq2SeqInput<B> {
    /// Создает вход из двух тензоров идентификаторов.
    #[must_use]
    pub fn new(encoder_inputs: Tensor<B, 2, Int>, decoder_inputs: Tensor<B, 2, Int>) -> Self {
        Self {
            encoder_inputs,
            decoder_inputs,
        }
    }
}

/// Sequence-to-sequence трансформер.
///
/// Все эмбеддинги и блоки принадлежат только этому экземпляру; веса между энкодером,
/// декодером и двумя словарями не разделяются.
#[derive(Module, Debug)]
pub struct Transformer<B: Backend> {
    /// Эмбеддинги словаря источника.
    enc_embed_layer: Embeddings<B>,
    /// Эмбеддинги словаря цели.
    dec_embed_layer: Embeddings<B>,
    /// Стек блоков энкодера.
    encoder: Vec<EncoderBlock<B>>,
    /// Стек блоков декодера.
    decoder: Vec<DecoderBlock<B>>,
    /// Дропаут перед выходной проекцией (`final_dropout_prob`).
    dropout: Dropout,
    /// Проекция `hidden_size -> target_vocab_size`.
    output_layer: Linear<B>,
    hidden_size: usize,
    num_attention_heads: usize,
}

impl<B: Backend> Transformer<B> {
    /// Строит модель.
    ///
    /// # Errors
    /// `TransformerError::InvalidConfig` для невалидной конфигурации или пустых словарей.
    pub fn new(
        config: &TransformerConfig,
        source_vocab_size: usize,
        target_vocab_size: usize,
        device: &B::Device,
    ) -> Result<Self, TransformerError> {
        config.validate()?;

        let enc_embed_layer = Embeddings::new(config, source_vocab_size, device)?;
        let dec_embed_layer = Embeddings::new(config, target_vocab_size, device)?;
        let encoder = (0..config.num_blocks)
            .map(|_| EncoderBlock::new(config, device))
            .collect::<Result<Vec<_>, _>>()?;
        let decoder = (0..config.num_blocks)
            .map(|_| DecoderBlock::new(config, device))
            .collect::<Result<Vec<_>, _>>()?;

        let model = Self {
            enc_embed_layer,
            dec_embed_layer,
            encoder,
            decoder,
            dropout: DropoutConfig::new(config.final_dropout_prob).init(),
            output_layer: LinearConfig::new(config.hidden_size, target_vocab_size).init(device),
            hidden_size: config.hidden_size,
            num_attention_heads: config.num_attention_heads,
        };

        info!(
            source_vocab_size,
            target_vocab_size,
            hidden_size = config.hidden_size,
            num_blocks = config.num_blocks,
            num_attention_heads = config.num_attention_heads,
            positional = %config.positional_information_type,
            num_params = model.num_params(),
            "Модель Transformer инициализирована"
        );
        Ok(model)
    }

    /// Прогоняет исходную последовательность через эмбеддинги и стек энкодера.
    ///
    /// # Errors
    /// Ошибки эмбеддингов (пустой вход, идентификатор вне словаря, слишком длинная последовательность).
    pub fn encode(
        &self,
        source_ids: Tensor<B, 2, Int>,
        training: bool,
    ) -> Result<HiddenState<B>, TransformerError> {
        let mut state = self.enc_embed_layer.forward(source_ids, training)?;
        for encoder_layer in &self.encoder {
            state = encoder_layer.forward(state, training);
        }
        Ok(state)
    }

    /// Прогоняет целевую последовательность через декодер и возвращает логиты
    /// `[batch_size, target_len, target_vocab_size]`.
    ///
    /// Маска паддинга цели используется только внутри декодера и не покидает этот метод:
    /// логиты возвращаются без маски, чтобы функция потерь не маскировала позиции неявно.
    ///
    /// # Errors
    /// Ошибки эмбеддингов цели; `IncompatibleShape`, если размеры батча не совпадают.
    pub fn decode(
        &self,
        target_ids: Tensor<B, 2, Int>,
        encoder_output: &HiddenState<B>,
        training: bool,
    ) -> Result<Tensor<B, 3>, TransformerError> {
        let [encoder_batch, _, _] = encoder_output.dims();
        let [decoder_batch, _] = target_ids.dims();
        if encoder_batch != decoder_batch {
            return Err(TransformerError::IncompatibleShape(format!(
                "размер батча энкодера ({encoder_batch}) не совпадает с размером батча декодера ({decoder_batch})"
            )));
        }

        let mut state = self.dec_embed_layer.forward(target_ids, training)?;
        for decoder_layer in &self.decoder {
            state = decoder_layer.forward(state, encoder_output, training);
        }

        let (hidden_state, _target_mask) = state.into_parts();
        let hidden_state = dropout_if_training(&self.dropout, hidden_state, training);
        Ok(self.output_layer.forward(hidden_state))
    }

    /// Полный прямой проход: `encode` + `decode`.
    ///
    /// # Errors
    /// Любая ошибка `encode` или `decode`.
    pub fn forward(
        &self,
        inputs: Seq2SeqInput<B>,
        training: bool,
    ) -> Result<Tensor<B, 3>, TransformerError> {
        let Seq2SeqInput {
            encoder_inputs,
            decoder_inputs,
        } = inputs;
        let [batch_size, source_len] = encoder_inputs.dims();
        let [_, target_len] = decoder_inputs.dims();
        debug!(batch_size, source_len, target_len, training, "Прямой проход Transformer");

        let encoder_output = self.encode(encoder_inputs, training)?;
        self.decode(decoder_inputs, &encoder_output, training)
    }

    /// Краткая сводка о модели.
    #[must_use]
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            source_vocab_size: self.enc_embed_layer.vocab_size(),
            target_vocab_size: self.dec_embed_layer.vocab_size(),
            hidden_size: self.hidden_size,
            num_attention_heads: self.num_attention_heads,
            num_blocks: self.encoder.len(),
            positional_information_type: self.enc_embed_layer.positional_information().kind(),
            num_params: self.num_params(),
        }
    }
}
