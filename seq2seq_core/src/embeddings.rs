// seq2seq_core/src/embeddings.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Слой эмбеддингов: токены + позиционная информация + дропаут.
//!
//! Нормализация здесь не применяется: эмбеддинги остаются чистой суммой, а `LayerNorm`
//! выполняется внутри каждого блока.

use burn::{
    module::Module,
    nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig},
    tensor::{backend::Backend, Bool, ElementConversion, Int, Tensor},
};
use tracing::debug;

use crate::{
    config::TransformerConfig,
    mask::padding_mask,
    positional::PositionalInformation,
    state::{dropout_if_training, HiddenState},
    TransformerError,
};

/// Эмбеддинги одного словаря.
#[derive(Module, Debug)]
pub struct Embeddings<B: Backend> {
    /// Таблица токенов `[vocab_size, hidden_size]`.
    token_embeddings: Embedding<B>,
    /// Стратегия позиционной информации.
    positional_information: PositionalInformation<B>,
    /// Дропаут с `hidden_dropout_prob`.
    dropout: Dropout,
    /// Размер словаря, нужен для проверки идентификаторов до обращения к таблице.
    vocab_size: usize,
}

impl<B: Backend> Embeddings<B> {
    /// Создает эмбеддинги для словаря размера `vocab_size`.
    ///
    /// # Errors
    /// `TransformerError::InvalidConfig`, если конфигурация невалидна или словарь пуст.
    pub fn new(
        config: &TransformerConfig,
        vocab_size: usize,
        device: &B::Device,
    ) -> Result<Self, TransformerError> {
        config.validate()?;
        if vocab_size == 0 {
            return Err(TransformerError::InvalidConfig(
                "размер словаря должен быть больше нуля".to_string(),
            ));
        }

        Ok(Self {
            token_embeddings: EmbeddingConfig::new(vocab_size, config.hidden_size).init(device),
            positional_information: PositionalInformation::new(config, device),
            dropout: DropoutConfig::new(config.hidden_dropout_prob).init(),
            vocab_size,
        })
    }

    /// Размер словаря.
    #[must_use]
    pub const fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Используемая стратегия позиционной информации.
    #[must_use]
    pub const fn positional_information(&self) -> &PositionalInformation<B> {
        &self.positional_information
    }

    /// Маска паддинга для идентификаторов: `true` там, где `input_ids != 0`.
    pub fn compute_mask(input_ids: Tensor<B, 2, Int>) -> Tensor<B, 2, Bool> {
        padding_mask(input_ids)
    }

    /// Эмбеддинги токенов плюс позиционная информация, вместе с маской паддинга.
    ///
    /// # Errors
    /// - `IncompatibleShape` для пустой последовательности;
    /// - `TokenOutOfVocabulary`, если идентификатор вне `[0, vocab_size)`;
    /// - `SequenceTooLong` от обучаемой таблицы позиций.
    pub fn forward(
        &self,
        input_ids: Tensor<B, 2, Int>,
        training: bool,
    ) -> Result<HiddenState<B>, TransformerError> {
        let [batch_size, seq_len] = input_ids.dims();
        if batch_size == 0 || seq_len == 0 {
            return Err(TransformerError::IncompatibleShape(format!(
                "ожидается непустой тензор идентификаторов, получено [{batch_size}, {seq_len}]"
            )));
        }
        self.check_vocabulary(&input_ids)?;
        debug!(batch_size, seq_len, training, "Вычисление эмбеддингов");

        let positional_info = self.positional_information.forward(&input_ids)?;
        let mask = Self::compute_mask(input_ids.clone());

        let hidden = self.token_embeddings.forward(input_ids) + positional_info;
        let hidden = dropout_if_training(&self.dropout, hidden, training);

        Ok(HiddenState::new(hidden, mask))
    }

    /// Проверяет, что все идентификаторы помещаются в таблицу токенов.
    ///
    /// Для корректного входа выполняется одна редукция; недопустимый идентификатор
    /// ищется только при ошибке.
    fn check_vocabulary(&self, input_ids: &Tensor<B, 2, Int>) -> Result<(), TransformerError> {
        #[allow(clippy::cast_possible_wrap)]
        let vocab_size = self.vocab_size as i64;

        let out_of_range = Tensor::cat(
            vec![
                input_ids.clone().lower_elem(0),
                input_ids.clone().greater_equal_elem(vocab_size),
            ],
            1,
        );
        let has_out_of_range: i64 = out_of_range.any().int().into_scalar().elem();
        if has_out_of_range == 0 {
            return Ok(());
        }

        let min_id: i64 = input_ids.clone().min().into_scalar().elem();
        let token_id = if min_id < 0 {
            min_id
        } else {
            input_ids.clone().max().into_scalar().elem()
        };
        Err(TransformerError::TokenOutOfVocabulary {
            token_id,
            vocab_size: self.vocab_size,
        })
    }
}
