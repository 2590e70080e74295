// seq2seq_core/src/positional.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Позиционная информация для эмбеддингов.
//!
//! Обе стратегии реализуют один и тот же контракт:
//! `forward(input_ids [batch, seq_len]) -> [batch, seq_len, hidden_size]`.
//! Стратегия выбирается один раз при построении по `TransformerConfig::positional_information_type`.

use burn::{
    module::Module,
    nn::{Embedding, EmbeddingConfig},
    tensor::{backend::Backend, Int, Tensor, TensorData},
};

use crate::{
    config::{PositionalInformationType, TransformerConfig},
    TransformerError,
};

/// Базовое значение для частот синусоидального кодирования.
const SINUSOIDAL_BASE: f64 = 10_000.0;

/// Обучаемая таблица позиций `[max_position_embeddings, hidden_size]`.
#[derive(Module, Debug)]
pub struct LearnedPositionalEmbedding<B: Backend> {
    /// Таблица эмбеддингов позиций.
    embeddings: Embedding<B>,
    /// Количество строк таблицы (максимальная длина последовательности).
    max_position_embeddings: usize,
}

impl<B: Backend> LearnedPositionalEmbedding<B> {
    /// Создает таблицу позиций со случайной инициализацией.
    pub fn new(max_position_embeddings: usize, hidden_size: usize, device: &B::Device) -> Self {
        Self {
            embeddings: EmbeddingConfig::new(max_position_embeddings, hidden_size).init(device),
            max_position_embeddings,
        }
    }

    /// Возвращает эмбеддинги позиций `0..seq_len`, одинаковые для всех строк батча.
    ///
    /// # Errors
    /// `TransformerError::SequenceTooLong`, если `seq_len > max_position_embeddings`.
    pub fn forward(&self, input_ids: &Tensor<B, 2, Int>) -> Result<Tensor<B, 3>, TransformerError> {
        let [batch_size, seq_len] = input_ids.dims();
        if seq_len > self.max_position_embeddings {
            return Err(TransformerError::SequenceTooLong {
                seq_len,
                max_len: self.max_position_embeddings,
            });
        }

        // usize -> i64: seq_len ограничен размером таблицы, переполнения нет.
        #[allow(clippy::cast_possible_wrap)]
        let position_ids = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &input_ids.device())
            .reshape([1, seq_len])
            .expand([batch_size, seq_len]);

        Ok(self.embeddings.forward(position_ids))
    }
}

/// Синусоидальное позиционное кодирование без обучаемых параметров.
///
/// `pe[pos, i] = sin(pos / 10000^(2*floor(i/2)/hidden_size))` для четных `i`
/// и `cos(...)` той же частоты для нечетных. Таблица строится под фактическую длину
/// последовательности, поэтому ограничения на длину нет.
#[derive(Module, Clone, Debug)]
pub struct SinusoidalPositionalEncoding {
    /// Размерность кодирования (совпадает с `hidden_size`).
    hidden_size: usize,
}

impl SinusoidalPositionalEncoding {
    /// Создает кодирование заданной размерности.
    #[must_use]
    pub const fn new(hidden_size: usize) -> Self {
        Self { hidden_size }
    }

    /// Вычисляет таблицу `[seq_len, hidden_size]`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn table<B: Backend>(&self, seq_len: usize, device: &B::Device) -> Tensor<B, 2> {
        let dim = self.hidden_size;

        // Обратные частоты: 1 / base^(2k / dim), где k = floor(i / 2). Форма [1, dim].
        let inv_freq: Vec<f32> = (0..dim)
            .map(|i| {
                let exponent = (2 * (i / 2)) as f64 / dim as f64;
                SINUSOIDAL_BASE.powf(exponent).recip() as f32
            })
            .collect();
        let inv_freq = Tensor::<B, 1>::from_data(TensorData::new(inv_freq, [dim]), device).reshape([1, dim]);

        // Четные индексы берут sin, нечетные cos.
        let even: Vec<f32> = (0..dim).map(|i| if i % 2 == 0 { 1.0 } else { 0.0 }).collect();
        let even = Tensor::<B, 1>::from_data(TensorData::new(even, [dim]), device)
            .reshape([1, dim])
            .expand([seq_len, dim]);
        let odd = even.clone().neg().add_scalar(1.0);

        // Внешнее произведение позиций и частот: [seq_len, 1] x [1, dim] -> [seq_len, dim].
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, device)
            .float()
            .reshape([seq_len, 1]);
        let angles = positions.matmul(inv_freq);

        angles.clone().sin().mul(even) + angles.cos().mul(odd)
    }

    /// Возвращает кодирование позиций для каждого элемента батча.
    pub fn forward<B: Backend>(&self, input_ids: &Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = input_ids.dims();

        self.table::<B>(seq_len, &input_ids.device())
            .reshape([1, seq_len, self.hidden_size])
            .expand([batch_size, seq_len, self.hidden_size])
    }
}

/// Выбранная стратегия позиционной информации.
#[derive(Module, Debug)]
pub enum PositionalInformation<B: Backend> {
    /// Обучаемая таблица (`"embs"`).
    Learned(LearnedPositionalEmbedding<B>),
    /// Синусоидальная функция (`"sinu"`).
    Sinusoidal(SinusoidalPositionalEncoding),
}

impl<B: Backend> PositionalInformation<B> {
    /// Строит стратегию, указанную в конфигурации.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Self {
        match config.positional_information_type {
            PositionalInformationType::Learned => Self::Learned(LearnedPositionalEmbedding::new(
                config.max_position_embeddings,
                config.hidden_size,
                device,
            )),
            PositionalInformationType::Sinusoidal => {
                Self::Sinusoidal(SinusoidalPositionalEncoding::new(config.hidden_size))
            }
        }
    }

    /// Тип выбранной стратегии.
    #[must_use]
    pub const fn kind(&self) -> PositionalInformationType {
        match self {
            Self::Learned(_) => PositionalInformationType::Learned,
            Self::Sinusoidal(_) => PositionalInformationType::Sinusoidal,
        }
    }

    /// Позиционная информация `[batch_size, seq_len, hidden_size]` для данных идентификаторов.
    ///
    /// # Errors
    /// `TransformerError::SequenceTooLong` для обучаемой таблицы, если последовательность длиннее таблицы.
    pub fn forward(&self, input_ids: &Tensor<B, 2, Int>) -> Result<Tensor<B, 3>, TransformerError> {
        match self {
            Self::Learned(table) => table.forward(input_ids),
            Self::Sinusoidal(encoding) => Ok(encoding.forward(input_ids)),
        }
    }
}
