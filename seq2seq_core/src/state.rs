// seq2seq_core/src/state.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Явная пара «скрытое состояние + маска паддинга», которая передается между блоками.

use burn::{
    nn::Dropout,
    tensor::{backend::Backend, Bool, Tensor},
};

/// Скрытое состояние `[batch_size, seq_len, hidden_size]` вместе с маской паддинга `[batch_size, seq_len]`.
///
/// Маска вычисляется один раз в `Embeddings` и без изменений проходит через блоки,
/// так как ни внимание, ни feed-forward не меняют длину последовательности.
#[derive(Debug, Clone)]
pub struct HiddenState<B: Backend> {
    /// Скрытое состояние.
    pub hidden: Tensor<B, 3>,
    /// `true` для позиций, которые не являются паддингом.
    pub padding_mask: Tensor<B, 2, Bool>,
}

impl<B: Backend> HiddenState<B> {
    /// Объединяет тензор и его маску в одну пару.
    #[must_use]
    pub fn new(hidden: Tensor<B, 3>, padding_mask: Tensor<B, 2, Bool>) -> Self {
        Self {
            hidden,
            padding_mask,
        }
    }

    /// Форма скрытого состояния `[batch_size, seq_len, hidden_size]`.
    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.hidden.dims()
    }

    /// Разбирает пару на составляющие.
    #[must_use]
    pub fn into_parts(self) -> (Tensor<B, 3>, Tensor<B, 2, Bool>) {
        (self.hidden, self.padding_mask)
    }
}

/// Применяет дропаут только в режиме обучения.
///
/// Burn дополнительно отключает `Dropout` на бэкендах без autodiff, так что при
/// `training = false` результат детерминирован на любом бэкенде.
pub(crate) fn dropout_if_training<B: Backend, const D: usize>(
    dropout: &Dropout,
    input: Tensor<B, D>,
    training: bool,
) -> Tensor<B, D> {
    if training {
        dropout.forward(input)
    } else {
        input
    }
}
