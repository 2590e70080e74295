// seq2seq_core/src/error.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

/// Перечисление всех возможных ошибок, которые могут возникнуть в крейте `seq2seq_core`.
///
/// Ошибки делятся на две группы: ошибки конфигурации (возникают при построении модели,
/// никогда не подменяются значениями по умолчанию) и ошибки формы/содержимого входов
/// (возникают во время прямого прохода и пробрасываются вызывающему коду).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformerError {
    /// Некорректная конфигурация модели или ее компонентов.
    /// Например, `hidden_size` не делится на количество голов внимания.
    #[error("Некорректная конфигурация: {0}")]
    InvalidConfig(String),

    /// Неизвестная стратегия позиционной информации (допустимы только "embs" и "sinu").
    #[error("Неподдерживаемый тип позиционной информации: '{0}' (ожидается 'embs' или 'sinu')")]
    UnsupportedPositionalType(String),

    /// Идентификатор токена не помещается в таблицу эмбеддингов.
    #[error("Идентификатор токена {token_id} выходит за пределы словаря размера {vocab_size}")]
    TokenOutOfVocabulary {
        /// Первый найденный недопустимый идентификатор.
        token_id: i64,
        /// Размер словаря таблицы эмбеддингов.
        vocab_size: usize,
    },

    /// Последовательность длиннее обучаемой таблицы позиций.
    #[error("Длина последовательности {seq_len} превышает max_position_embeddings = {max_len}")]
    SequenceTooLong {
        /// Фактическая длина входной последовательности.
        seq_len: usize,
        /// Размер таблицы позиций.
        max_len: usize,
    },

    /// Несовместимые размеры тензоров (пустая последовательность, разные размеры батча и т.п.).
    #[error("Несовместимые размеры или форма тензора: {0}")]
    IncompatibleShape(String),

    /// Не удалось прочитать или разобрать файл конфигурации.
    #[error("Ошибка загрузки конфигурации: {0}")]
    ConfigLoad(String),
}

impl From<burn::config::ConfigError> for TransformerError {
    fn from(err: burn::config::ConfigError) -> Self {
        Self::ConfigLoad(err.to_string())
    }
}
