// seq2seq_core/src/mask.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Маски паддинга и аддитивные смещения (bias) для механизма внимания.
//!
//! Маскирование реализовано как сложение: к скорам запрещенных позиций до softmax
//! добавляется `MASK_BIAS`, после softmax их вес численно близок к нулю.
//! Строка, в которой замаскированы все ключи, дает равномерное (но конечное) распределение.

use burn::tensor::{backend::Backend, Bool, Int, Tensor, TensorData};

/// Идентификатор токена, зарезервированный под паддинг. Других паддинг-идентификаторов нет.
pub const PADDING_TOKEN_ID: i64 = 0;

/// Смещение, добавляемое к скорам замаскированных ключей.
pub const MASK_BIAS: f32 = -1.0e9;

/// Смещение для будущих позиций в каузальной маске.
///
/// Строго меньше `MASK_BIAS`: если все прошлые ключи запроса являются паддингом,
/// softmax распределяется по ним, а будущие позиции по-прежнему получают нулевой вес.
pub const CAUSAL_BIAS: f32 = 2.0 * MASK_BIAS;

/// Маска паддинга `[batch_size, seq_len]`: `true` там, где токен не является паддингом.
pub fn padding_mask<B: Backend>(input_ids: Tensor<B, 2, Int>) -> Tensor<B, 2, Bool> {
    input_ids.equal_elem(PADDING_TOKEN_ID).bool_not()
}

/// Смещение `[batch_size, query_len, key_len]` для маски ключей `[batch_size, key_len]`.
///
/// Нулевое для допустимых ключей и `MASK_BIAS` для паддинга; одинаково для всех запросов.
pub fn key_padding_bias<B: Backend>(key_mask: Tensor<B, 2, Bool>, query_len: usize) -> Tensor<B, 3> {
    let [batch_size, key_len] = key_mask.dims();

    // keep = 1.0 -> 0.0; keep = 0.0 -> MASK_BIAS
    key_mask
        .float()
        .sub_scalar(1.0)
        .mul_scalar(-MASK_BIAS)
        .reshape([batch_size, 1, key_len])
        .expand([batch_size, query_len, key_len])
}

/// Каузальное смещение `[seq_len, seq_len]`: позиция `i` не видит позиции `j > i`.
pub fn causal_bias<B: Backend>(seq_len: usize, device: &B::Device) -> Tensor<B, 2> {
    let values: Vec<f32> = (0..seq_len)
        .flat_map(|i| (0..seq_len).map(move |j| if j > i { CAUSAL_BIAS } else { 0.0 }))
        .collect();

    Tensor::from_data(TensorData::new(values, [seq_len, seq_len]), device)
}

/// Смещение для self-attention декодера: каузальная часть плюс паддинг целевой последовательности.
pub fn decoder_self_attention_bias<B: Backend>(target_mask: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
    let [batch_size, target_len] = target_mask.dims();
    let causal = causal_bias::<B>(target_len, &target_mask.device())
        .reshape([1, target_len, target_len])
        .expand([batch_size, target_len, target_len]);

    key_padding_bias(target_mask, target_len) + causal
}
