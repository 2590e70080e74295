// Общие помощники для интеграционных тестов seq2seq_core.
#![allow(dead_code)]

use burn::tensor::{Bool, Int, Tensor, TensorData};
use seq2seq_core::{PositionalInformationType, TransformerConfig};

pub type TestBackend = burn_ndarray::NdArray<f32>;
pub type TestAutodiffBackend = burn_autodiff::Autodiff<TestBackend>;

pub fn device() -> burn_ndarray::NdArrayDevice {
    burn_ndarray::NdArrayDevice::default()
}

/// Тензор идентификаторов из строк одинаковой длины.
pub fn ids<B: burn::tensor::backend::Backend>(rows: &[&[i64]], device: &B::Device) -> Tensor<B, 2, Int> {
    let seq_len = rows[0].len();
    let values: Vec<i64> = rows.iter().flat_map(|row| row.iter().copied()).collect();
    Tensor::from_data(TensorData::new(values, [rows.len(), seq_len]), device)
}

/// Небольшая конфигурация без дропаута, чтобы тесты были быстрыми.
pub fn small_config(positional: PositionalInformationType) -> TransformerConfig {
    TransformerConfig::new(32, 4, 64, 1)
        .with_positional_information_type(positional)
        .with_max_position_embeddings(16)
        .with_hidden_dropout_prob(0.0)
        .with_final_dropout_prob(0.0)
}

pub fn to_vec<B: burn::tensor::backend::Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f32> {
    tensor.into_data().convert::<f32>().to_vec::<f32>().unwrap()
}

pub fn mask_to_vec<B: burn::tensor::backend::Backend>(mask: Tensor<B, 2, Bool>) -> Vec<bool> {
    mask.into_data().to_vec::<bool>().unwrap()
}

pub fn assert_all_close(left: &[f32], right: &[f32], tolerance: f32) {
    assert_eq!(left.len(), right.len(), "длины различаются");
    for (index, (l, r)) in left.iter().zip(right).enumerate() {
        assert!(
            (l - r).abs() <= tolerance,
            "элемент {index}: {l} != {r} (допуск {tolerance})"
        );
    }
}
