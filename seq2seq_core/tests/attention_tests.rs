mod common;

use approx::assert_relative_eq;
use burn::tensor::{Distribution, Tensor, TensorData};
use common::{device, small_config, to_vec, TestBackend};
use seq2seq_core::{
    scaled_dot_product_attention, MultiHeadAttention, PositionalInformationType, TransformerConfig,
    TransformerError,
};

#[test]
fn test_scores_are_scaled_by_sqrt_head_dim() {
    let device = device();
    let query = Tensor::<TestBackend, 3>::from_data(TensorData::new(vec![1.0f32, 0.0], [1, 1, 2]), &device);
    let key = Tensor::<TestBackend, 3>::from_data(
        TensorData::new(vec![1.0f32, 0.0, 0.0, 1.0], [1, 2, 2]),
        &device,
    );
    let value = Tensor::<TestBackend, 3>::from_data(
        TensorData::new(vec![10.0f32, 0.0, 0.0, 20.0], [1, 2, 2]),
        &device,
    );

    let (output, weights) = scaled_dot_product_attention(query, key, value, None);

    // scores = [1/sqrt(2), 0]
    let e = (1.0f32 / 2.0f32.sqrt()).exp();
    let w0 = e / (e + 1.0);
    let w1 = 1.0 / (e + 1.0);

    let weights = to_vec(weights);
    assert_relative_eq!(weights[0], w0, epsilon = 1e-6);
    assert_relative_eq!(weights[1], w1, epsilon = 1e-6);

    let output = to_vec(output);
    assert_relative_eq!(output[0], 10.0 * w0, epsilon = 1e-5);
    assert_relative_eq!(output[1], 20.0 * w1, epsilon = 1e-5);
}

#[test]
fn test_output_shape_matches_input_for_any_head_count() {
    let device = device();
    for num_heads in [1, 2, 4, 8] {
        let config = TransformerConfig::new(32, num_heads, 64, 1);
        let attention = MultiHeadAttention::<TestBackend>::new(&config, &device).unwrap();
        assert_eq!(attention.num_heads(), num_heads);
        assert_eq!(attention.head_dim(), 32 / num_heads);

        let hidden = Tensor::<TestBackend, 3>::random([2, 5, 32], Distribution::Normal(0.0, 1.0), &device);
        let output = attention.forward(hidden.clone(), hidden.clone(), hidden, None, false);
        assert_eq!(output.dims(), [2, 5, 32]);
    }
}

#[test]
fn test_cross_attention_follows_query_length() {
    let device = device();
    let config = small_config(PositionalInformationType::Sinusoidal);
    let attention = MultiHeadAttention::<TestBackend>::new(&config, &device).unwrap();

    let decoder_hidden = Tensor::<TestBackend, 3>::random([2, 3, 32], Distribution::Normal(0.0, 1.0), &device);
    let encoder_hidden = Tensor::<TestBackend, 3>::random([2, 6, 32], Distribution::Normal(0.0, 1.0), &device);

    let output = attention.forward(decoder_hidden, encoder_hidden.clone(), encoder_hidden, None, false);
    assert_eq!(output.dims(), [2, 3, 32]);
}

#[test]
fn test_indivisible_hidden_size_fails_at_construction() {
    let config = TransformerConfig::new(30, 4, 64, 1);
    let result = MultiHeadAttention::<TestBackend>::new(&config, &device());
    assert!(matches!(result, Err(TransformerError::InvalidConfig(_))));
}

#[test]
fn test_attention_is_deterministic_in_eval_mode() {
    let device = device();
    let config = small_config(PositionalInformationType::Sinusoidal).with_attention_dropout_prob(0.5);
    let attention = MultiHeadAttention::<TestBackend>::new(&config, &device).unwrap();
    let hidden = Tensor::<TestBackend, 3>::random([1, 4, 32], Distribution::Normal(0.0, 1.0), &device);

    let first = attention.forward(hidden.clone(), hidden.clone(), hidden.clone(), None, false);
    let second = attention.forward(hidden.clone(), hidden.clone(), hidden, None, false);
    assert_eq!(to_vec(first), to_vec(second));
}
