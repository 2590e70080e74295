mod common;

use burn::tensor::{Tensor, TensorData};
use common::{assert_all_close, device, ids, mask_to_vec, small_config, to_vec, TestBackend};
use seq2seq_core::{mask::padding_mask, DecoderBlock, HiddenState, PositionalInformationType};

const HIDDEN: usize = 32;

fn hidden(seq_len: usize, seed: usize, changed: &[usize], offset: f32) -> Tensor<TestBackend, 3> {
    let values: Vec<f32> = (0..seq_len * HIDDEN)
        .map(|i| {
            let base = ((i + seed * 13) as f32 * 0.53).cos();
            if changed.contains(&(i / HIDDEN)) {
                base - offset
            } else {
                base
            }
        })
        .collect();
    Tensor::from_data(TensorData::new(values, [1, seq_len, HIDDEN]), &device())
}

fn block() -> DecoderBlock<TestBackend> {
    DecoderBlock::new(&small_config(PositionalInformationType::Sinusoidal), &device()).unwrap()
}

fn encoder_output(changed: &[usize], offset: f32) -> HiddenState<TestBackend> {
    let mask = padding_mask(ids::<TestBackend>(&[&[5, 6, 7, 8, 0, 0]], &device()));
    HiddenState::new(hidden(6, 1, changed, offset), mask)
}

#[test]
fn test_decoder_keeps_target_mask_and_shape() {
    let device = device();
    let block = block();
    let target_mask = padding_mask(ids::<TestBackend>(&[&[1, 2, 0]], &device));

    let output = block.forward(
        HiddenState::new(hidden(3, 0, &[], 0.0), target_mask.clone()),
        &encoder_output(&[], 0.0),
        false,
    );
    assert_eq!(output.dims(), [1, 3, HIDDEN]);
    assert_eq!(mask_to_vec(output.padding_mask), mask_to_vec(target_mask));
}

#[test]
fn test_future_target_positions_do_not_leak() {
    let device = device();
    let block = block();
    let target_mask = padding_mask(ids::<TestBackend>(&[&[1, 2, 3, 4]], &device));

    let original = block.forward(
        HiddenState::new(hidden(4, 0, &[2, 3], 0.0), target_mask.clone()),
        &encoder_output(&[], 0.0),
        false,
    );
    let altered = block.forward(
        HiddenState::new(hidden(4, 0, &[2, 3], 3.0), target_mask),
        &encoder_output(&[], 0.0),
        false,
    );

    let original = to_vec(original.hidden);
    let altered = to_vec(altered.hidden);
    assert_all_close(&original[..2 * HIDDEN], &altered[..2 * HIDDEN], 1e-5);
    assert_ne!(original[2 * HIDDEN..], altered[2 * HIDDEN..]);
}

#[test]
fn test_padded_source_positions_are_ignored() {
    let device = device();
    let block = block();
    let target_mask = padding_mask(ids::<TestBackend>(&[&[1, 2, 3]], &device));

    let clean = block.forward(
        HiddenState::new(hidden(3, 0, &[], 0.0), target_mask.clone()),
        &encoder_output(&[4, 5], 0.0),
        false,
    );
    let noisy = block.forward(
        HiddenState::new(hidden(3, 0, &[], 0.0), target_mask),
        &encoder_output(&[4, 5], 10.0),
        false,
    );

    assert_all_close(&to_vec(clean.hidden), &to_vec(noisy.hidden), 1e-5);
}
