mod common;

use burn::module::Module;
use common::{assert_all_close, device, ids, small_config, to_vec, TestAutodiffBackend, TestBackend};
use seq2seq_core::{
    PositionalInformationType, Seq2SeqInput, Transformer, TransformerConfig, TransformerError,
};

fn e2e_config(positional: PositionalInformationType) -> TransformerConfig {
    TransformerConfig::new(64, 4, 128, 2)
        .with_positional_information_type(positional)
        .with_max_position_embeddings(32)
}

#[test]
fn test_logits_shape_follows_target_vocabulary() {
    let device = device();
    let model = Transformer::<TestBackend>::new(
        &small_config(PositionalInformationType::Sinusoidal),
        500,
        1000,
        &device,
    )
    .unwrap();

    let source = ids::<TestBackend>(&[&[1, 2, 3, 4, 5, 6, 7, 8, 9], &[9, 8, 7, 0, 0, 0, 0, 0, 0]], &device);
    let target = ids::<TestBackend>(&[&[1, 2, 3, 4, 5, 6, 7], &[7, 6, 5, 4, 0, 0, 0]], &device);

    let logits = model.forward(Seq2SeqInput::new(source, target), false).unwrap();
    assert_eq!(logits.dims(), [2, 7, 1000]);
}

#[test]
fn test_end_to_end_with_padding_produces_finite_logits() {
    let device = device();
    for positional in [PositionalInformationType::Sinusoidal, PositionalInformationType::Learned] {
        let model = Transformer::<TestBackend>::new(&e2e_config(positional), 50, 60, &device).unwrap();

        let logits = model
            .forward(
                Seq2SeqInput::new(
                    ids::<TestBackend>(&[&[1, 2, 3, 0, 0]], &device),
                    ids::<TestBackend>(&[&[4, 5, 0]], &device),
                ),
                false,
            )
            .unwrap();

        assert_eq!(logits.dims(), [1, 3, 60]);
        assert!(to_vec(logits).iter().all(|value| value.is_finite()));
    }
}

#[test]
fn test_decoder_is_causal_end_to_end() {
    let device = device();
    let model = Transformer::<TestBackend>::new(
        &e2e_config(PositionalInformationType::Sinusoidal),
        50,
        60,
        &device,
    )
    .unwrap();
    let source = ids::<TestBackend>(&[&[1, 2, 3, 0, 0]], &device);

    let first = model
        .forward(
            Seq2SeqInput::new(source.clone(), ids::<TestBackend>(&[&[4, 5, 6, 7]], &device)),
            false,
        )
        .unwrap();
    let second = model
        .forward(
            Seq2SeqInput::new(source, ids::<TestBackend>(&[&[4, 5, 9, 1]], &device)),
            false,
        )
        .unwrap();

    let first = to_vec(first);
    let second = to_vec(second);
    assert_all_close(&first[..2 * 60], &second[..2 * 60], 1e-4);
    assert_ne!(first[2 * 60..], second[2 * 60..]);
}

#[test]
fn test_leading_padded_target_stays_causal() {
    let device = device();
    let model = Transformer::<TestBackend>::new(
        &e2e_config(PositionalInformationType::Sinusoidal),
        50,
        60,
        &device,
    )
    .unwrap();
    let source = ids::<TestBackend>(&[&[1, 2, 3, 0, 0]], &device);

    let first = model
        .forward(
            Seq2SeqInput::new(source.clone(), ids::<TestBackend>(&[&[0, 5, 6]], &device)),
            false,
        )
        .unwrap();
    let second = model
        .forward(
            Seq2SeqInput::new(source, ids::<TestBackend>(&[&[0, 9, 1]], &device)),
            false,
        )
        .unwrap();

    // Позиция 0 (паддинг) не должна зависеть от будущих токенов.
    assert_all_close(&to_vec(first)[..60], &to_vec(second)[..60], 1e-4);
}

#[test]
fn test_eval_forward_is_deterministic() {
    let device = device();
    let config = e2e_config(PositionalInformationType::Learned)
        .with_hidden_dropout_prob(0.5)
        .with_final_dropout_prob(0.5);
    let model = Transformer::<TestBackend>::new(&config, 50, 60, &device).unwrap();
    let inputs = Seq2SeqInput::new(
        ids::<TestBackend>(&[&[1, 2, 3, 0]], &device),
        ids::<TestBackend>(&[&[4, 5, 6]], &device),
    );

    let first = model.forward(inputs.clone(), false).unwrap();
    let second = model.forward(inputs, false).unwrap();
    assert_eq!(to_vec(first), to_vec(second));
}

#[test]
fn test_training_mode_applies_dropout() {
    let device = device();
    let config = e2e_config(PositionalInformationType::Sinusoidal)
        .with_hidden_dropout_prob(0.5)
        .with_final_dropout_prob(0.5);
    let model = Transformer::<TestAutodiffBackend>::new(&config, 50, 60, &device).unwrap();
    let inputs = Seq2SeqInput::new(
        ids::<TestAutodiffBackend>(&[&[1, 2, 3, 4]], &device),
        ids::<TestAutodiffBackend>(&[&[4, 5, 6]], &device),
    );

    let eval = to_vec(model.forward(inputs.clone(), false).unwrap());
    let train = to_vec(model.forward(inputs, true).unwrap());
    assert_ne!(eval, train);
}

#[test]
fn test_batch_mismatch_is_rejected() {
    let device = device();
    let model = Transformer::<TestBackend>::new(
        &small_config(PositionalInformationType::Sinusoidal),
        20,
        20,
        &device,
    )
    .unwrap();

    let result = model.forward(
        Seq2SeqInput::new(
            ids::<TestBackend>(&[&[1, 2], &[3, 4]], &device),
            ids::<TestBackend>(&[&[1, 2, 3]], &device),
        ),
        false,
    );
    assert!(matches!(result, Err(TransformerError::IncompatibleShape(_))));
}

#[test]
fn test_decoder_token_outside_target_vocabulary() {
    let device = device();
    let model = Transformer::<TestBackend>::new(
        &small_config(PositionalInformationType::Sinusoidal),
        50,
        60,
        &device,
    )
    .unwrap();

    let result = model.forward(
        Seq2SeqInput::new(
            ids::<TestBackend>(&[&[1, 2, 3]], &device),
            ids::<TestBackend>(&[&[4, 60]], &device),
        ),
        false,
    );
    assert_eq!(
        result.unwrap_err(),
        TransformerError::TokenOutOfVocabulary { token_id: 60, vocab_size: 60 }
    );
}

#[test]
fn test_invalid_config_fails_construction() {
    let config = TransformerConfig::new(30, 4, 64, 1);
    assert!(matches!(
        Transformer::<TestBackend>::new(&config, 10, 10, &device()),
        Err(TransformerError::InvalidConfig(_))
    ));
    assert!(matches!(
        config.init::<TestBackend>(10, 10, &device()),
        Err(TransformerError::InvalidConfig(_))
    ));
}

#[test]
fn test_info_reports_parameter_count() {
    let config = TransformerConfig::new(8, 2, 16, 1);
    let model = config.init::<TestBackend>(10, 12, &device()).unwrap();
    let info = model.info();

    // Токены: 10*8 + 12*8; энкодер: 600; декодер: 904; выход: 8*12 + 12.
    assert_eq!(info.num_params, 1788);
    assert_eq!(info.num_params, model.num_params());
    assert_eq!(info.source_vocab_size, 10);
    assert_eq!(info.target_vocab_size, 12);
    assert_eq!(info.num_blocks, 1);
    assert_eq!(info.positional_information_type, PositionalInformationType::Sinusoidal);
}
