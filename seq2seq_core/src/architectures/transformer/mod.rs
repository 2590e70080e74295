// seq2seq_core/src/architectures/transformer/mod.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Encoder-decoder трансформер: внимание, feed-forward, блоки энкодера и декодера и сама модель.

pub mod attention; // Scaled dot-product и multi-head attention
pub mod decoder; // Блок декодера
pub mod encoder; // Блок энкодера
pub mod ffn; // Полносвязная сеть (Feed-Forward Network)
pub mod model; // Оркестрация всей модели

pub use attention::{attention_weights, scaled_dot_product_attention, AttentionHead, MultiHeadAttention};
pub use decoder::DecoderBlock;
pub use encoder::EncoderBlock;
pub use ffn::FeedForward;
pub use model::{Seq2SeqInput, Transformer};
