// cli_app/src/lib.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Библиотечная часть `seq2seq-cli`: разбор аргументов и сценарии команд.
//!
//! Бинарник (`main.rs`) только разбирает аргументы и вызывает [`cli::Cli::run`].

pub mod cli;
pub mod runner;
