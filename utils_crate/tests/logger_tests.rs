use serial_test::serial;
use utils_crate::{
    logger::{build_env_filter, init_tracing_logger},
    LoggingSettings, UtilsError,
};

#[test]
fn test_filter_accepts_known_levels() {
    for level in ["trace", "debug", "info", "warn", "error"] {
        assert!(build_env_filter("seq2seq-cli", level).is_ok(), "уровень {level}");
    }
}

#[test]
fn test_filter_rejects_unknown_level() {
    let result = build_env_filter("seq2seq-cli", "verbose");
    assert!(matches!(result, Err(UtilsError::InvalidParameter(_))));
}

#[test]
#[serial]
fn test_logger_initializes_once_with_file_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_dir = temp_dir.path().join("logs");
    let settings = LoggingSettings {
        level: "debug".to_string(),
        json: false,
        log_dir: Some(log_dir.clone()),
    };

    init_tracing_logger("seq2seq-test", &settings).unwrap();
    assert!(log_dir.is_dir());
    tracing::info!("первое сообщение после инициализации");

    // Повторная инициализация не паникует, а возвращает ошибку.
    let second = init_tracing_logger("seq2seq-test", &LoggingSettings::default());
    assert!(matches!(second, Err(UtilsError::Generic(_))));
}
