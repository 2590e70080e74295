use std::io;

use utils_crate::error::UtilsError;

#[test]
fn test_io_error_with_path() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let utils_err = UtilsError::io_with_path(io_err, "logs/app.log");

    match &utils_err {
        UtilsError::Io { source, path: Some(p) } => {
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
            assert_eq!(p, "logs/app.log");
        }
        other => panic!("Ожидался UtilsError::Io с путем, получено {other:?}"),
    }
    assert_eq!(
        utils_err.to_string(),
        "Ошибка ввода-вывода (logs/app.log): file not found"
    );
}

#[test]
fn test_io_error_without_path() {
    let utils_err: UtilsError = io::Error::new(io::ErrorKind::Other, "other io error").into();

    assert!(matches!(utils_err, UtilsError::Io { path: None, .. }));
    assert_eq!(utils_err.to_string(), "Ошибка ввода-вывода: other io error");
}

#[test]
fn test_message_formatting() {
    assert_eq!(
        UtilsError::Config("нет раздела model".to_string()).to_string(),
        "Ошибка конфигурации: нет раздела model"
    );
    assert_eq!(
        UtilsError::InvalidParameter("level".to_string()).to_string(),
        "Неверный параметр: level"
    );
    assert_eq!(
        UtilsError::Generic("сбой".to_string()).to_string(),
        "Произошла общая ошибка утилиты: сбой"
    );
}
