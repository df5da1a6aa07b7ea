//! Storage error types.

use std::path::PathBuf;

use contracts::shared::variant::{IdScheme, PersistenceErrorPolicy};
use thiserror::Error;

/// Ошибка хранилища данных
#[derive(Debug, Error)]
pub enum StoreError {
    /// Файл не удалось прочитать или записать
    #[error("не удалось {operation} файл {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("некорректный JSON в файле {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ошибка чтения/записи строк в файле {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Строка текстового файла не разбирается
    #[error("неверный формат данных ({entity}), строка {line}: {reason}")]
    Format {
        entity: &'static str,
        line: u64,
        reason: String,
    },

    /// Значение нельзя записать в строчный файл без порчи формата
    #[error("поле \"{field}\" ({entity}) содержит символ \"|\" или перевод строки")]
    InvalidText {
        entity: &'static str,
        field: &'static str,
    },

    /// Тип идентификаторов хранилища не совпадает с настройкой варианта
    #[error("вариант {variant} использует схему {configured:?}, а хранилище: {expected:?}")]
    SchemeMismatch {
        variant: &'static str,
        expected: IdScheme,
        configured: IdScheme,
    },
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Обработать результат записи файла по политике варианта
///
/// Ошибка пишется в лог всегда; вызывающему коду она возвращается только
/// при `PersistenceErrorPolicy::Propagate`.
pub(crate) fn settle_write(
    policy: PersistenceErrorPolicy,
    result: Result<(), StoreError>,
) -> Result<(), StoreError> {
    let Err(error) = result else {
        return Ok(());
    };
    tracing::error!("Ошибка при сохранении данных: {}", error);
    match policy {
        PersistenceErrorPolicy::Propagate => Err(error),
        PersistenceErrorPolicy::LogAndContinue => Ok(()),
    }
}
