use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::shared::variant::IdScheme;

/// Трейт для типов идентификаторов агрегатов
///
/// `Default` даёт "пустую" ссылку (nil UUID или 0), которой помечается
/// ещё не выбранная связанная запись.
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Default + Serialize + DeserializeOwned + Debug + Display
{
    /// Схема выдачи идентификаторов для этого типа
    const SCHEME: IdScheme;

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String>;

    /// Идентификатор, который получает только что созданная запись
    fn fresh() -> Self;

    /// Следующий свободный идентификатор при добавлении в коллекцию
    fn next_after<I>(taken: I) -> Self
    where
        I: IntoIterator<Item = Self>;
}

impl AggregateId for i64 {
    const SCHEME: IdScheme = IdScheme::Sequential;

    fn from_string(s: &str) -> Result<Self, String> {
        s.trim()
            .parse::<i64>()
            .map_err(|e| format!("Invalid i64: {}", e))
    }

    // Номер выдаёт хранилище при добавлении
    fn fresh() -> Self {
        0
    }

    fn next_after<I>(taken: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        taken.into_iter().max().map_or(1, |max| max + 1)
    }
}

impl AggregateId for uuid::Uuid {
    const SCHEME: IdScheme = IdScheme::Uuid;

    fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s).map_err(|e| format!("Invalid UUID: {}", e))
    }

    fn fresh() -> Self {
        uuid::Uuid::new_v4()
    }

    fn next_after<I>(_taken: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        uuid::Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_sequential_ids() {
        assert_eq!(<i64 as AggregateId>::fresh(), 0);
        assert_eq!(i64::next_after([]), 1);
        assert_eq!(i64::next_after([3, 1, 7]), 8);
        assert_eq!(i64::from_string(" 42 "), Ok(42));
        assert!(i64::from_string("abc").is_err());
    }

    #[test]
    fn test_uuid_ids() {
        let a = <Uuid as AggregateId>::fresh();
        let b = Uuid::next_after([a]);
        assert_ne!(a, b);
        assert!(!a.is_nil());
        assert_eq!(Uuid::from_string(&a.to_string()), Ok(a));
        assert!(Uuid::default().is_nil());
    }
}
