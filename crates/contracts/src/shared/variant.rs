//! Variant settings shared by the two applications built on this core.
//!
//! The cinema rental desktop app and the film catalog console app use the
//! same aggregates, but they differ in release-year bounds, identifier
//! scheme, how storage write failures are reported and whether a supplier
//! with films may be deleted. Those differences are listed here.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Схема идентификаторов записей
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdScheme {
    /// Случайный UUID v4, выдаётся при создании записи
    Uuid,
    /// Целое число: максимум по коллекции + 1
    Sequential,
}

/// Что делать с ошибкой записи файла данных
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersistenceErrorPolicy {
    /// Записать в лог и вернуть ошибку вызывающему коду
    Propagate,
    /// Записать в лог и продолжить работу
    LogAndContinue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    /// Короткое имя варианта для логов
    pub name: &'static str,
    pub release_year_min: i32,
    /// Верхняя граница года выпуска: текущий год + это значение
    pub release_years_ahead: i32,
    pub id_scheme: IdScheme,
    pub persistence_errors: PersistenceErrorPolicy,
    /// Запрещать удаление поставщика, у которого есть фильмы
    pub guard_supplier_delete: bool,
}

impl VariantConfig {
    /// Допустимый диапазон года выпуска для заданного текущего года
    pub fn release_year_bounds(&self, current_year: i32) -> RangeInclusive<i32> {
        self.release_year_min..=current_year + self.release_years_ahead
    }
}

/// Учёт проката кинофильмов: один JSON-файл, UUID, ошибки записи пробрасываются
pub const CINEMA_RENTAL: VariantConfig = VariantConfig {
    name: "cinema-rental",
    release_year_min: 1895,
    release_years_ahead: 2,
    id_scheme: IdScheme::Uuid,
    persistence_errors: PersistenceErrorPolicy::Propagate,
    guard_supplier_delete: false,
};

/// Учёт кинофильмов (консоль): текстовые файлы, целые ID, ошибки записи только в лог
pub const FILM_CATALOG: VariantConfig = VariantConfig {
    name: "film-catalog",
    release_year_min: 1800,
    release_years_ahead: 5,
    id_scheme: IdScheme::Sequential,
    persistence_errors: PersistenceErrorPolicy::LogAndContinue,
    guard_supplier_delete: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year_bounds_differ_per_variant() {
        assert_eq!(CINEMA_RENTAL.release_year_bounds(2025), 1895..=2027);
        assert_eq!(FILM_CATALOG.release_year_bounds(2025), 1800..=2030);
    }
}
