use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use uuid::Uuid;

use crate::domain::common::draft::set_if_changed;
use crate::domain::common::{AggregateId, AggregateRoot, Draft};
use crate::shared::validator;

// ============================================================================
// Aggregate Root
// ============================================================================

/// Кинофильм (кинолента), закупленный у поставщика
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "K: AggregateId"))]
pub struct Film<K = Uuid> {
    pub id: K,
    pub title: String,
    /// Категория (боевик, триллер, комедия и др.)
    #[serde(default)]
    pub category: String,
    /// Автор сценария
    #[serde(default)]
    pub screenwriter: String,
    /// Режиссёр-постановщик
    #[serde(default)]
    pub director: String,
    /// Компания-производитель
    #[serde(default)]
    pub production_company: String,
    /// Год выхода на экран
    pub release_year: i32,
    /// Поставщик киноленты; `K::default()`, если поставщик не выбран
    pub supplier_id: K,
    /// Стоимость приобретения
    pub purchase_cost: f64,
}

impl<K: AggregateId> Film<K> {
    pub const VALIDATED_FIELDS: [FilmField; 4] = [
        FilmField::Title,
        FilmField::ReleaseYear,
        FilmField::PurchaseCost,
        FilmField::Supplier,
    ];

    /// Пустой фильм текущего года без поставщика
    pub fn new() -> Self {
        Self {
            id: K::fresh(),
            title: String::new(),
            category: String::new(),
            screenwriter: String::new(),
            director: String::new(),
            production_company: String::new(),
            release_year: chrono::Local::now().year(),
            supplier_id: K::default(),
            purchase_cost: 0.0,
        }
    }

    pub fn has_supplier(&self) -> bool {
        self.supplier_id != K::default()
    }

    /// Проверить одно поле; границы года задаёт вариант приложения
    pub fn validate_field(
        &self,
        field: FilmField,
        release_years: &RangeInclusive<i32>,
    ) -> Option<String> {
        match field {
            FilmField::Title => (!validator::is_valid_required_string(&self.title))
                .then(|| validator::required_field_error_message("Название фильма")),
            FilmField::ReleaseYear => {
                (!validator::is_valid_release_year(self.release_year, release_years))
                    .then(|| validator::release_year_error_message(release_years))
            }
            FilmField::PurchaseCost => (!validator::is_valid_amount(self.purchase_cost))
                .then(|| "Стоимость не может быть отрицательной".to_string()),
            FilmField::Supplier => {
                (!self.has_supplier()).then(|| "Необходимо выбрать поставщика".to_string())
            }
            FilmField::Category
            | FilmField::Screenwriter
            | FilmField::Director
            | FilmField::ProductionCompany => None,
        }
    }

    /// Валидация данных
    pub fn validate(&self, release_years: &RangeInclusive<i32>) -> Result<(), String> {
        match Self::VALIDATED_FIELDS
            .iter()
            .find_map(|field| self.validate_field(*field, release_years))
        {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}

impl<K: AggregateId> Default for Film<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AggregateId> fmt::Display for Film<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Название: {}, Категория: {}, Сценарист: {}, Режиссер: {}, \
             Производитель: {}, Год: {}, Поставщик ID: {}, Стоимость: {:.2} руб.",
            self.id,
            self.title,
            self.category,
            self.screenwriter,
            self.director,
            self.production_company,
            self.release_year,
            self.supplier_id,
            self.purchase_cost
        )
    }
}

impl<K: AggregateId> AggregateRoot for Film<K> {
    type Id = K;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "films"
    }

    fn element_name() -> &'static str {
        "Фильм"
    }
}

// ============================================================================
// Draft
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilmField {
    Title,
    Category,
    Screenwriter,
    Director,
    ProductionCompany,
    ReleaseYear,
    Supplier,
    PurchaseCost,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilmChange<K = Uuid> {
    Title(String),
    Category(String),
    Screenwriter(String),
    Director(String),
    ProductionCompany(String),
    ReleaseYear(i32),
    Supplier(K),
    PurchaseCost(f64),
}

impl<K: AggregateId> Draft for Film<K> {
    type Field = FilmField;
    type Change = FilmChange<K>;

    fn apply(&mut self, change: FilmChange<K>) -> Option<FilmField> {
        let (changed, field) = match change {
            FilmChange::Title(v) => (set_if_changed(&mut self.title, v), FilmField::Title),
            FilmChange::Category(v) => {
                (set_if_changed(&mut self.category, v), FilmField::Category)
            }
            FilmChange::Screenwriter(v) => (
                set_if_changed(&mut self.screenwriter, v),
                FilmField::Screenwriter,
            ),
            FilmChange::Director(v) => {
                (set_if_changed(&mut self.director, v), FilmField::Director)
            }
            FilmChange::ProductionCompany(v) => (
                set_if_changed(&mut self.production_company, v),
                FilmField::ProductionCompany,
            ),
            FilmChange::ReleaseYear(v) => (
                set_if_changed(&mut self.release_year, v),
                FilmField::ReleaseYear,
            ),
            FilmChange::Supplier(v) => {
                (set_if_changed(&mut self.supplier_id, v), FilmField::Supplier)
            }
            FilmChange::PurchaseCost(v) => (
                set_if_changed(&mut self.purchase_cost, v),
                FilmField::PurchaseCost,
            ),
        };
        changed.then_some(field)
    }
}
