use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::draft::set_if_changed;
use crate::domain::common::{AggregateId, AggregateRoot, Draft};
use crate::shared::validator;

// ============================================================================
// Aggregate Root
// ============================================================================

/// Кинотеатр, который берёт фильмы в аренду
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cinema {
    /// Уникальный идентификатор кинотеатра
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    /// Количество посадочных мест
    #[serde(default)]
    pub seats_count: i32,
    /// Директор
    #[serde(default)]
    pub director: String,
    /// Владелец
    #[serde(default)]
    pub owner: String,
    /// Обслуживающий банк
    #[serde(default)]
    pub bank: String,
    /// Расчётный счёт (20 цифр)
    #[serde(default)]
    pub account_number: String,
    /// ИНН (10 или 12 цифр)
    #[serde(default)]
    pub inn: String,
}

impl Cinema {
    /// Порядок проверки полей; первая ошибка в этом порядке показывается в форме
    pub const VALIDATED_FIELDS: [CinemaField; 5] = [
        CinemaField::Name,
        CinemaField::Phone,
        CinemaField::SeatsCount,
        CinemaField::AccountNumber,
        CinemaField::Inn,
    ];

    /// Пустой кинотеатр с новым идентификатором
    pub fn new() -> Self {
        Self {
            id: Uuid::fresh(),
            name: String::new(),
            address: String::new(),
            phone: String::new(),
            seats_count: 0,
            director: String::new(),
            owner: String::new(),
            bank: String::new(),
            account_number: String::new(),
            inn: String::new(),
        }
    }

    /// Проверить одно поле; `None`, если ошибок нет
    pub fn validate_field(&self, field: CinemaField) -> Option<String> {
        match field {
            CinemaField::Name => (!validator::is_valid_required_string(&self.name))
                .then(|| validator::required_field_error_message("Название")),
            CinemaField::Phone => (!validator::is_valid_phone(&self.phone))
                .then(validator::phone_error_message),
            CinemaField::SeatsCount => (!validator::is_valid_seats_count(self.seats_count))
                .then(validator::seats_count_error_message),
            CinemaField::AccountNumber => validator::check_optional_digits(
                &self.account_number,
                "Номер счета",
                validator::is_valid_account_number,
                validator::account_number_error_message,
            ),
            CinemaField::Inn => validator::check_optional_digits(
                &self.inn,
                "ИНН",
                validator::is_valid_inn,
                validator::inn_error_message,
            ),
            CinemaField::Address
            | CinemaField::Director
            | CinemaField::Owner
            | CinemaField::Bank => None,
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        match Self::VALIDATED_FIELDS
            .iter()
            .find_map(|field| self.validate_field(*field))
        {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}

impl Default for Cinema {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRoot for Cinema {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "cinemas"
    }

    fn element_name() -> &'static str {
        "Кинотеатр"
    }
}

// ============================================================================
// Draft
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CinemaField {
    Name,
    Address,
    Phone,
    SeatsCount,
    Director,
    Owner,
    Bank,
    AccountNumber,
    Inn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CinemaChange {
    Name(String),
    Address(String),
    Phone(String),
    SeatsCount(i32),
    Director(String),
    Owner(String),
    Bank(String),
    AccountNumber(String),
    Inn(String),
}

impl Draft for Cinema {
    type Field = CinemaField;
    type Change = CinemaChange;

    fn apply(&mut self, change: CinemaChange) -> Option<CinemaField> {
        let (changed, field) = match change {
            CinemaChange::Name(v) => (set_if_changed(&mut self.name, v), CinemaField::Name),
            CinemaChange::Address(v) => {
                (set_if_changed(&mut self.address, v), CinemaField::Address)
            }
            CinemaChange::Phone(v) => (set_if_changed(&mut self.phone, v), CinemaField::Phone),
            CinemaChange::SeatsCount(v) => {
                (set_if_changed(&mut self.seats_count, v), CinemaField::SeatsCount)
            }
            CinemaChange::Director(v) => {
                (set_if_changed(&mut self.director, v), CinemaField::Director)
            }
            CinemaChange::Owner(v) => (set_if_changed(&mut self.owner, v), CinemaField::Owner),
            CinemaChange::Bank(v) => (set_if_changed(&mut self.bank, v), CinemaField::Bank),
            CinemaChange::AccountNumber(v) => (
                set_if_changed(&mut self.account_number, v),
                CinemaField::AccountNumber,
            ),
            CinemaChange::Inn(v) => (set_if_changed(&mut self.inn, v), CinemaField::Inn),
        };
        changed.then_some(field)
    }
}
