use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::common::draft::set_if_changed;
use crate::domain::common::{AggregateId, AggregateRoot, Draft};
use crate::shared::validator;

// ============================================================================
// Aggregate Root
// ============================================================================

/// Поставщик кинолент
///
/// Тип идентификатора зависит от варианта: UUID в учёте проката,
/// целое число в консольном учёте фильмов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "K: AggregateId"))]
pub struct Supplier<K = Uuid> {
    pub id: K,
    pub name: String,
    /// Юридический адрес
    #[serde(default)]
    pub legal_address: String,
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub account_number: String,
    /// ИНН (10 или 12 цифр)
    #[serde(default)]
    pub inn: String,
}

impl<K: AggregateId> Supplier<K> {
    pub const VALIDATED_FIELDS: [SupplierField; 3] = [
        SupplierField::Name,
        SupplierField::AccountNumber,
        SupplierField::Inn,
    ];

    pub fn new() -> Self {
        Self {
            id: K::fresh(),
            name: String::new(),
            legal_address: String::new(),
            bank: String::new(),
            account_number: String::new(),
            inn: String::new(),
        }
    }

    pub fn validate_field(&self, field: SupplierField) -> Option<String> {
        match field {
            SupplierField::Name => (!validator::is_valid_required_string(&self.name))
                .then(|| validator::required_field_error_message("Название")),
            SupplierField::AccountNumber => validator::check_optional_digits(
                &self.account_number,
                "Номер счета",
                validator::is_valid_account_number,
                validator::account_number_error_message,
            ),
            SupplierField::Inn => validator::check_optional_digits(
                &self.inn,
                "ИНН",
                validator::is_valid_inn,
                validator::inn_error_message,
            ),
            SupplierField::LegalAddress | SupplierField::Bank => None,
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

impl<K: AggregateId> Default for Supplier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AggregateId> fmt::Display for Supplier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Поставщик: {}, Адрес: {}, Банк: {}, Счет: {}, ИНН: {}",
            self.id, self.name, self.legal_address, self.bank, self.account_number, self.inn
        )
    }
}

impl<K: AggregateId> AggregateRoot for Supplier<K> {
    type Id = K;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "suppliers"
    }

    fn element_name() -> &'static str {
        "Поставщик"
    }
}

// ============================================================================
// Draft
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplierField {
    Name,
    LegalAddress,
    Bank,
    AccountNumber,
    Inn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SupplierChange {
    Name(String),
    LegalAddress(String),
    Bank(String),
    AccountNumber(String),
    Inn(String),
}

impl<K: AggregateId> Draft for Supplier<K> {
    type Field = SupplierField;
    type Change = SupplierChange;

    fn apply(&mut self, change: SupplierChange) -> Option<SupplierField> {
        let (changed, field) = match change {
            SupplierChange::Name(v) => (set_if_changed(&mut self.name, v), SupplierField::Name),
            SupplierChange::LegalAddress(v) => (
                set_if_changed(&mut self.legal_address, v),
                SupplierField::LegalAddress,
            ),
            SupplierChange::Bank(v) => (set_if_changed(&mut self.bank, v), SupplierField::Bank),
            SupplierChange::AccountNumber(v) => (
                set_if_changed(&mut self.account_number, v),
                SupplierField::AccountNumber,
            ),
            SupplierChange::Inn(v) => (set_if_changed(&mut self.inn, v), SupplierField::Inn),
        };
        changed.then_some(field)
    }
}
