use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::draft::set_if_changed;
use crate::domain::common::{AggregateId, AggregateRoot, Draft};
use crate::shared::validator;

/// Срок демонстрации по умолчанию для новой аренды
const DEFAULT_DEMO_DAYS: i64 = 30;

/// Демонстрация может начинаться не раньше 1 января этого года
const EARLIEST_START_YEAR: i32 = 2000;

// ============================================================================
// Aggregate Root
// ============================================================================

/// Аренда фильма кинотеатром
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: Uuid,
    /// Кинотеатр-арендатор; nil, если не выбран
    pub cinema_id: Uuid,
    /// Фильм (кинолента); nil, если не выбран
    pub film_id: Uuid,
    /// Дата начала демонстрации
    pub demo_start_date: NaiveDate,
    /// Дата окончания демонстрации
    pub demo_end_date: NaiveDate,
    /// Сумма оплаты за аренду ленты
    pub rental_payment: f64,
    /// Пени за несвоевременный возврат
    #[serde(default)]
    pub late_fee: f64,
    #[serde(default)]
    pub notes: String,
}

impl Rental {
    pub const VALIDATED_FIELDS: [RentalField; 6] = [
        RentalField::Cinema,
        RentalField::Film,
        RentalField::DemoStartDate,
        RentalField::DemoEndDate,
        RentalField::RentalPayment,
        RentalField::LateFee,
    ];

    /// Новая аренда: демонстрация с сегодняшнего дня на 30 дней
    pub fn new() -> Self {
        Self::starting_on(chrono::Local::now().date_naive())
    }

    pub fn starting_on(start: NaiveDate) -> Self {
        Self {
            id: Uuid::fresh(),
            cinema_id: Uuid::nil(),
            film_id: Uuid::nil(),
            demo_start_date: start,
            demo_end_date: start + chrono::Duration::days(DEFAULT_DEMO_DAYS),
            rental_payment: 0.0,
            late_fee: 0.0,
            notes: String::new(),
        }
    }

    /// Самая ранняя допустимая дата начала демонстрации
    pub fn earliest_start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(EARLIEST_START_YEAR, 1, 1).expect("Invalid earliest start date")
    }

    /// Даты демонстрации согласованы: окончание не раньше начала
    pub fn dates_consistent(&self) -> bool {
        validator::is_valid_rental_dates(self.demo_start_date, self.demo_end_date)
    }

    /// Проверить одно поле без учёта связанных полей
    pub fn validate_field(&self, field: RentalField) -> Option<String> {
        match field {
            RentalField::Cinema => self
                .cinema_id
                .is_nil()
                .then(|| "Необходимо выбрать кинотеатр".to_string()),
            RentalField::Film => self
                .film_id
                .is_nil()
                .then(|| "Необходимо выбрать фильм (киноленту)".to_string()),
            RentalField::DemoStartDate => {
                if self.demo_start_date < Self::earliest_start_date() {
                    Some("Дата начала демонстрации должна быть корректной".to_string())
                } else if !self.dates_consistent() {
                    Some("Дата начала не может быть позже даты окончания".to_string())
                } else {
                    None
                }
            }
            RentalField::DemoEndDate => (!self.dates_consistent())
                .then(|| "Дата окончания не может быть раньше даты начала".to_string()),
            RentalField::RentalPayment => {
                if !validator::is_valid_amount(self.rental_payment) {
                    Some("Сумма оплаты не может быть отрицательной".to_string())
                } else if self.rental_payment == 0.0 {
                    Some("Необходимо указать сумму оплаты за аренду".to_string())
                } else {
                    None
                }
            }
            RentalField::LateFee => (!validator::is_valid_amount(self.late_fee))
                .then(|| "Пени не могут быть отрицательными".to_string()),
            RentalField::Notes => None,
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

impl Default for Rental {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRoot for Rental {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "rentals"
    }

    fn element_name() -> &'static str {
        "Аренда"
    }
}

// ============================================================================
// Draft
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RentalField {
    Cinema,
    Film,
    DemoStartDate,
    DemoEndDate,
    RentalPayment,
    LateFee,
    Notes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RentalChange {
    Cinema(Uuid),
    Film(Uuid),
    DemoStartDate(NaiveDate),
    DemoEndDate(NaiveDate),
    RentalPayment(f64),
    LateFee(f64),
    Notes(String),
}

impl Draft for Rental {
    type Field = RentalField;
    type Change = RentalChange;

    fn apply(&mut self, change: RentalChange) -> Option<RentalField> {
        let (changed, field) = match change {
            RentalChange::Cinema(v) => (set_if_changed(&mut self.cinema_id, v), RentalField::Cinema),
            RentalChange::Film(v) => (set_if_changed(&mut self.film_id, v), RentalField::Film),
            RentalChange::DemoStartDate(v) => (
                set_if_changed(&mut self.demo_start_date, v),
                RentalField::DemoStartDate,
            ),
            RentalChange::DemoEndDate(v) => (
                set_if_changed(&mut self.demo_end_date, v),
                RentalField::DemoEndDate,
            ),
            RentalChange::RentalPayment(v) => (
                set_if_changed(&mut self.rental_payment, v),
                RentalField::RentalPayment,
            ),
            RentalChange::LateFee(v) => (set_if_changed(&mut self.late_fee, v), RentalField::LateFee),
            RentalChange::Notes(v) => (set_if_changed(&mut self.notes, v), RentalField::Notes),
        };
        changed.then_some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rental_runs_thirty_days() {
        let rental = Rental::starting_on(date(2024, 1, 10));
        assert_eq!(rental.demo_end_date, date(2024, 2, 9));
        assert!(rental.cinema_id.is_nil());
        assert!(!rental.id.is_nil());
    }

    #[test]
    fn test_date_errors() {
        let mut rental = Rental::starting_on(date(2024, 1, 10));
        rental.demo_end_date = date(2024, 1, 5);
        assert_eq!(
            rental.validate_field(RentalField::DemoStartDate),
            Some("Дата начала не может быть позже даты окончания".to_string())
        );
        assert_eq!(
            rental.validate_field(RentalField::DemoEndDate),
            Some("Дата окончания не может быть раньше даты начала".to_string())
        );

        rental.demo_start_date = date(1999, 12, 31);
        assert_eq!(
            rental.validate_field(RentalField::DemoStartDate),
            Some("Дата начала демонстрации должна быть корректной".to_string())
        );
    }

    #[test]
    fn test_start_date_lower_bound() {
        assert_eq!(Rental::earliest_start_date(), date(2000, 1, 1));

        let mut rental = Rental::starting_on(date(2000, 1, 1));
        assert_eq!(rental.validate_field(RentalField::DemoStartDate), None);

        rental.demo_start_date = date(1999, 12, 31);
        assert!(rental.validate_field(RentalField::DemoStartDate).is_some());
        assert_eq!(rental.validate_field(RentalField::DemoEndDate), None);
    }

    #[test]
    fn test_payment_must_be_positive() {
        let mut rental = Rental::new();
        assert_eq!(
            rental.validate_field(RentalField::RentalPayment),
            Some("Необходимо указать сумму оплаты за аренду".to_string())
        );
        rental.rental_payment = -5.0;
        assert_eq!(
            rental.validate_field(RentalField::RentalPayment),
            Some("Сумма оплаты не может быть отрицательной".to_string())
        );
        rental.rental_payment = 1500.0;
        assert_eq!(rental.validate_field(RentalField::RentalPayment), None);
    }

    #[test]
    fn test_validate_starts_with_references() {
        let mut rental = Rental::new();
        rental.rental_payment = 100.0;
        assert_eq!(rental.validate(), Err("Необходимо выбрать кинотеатр".to_string()));
        rental.cinema_id = Uuid::new_v4();
        rental.film_id = Uuid::new_v4();
        assert_eq!(rental.validate(), Ok(()));
    }
}
