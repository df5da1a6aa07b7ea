//! Field validation rules.
//!
//! Every check is a pure predicate paired with the message the forms show
//! when it fails. Optional fields (account number, INN) are only checked
//! once they are non-blank; that decision belongs to the form, so the
//! predicates here reject blank input.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

pub const SEATS_COUNT_MIN: i32 = 1;
pub const SEATS_COUNT_MAX: i32 = 10_000;

const ACCOUNT_NUMBER_LEN: usize = 20;

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// ИНН: ровно 10 (ЮЛ) или 12 (ИП) цифр
pub fn is_valid_inn(inn: &str) -> bool {
    matches!(inn.len(), 10 | 12) && is_ascii_digits(inn)
}

pub fn inn_error_message() -> String {
    "ИНН должен содержать 10 или 12 цифр".to_string()
}

/// Телефон необязателен; если указан, допустимы цифры, пробел и `-+()`
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.trim().is_empty() {
        return true;
    }
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
}

pub fn phone_error_message() -> String {
    "Некорректный формат номера телефона".to_string()
}

/// Номер банковского счёта: ровно 20 цифр
pub fn is_valid_account_number(account_number: &str) -> bool {
    account_number.len() == ACCOUNT_NUMBER_LEN && is_ascii_digits(account_number)
}

pub fn account_number_error_message() -> String {
    format!("Номер счета должен содержать {} цифр", ACCOUNT_NUMBER_LEN)
}

/// Год выпуска в границах варианта (см. `VariantConfig::release_year_bounds`)
pub fn is_valid_release_year(year: i32, bounds: &RangeInclusive<i32>) -> bool {
    bounds.contains(&year)
}

pub fn release_year_error_message(bounds: &RangeInclusive<i32>) -> String {
    format!(
        "Год выпуска должен быть от {} до {}",
        bounds.start(),
        bounds.end()
    )
}

pub fn is_valid_seats_count(seats_count: i32) -> bool {
    (SEATS_COUNT_MIN..=SEATS_COUNT_MAX).contains(&seats_count)
}

pub fn seats_count_error_message() -> String {
    format!(
        "Количество мест должно быть от {} до {}",
        SEATS_COUNT_MIN, SEATS_COUNT_MAX
    )
}

/// Денежная сумма: не меньше нуля (NaN недопустим)
pub fn is_valid_amount(amount: f64) -> bool {
    amount >= 0.0
}

pub fn amount_error_message() -> String {
    "Сумма должна быть положительной".to_string()
}

pub fn is_valid_rental_dates(start: NaiveDate, end: NaiveDate) -> bool {
    end >= start
}

pub fn rental_dates_error_message() -> String {
    "Дата окончания должна быть позже или равна дате начала".to_string()
}

pub fn is_valid_required_string(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn required_field_error_message(field_label: &str) -> String {
    format!("Поле \"{}\" обязательно для заполнения", field_label)
}

/// Только цифры; пустая строка допустима для необязательных полей
pub fn is_valid_numeric_string(value: &str) -> bool {
    value.trim().is_empty() || is_ascii_digits(value)
}

pub fn numeric_string_error_message(field_label: &str) -> String {
    format!("Поле \"{}\" должно содержать только цифры", field_label)
}

/// Символы, которые нельзя хранить в строчном файле каталога
const FLAT_TEXT_FORBIDDEN: [char; 3] = ['|', '\r', '\n'];

/// Текст без разделителя полей и переводов строк
pub fn is_valid_flat_text(value: &str) -> bool {
    !value.contains(FLAT_TEXT_FORBIDDEN)
}

pub fn flat_text_error_message(field_label: &str) -> String {
    format!(
        "Поле \"{}\" не может содержать символ \"|\" или перевод строки",
        field_label
    )
}

/// Проверка необязательного реквизита из цифр (номер счёта, ИНН)
///
/// Пустое значение допустимо. Иначе сначала проверяется, что строка
/// состоит из цифр, затем её формат.
pub fn check_optional_digits(
    value: &str,
    field_label: &str,
    is_valid: fn(&str) -> bool,
    format_message: fn() -> String,
) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    if !is_valid_numeric_string(value) {
        return Some(numeric_string_error_message(field_label));
    }
    if !is_valid(value) {
        return Some(format_message());
    }
    None
}
