//! Text menu of the film catalog.
//!
//! Reads commands line by line from any `BufRead` and writes to any `Write`,
//! so the whole loop can be driven from a test. End of input saves the data
//! and leaves the loop.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use backend::shared::data::{DataManager, DeleteOutcome, Repository};
use contracts::domain::a002_supplier::{Supplier, SupplierChange, SupplierField};
use contracts::domain::a003_film::{Film, FilmChange, FilmField};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::validator;

use crate::domain::a002_supplier::ui::details::SupplierDetailsVm;
use crate::domain::a003_film::ui::details::FilmDetailsVm;
use crate::shared::edit_session::{ChangeOf, EditSession, FieldOf, FormRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Ввод закончился
    Exit,
}

struct Terminal<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Terminal<I, O> {
    /// Вывести приглашение и прочитать строку; `None` в конце ввода
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }
}

pub struct Console<'a, I, O> {
    term: Terminal<I, O>,
    store: &'a mut DataManager,
    suppliers: SupplierDetailsVm<i64>,
    films: FilmDetailsVm<i64>,
}

impl<'a, I: BufRead, O: Write> Console<'a, I, O> {
    pub fn new(store: &'a mut DataManager, input: I, output: O) -> Self {
        let films = FilmDetailsVm::new(store.config());
        Self {
            term: Terminal { input, output },
            store,
            suppliers: SupplierDetailsVm::new(),
            films,
        }
    }

    /// Главный цикл меню
    pub fn run(&mut self) -> io::Result<()> {
        self.term.line("=== Система учета кинофильмов ===\n")?;

        loop {
            self.term.line("\n=== ГЛАВНОЕ МЕНЮ ===")?;
            self.term.line("1. Управление поставщиками")?;
            self.term.line("2. Управление фильмами")?;
            self.term.line("3. Показать фильмы по поставщику")?;
            self.term.line("4. Сохранить данные")?;
            self.term.line("5. Сохранить и выйти")?;
            let Some(choice) = self.term.prompt("\nВыберите пункт меню: ")? else {
                break;
            };

            let flow = match choice.trim() {
                "1" => self.suppliers_menu()?,
                "2" => self.films_menu()?,
                "3" => self.films_by_supplier()?,
                "4" => {
                    self.save()?;
                    Flow::Continue
                }
                "5" => break,
                _ => {
                    self.term.line("\nНеверный выбор! Попробуйте снова.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        self.save()?;
        self.term.line("\nДо свидания!")
    }

    fn save(&mut self) -> io::Result<()> {
        match self.store.save() {
            Ok(()) => self.term.line("Данные успешно сохранены!"),
            Err(e) => self.term.line(format!("Ошибка при сохранении данных: {}", e)),
        }
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    fn suppliers_menu(&mut self) -> io::Result<Flow> {
        loop {
            self.term.line("\n=== УПРАВЛЕНИЕ ПОСТАВЩИКАМИ ===")?;
            self.term.line("1. Показать всех поставщиков")?;
            self.term.line("2. Добавить поставщика")?;
            self.term.line("3. Удалить поставщика")?;
            self.term.line("4. Назад")?;
            let Some(choice) = self.term.prompt("\nВыберите действие: ")? else {
                return Ok(Flow::Exit);
            };

            let flow = match choice.trim() {
                "1" => {
                    self.list_suppliers()?;
                    Flow::Continue
                }
                "2" => self.add_supplier()?,
                "3" => self.delete_supplier()?,
                "4" => return Ok(Flow::Continue),
                _ => {
                    self.term.line("\nНеверный выбор!")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn list_suppliers(&mut self) -> io::Result<()> {
        self.term.line("\n=== СПИСОК ПОСТАВЩИКОВ ===")?;
        let suppliers = Repository::<Supplier<i64>>::list_all(&*self.store);
        if suppliers.is_empty() {
            return self.term.line("Поставщики не найдены.");
        }
        for supplier in &suppliers {
            self.term.line(format!("\n{}", supplier))?;
        }
        Ok(())
    }

    fn add_supplier(&mut self) -> io::Result<Flow> {
        self.term.line("\n=== ДОБАВЛЕНИЕ ПОСТАВЩИКА ===")?;
        let session = &mut self.suppliers.session;
        session.clear();

        let fields: [(&str, SupplierField, fn(String) -> SupplierChange); 5] = [
            ("Название поставщика: ", SupplierField::Name, SupplierChange::Name),
            ("Юридический адрес: ", SupplierField::LegalAddress, SupplierChange::LegalAddress),
            ("Название банка: ", SupplierField::Bank, SupplierChange::Bank),
            ("Номер счета: ", SupplierField::AccountNumber, SupplierChange::AccountNumber),
            ("ИНН: ", SupplierField::Inn, SupplierChange::Inn),
        ];
        for (label, field, change) in fields {
            let flow = read_field(&mut self.term, session, label, label, field, |text| {
                flat_text(text, label).map(change)
            })?;
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }

        match session.commit_add(&mut *self.store) {
            Ok(id) => self.term.line(format!(
                "{} добавлен с ID: {}",
                Supplier::<i64>::element_name(),
                id
            ))?,
            Err(message) => self.term.line(message)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_supplier(&mut self) -> io::Result<Flow> {
        let Some(text) = self.term.prompt("\nВведите ID поставщика для удаления: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(id) = i64::from_string(&text) else {
            self.term.line("Неверный ID!")?;
            return Ok(Flow::Continue);
        };

        let element = Supplier::<i64>::element_name();
        match Repository::<Supplier<i64>>::delete(&mut *self.store, id) {
            Ok(DeleteOutcome::Deleted) => self.term.line(format!("{} удален!", element))?,
            Ok(DeleteOutcome::NotFound) => self.term.line(format!("{} не найден!", element))?,
            Ok(DeleteOutcome::Referenced { .. }) => self
                .term
                .line("Невозможно удалить поставщика, так как есть фильмы от него!")?,
            Err(e) => self.term.line(format!("Ошибка при удалении поставщика: {}", e))?,
        }
        Ok(Flow::Continue)
    }

    // ========================================================================
    // Films
    // ========================================================================

    fn films_menu(&mut self) -> io::Result<Flow> {
        loop {
            self.term.line("\n=== УПРАВЛЕНИЕ ФИЛЬМАМИ ===")?;
            self.term.line("1. Показать все фильмы")?;
            self.term.line("2. Добавить фильм")?;
            self.term.line("3. Удалить фильм")?;
            self.term.line("4. Назад")?;
            let Some(choice) = self.term.prompt("\nВыберите действие: ")? else {
                return Ok(Flow::Exit);
            };

            let flow = match choice.trim() {
                "1" => {
                    self.list_films()?;
                    Flow::Continue
                }
                "2" => self.add_film()?,
                "3" => self.delete_film()?,
                "4" => return Ok(Flow::Continue),
                _ => {
                    self.term.line("\nНеверный выбор!")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn list_films(&mut self) -> io::Result<()> {
        self.term.line("\n=== СПИСОК ФИЛЬМОВ ===")?;
        let films = Repository::<Film<i64>>::list_all(&*self.store);
        if films.is_empty() {
            return self.term.line("Фильмы не найдены.");
        }
        for film in &films {
            self.term.line(format!("\n{}", film))?;
            if let Some(supplier) =
                Repository::<Supplier<i64>>::get_by_id(&*self.store, film.supplier_id)
            {
                self.term.line(format!("   Поставщик: {}", supplier.name))?;
            }
        }
        Ok(())
    }

    fn add_film(&mut self) -> io::Result<Flow> {
        self.term.line("\n=== ДОБАВЛЕНИЕ ФИЛЬМА ===")?;
        self.films.load(&*self.store);
        if self.films.supplier_options().is_empty() {
            self.term.line("Сначала необходимо добавить поставщика!")?;
            return Ok(Flow::Continue);
        }

        self.term.line("\nДоступные поставщики:")?;
        for supplier in self.films.supplier_options() {
            writeln!(self.term.output, "ID {}: {}", supplier.id, supplier.name)?;
        }

        let session = &mut self.films.session;
        session.clear();

        let texts: [(&str, FilmField, fn(String) -> FilmChange<i64>); 5] = [
            ("\nНазвание фильма: ", FilmField::Title, FilmChange::Title),
            (
                "Категория (боевик, триллер, комедия и др.): ",
                FilmField::Category,
                FilmChange::Category,
            ),
            ("Автор сценария: ", FilmField::Screenwriter, FilmChange::Screenwriter),
            ("Режиссер-постановщик: ", FilmField::Director, FilmChange::Director),
            (
                "Компания-производитель: ",
                FilmField::ProductionCompany,
                FilmChange::ProductionCompany,
            ),
        ];
        for (label, field, change) in texts {
            let retry = label.trim_start_matches('\n');
            let flow = read_field(&mut self.term, session, label, retry, field, |text| {
                flat_text(text, label).map(change)
            })?;
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }

        let numbers: [(&str, &str, FilmField, fn(&str) -> Parsed<FilmChange<i64>>); 3] = [
            (
                "Год выхода на экран: ",
                "Неверный год! Введите корректный год: ",
                FilmField::ReleaseYear,
                |text| text.trim().parse().map(FilmChange::ReleaseYear).map_err(|_| None),
            ),
            (
                "ID поставщика: ",
                "Неверный ID поставщика! Введите существующий ID: ",
                FilmField::Supplier,
                |text| i64::from_string(text).map(FilmChange::Supplier).map_err(|_| None),
            ),
            (
                "Стоимость приобретения (руб.): ",
                "Неверная стоимость! Введите положительное число: ",
                FilmField::PurchaseCost,
                |text| parse_amount(text).map(FilmChange::PurchaseCost).ok_or(None),
            ),
        ];
        for (label, retry, field, parse) in numbers {
            let flow = read_field(&mut self.term, session, label, retry, field, parse)?;
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }

        match session.commit_add(&mut *self.store) {
            Ok(id) => self.term.line(format!(
                "{} добавлен с ID: {}",
                Film::<i64>::element_name(),
                id
            ))?,
            Err(message) => self.term.line(message)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_film(&mut self) -> io::Result<Flow> {
        let Some(text) = self.term.prompt("\nВведите ID фильма для удаления: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(id) = i64::from_string(&text) else {
            self.term.line("Неверный ID!")?;
            return Ok(Flow::Continue);
        };

        let element = Film::<i64>::element_name();
        match Repository::<Film<i64>>::delete(&mut *self.store, id) {
            Ok(DeleteOutcome::Deleted) => self.term.line(format!("{} удален!", element))?,
            Ok(_) => self.term.line(format!("{} не найден!", element))?,
            Err(e) => self.term.line(format!("Ошибка при удалении фильма: {}", e))?,
        }
        Ok(Flow::Continue)
    }

    fn films_by_supplier(&mut self) -> io::Result<Flow> {
        self.term.line("\n=== ФИЛЬМЫ ПО ПОСТАВЩИКУ ===")?;
        let suppliers = Repository::<Supplier<i64>>::list_all(&*self.store);
        if suppliers.is_empty() {
            self.term.line("Поставщики не найдены.")?;
            return Ok(Flow::Continue);
        }

        self.term.line("\nДоступные поставщики:")?;
        for supplier in &suppliers {
            self.term.line(format!("ID {}: {}", supplier.id, supplier.name))?;
        }

        let Some(text) = self.term.prompt("\nВведите ID поставщика: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(id) = i64::from_string(&text) else {
            self.term.line("Неверный ID!")?;
            return Ok(Flow::Continue);
        };
        let Some(supplier) = suppliers.iter().find(|s| s.id == id) else {
            self.term.line("Поставщик не найден!")?;
            return Ok(Flow::Continue);
        };

        self.term.line(format!("\nПоставщик: {}", supplier.name))?;
        let films = self.store.films_by_supplier(id);
        if films.is_empty() {
            self.term.line("У этого поставщика нет фильмов.")?;
        } else {
            self.term.line(format!("\nФильмов от поставщика: {}", films.len()))?;
            for film in &films {
                self.term.line(format!("\n{}", film))?;
            }
        }
        Ok(Flow::Continue)
    }
}

/// Результат разбора строки ввода
///
/// `Err(None)`: переспросить молча, `Err(Some(message))`: сначала показать
/// сообщение.
type Parsed<C> = Result<C, Option<String>>;

/// Спрашивать значение поля, пока оно не разберётся и не пройдёт проверку
fn read_field<R, I, O, P>(
    term: &mut Terminal<I, O>,
    session: &mut EditSession<R>,
    label: &str,
    retry: &str,
    field: FieldOf<R>,
    parse: P,
) -> io::Result<Flow>
where
    R: FormRules,
    I: BufRead,
    O: Write,
    P: Fn(&str) -> Parsed<ChangeOf<R>>,
{
    let mut prompt = label;
    loop {
        let Some(text) = term.prompt(prompt)? else {
            return Ok(Flow::Exit);
        };
        prompt = retry;

        let change = match parse(&text) {
            Ok(change) => change,
            Err(None) => continue,
            Err(Some(message)) => {
                term.line(message)?;
                continue;
            }
        };
        session.apply(change);
        session.validate_field(field);
        match session.error(field) {
            None => return Ok(Flow::Continue),
            Some(message) => term.line(message)?,
        }
    }
}

/// Текстовое поле без разделителя `|`, который ломает строку файла
fn flat_text(text: &str, label: &str) -> Parsed<String> {
    let value = text.trim();
    if validator::is_valid_flat_text(value) {
        return Ok(value.to_string());
    }
    let field_label = label.trim().trim_end_matches(':');
    Err(Some(validator::flat_text_error_message(field_label)))
}

/// Денежная сумма; допускается запятая как десятичный разделитель
fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_text_rejects_separator() {
        assert_eq!(
            flat_text("  Acme Films ", "Название поставщика: "),
            Ok("Acme Films".to_string())
        );
        assert_eq!(
            flat_text("Acme | Films", "\nНазвание фильма: "),
            Err(Some(
                "Поле \"Название фильма\" не может содержать символ \"|\" или перевод строки"
                    .to_string()
            ))
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 99,5 "), Some(99.5));
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("abc"), None);
    }
}
