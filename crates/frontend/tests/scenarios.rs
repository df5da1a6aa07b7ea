use std::io::Cursor;

use backend::shared::data::{DataManager, DataStorage, Repository};
use chrono::NaiveDate;
use contracts::domain::a001_cinema::CinemaChange;
use contracts::domain::a002_supplier::{Supplier, SupplierChange};
use contracts::domain::a003_film::{Film, FilmChange, FilmField};
use contracts::domain::a004_rental::{Rental, RentalChange, RentalField};
use contracts::shared::variant::{CINEMA_RENTAL, FILM_CATALOG};
use frontend::console::Console;
use frontend::domain::a001_cinema::ui::details::CinemaDetailsVm;
use frontend::domain::a002_supplier::ui::details::SupplierDetailsVm;
use frontend::domain::a003_film::ui::details::FilmDetailsVm;
use frontend::domain::a004_rental::ui::details::RentalDetailsVm;
use tempfile::TempDir;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_storage(dir: &TempDir) -> DataStorage {
    DataStorage::open(dir.path().join(DataStorage::DEFAULT_FILE_NAME), CINEMA_RENTAL).unwrap()
}

fn open_catalog(dir: &TempDir) -> DataManager {
    DataManager::open(
        dir.path().join(DataManager::DEFAULT_SUPPLIERS_FILE),
        dir.path().join(DataManager::DEFAULT_FILMS_FILE),
        FILM_CATALOG,
    )
    .unwrap()
}

#[test]
fn supplier_then_film_then_films_by_supplier() {
    let dir = TempDir::new().unwrap();
    let mut store = open_storage(&dir);

    let mut suppliers = SupplierDetailsVm::<Uuid>::new();
    suppliers.session.apply(SupplierChange::Name("Acme".into()));
    let acme = suppliers.session.commit_add(&mut store).unwrap();

    let mut films = FilmDetailsVm::<Uuid>::new(&CINEMA_RENTAL);
    films.load(&store);
    films.session.apply(FilmChange::Title("X".into()));
    films.session.apply(FilmChange::Supplier(acme));
    films.session.apply(FilmChange::ReleaseYear(2020));
    films.session.apply(FilmChange::PurchaseCost(100.0));
    let film_id = films.session.commit_add(&mut store).unwrap();

    let by_supplier = store.films_by_supplier(acme);
    assert_eq!(by_supplier.len(), 1);
    assert_eq!(by_supplier[0].id, film_id);
    assert_eq!(by_supplier[0].title, "X");
}

#[test]
fn empty_title_blocks_commit_before_other_errors() {
    let dir = TempDir::new().unwrap();
    let mut store = open_catalog(&dir);
    let mut films = FilmDetailsVm::<i64>::new(&FILM_CATALOG);
    films.load(&store);
    films.session.apply(FilmChange::ReleaseYear(1500));
    films.session.apply(FilmChange::PurchaseCost(-1.0));

    let error = films.session.commit_add(&mut store).unwrap_err();
    assert_eq!(error, "Поле \"Название фильма\" обязательно для заполнения");
    assert!(films.session.error(FilmField::Supplier).is_some());
    assert!(Repository::<Film<i64>>::list_all(&store).is_empty());
    assert_eq!(std::fs::read_to_string(store.films_path()).unwrap(), "");
}

#[test]
fn rental_end_date_fix_clears_error_and_commits() {
    let dir = TempDir::new().unwrap();
    let mut store = open_storage(&dir);

    let mut cinemas = CinemaDetailsVm::new();
    cinemas.session.apply(CinemaChange::Name("Октябрь".into()));
    cinemas.session.apply(CinemaChange::SeatsCount(300));
    let cinema_id = cinemas.session.commit_add(&mut store).unwrap();

    let mut supplier = Supplier::<Uuid>::new();
    supplier.name = "Acme".into();
    let supplier_id = store.add(supplier).unwrap();
    let mut film = Film::<Uuid>::new();
    film.title = "X".into();
    film.supplier_id = supplier_id;
    let film_id = store.add(film).unwrap();

    let mut rentals = RentalDetailsVm::new();
    rentals.load(&store);
    rentals.session.apply(RentalChange::Cinema(cinema_id));
    rentals.session.apply(RentalChange::Film(film_id));
    rentals.session.apply(RentalChange::RentalPayment(5000.0));
    rentals.session.apply(RentalChange::DemoStartDate(date(2024, 1, 10)));
    rentals.session.apply(RentalChange::DemoEndDate(date(2024, 1, 5)));
    assert_eq!(
        rentals.session.error(RentalField::DemoEndDate),
        Some("Дата окончания не может быть раньше даты начала")
    );
    assert_eq!(
        rentals.session.commit_add(&mut store).unwrap_err(),
        "Дата начала не может быть позже даты окончания"
    );
    assert_eq!(
        rentals.session.message(),
        Some("Дата начала не может быть позже даты окончания")
    );
    assert!(Repository::<Rental>::list_all(&store).is_empty());

    rentals.session.apply(RentalChange::DemoEndDate(date(2024, 1, 20)));
    assert!(rentals.session.errors().is_empty());
    let rental_id = rentals.session.commit_add(&mut store).unwrap();

    let stored = Repository::<Rental>::get_by_id(&store, rental_id).unwrap();
    assert_eq!(stored.demo_end_date, date(2024, 1, 20));
    rentals.load(&store);
    assert_eq!(rentals.cinema_name(stored.cinema_id), "Октябрь");
    assert_eq!(rentals.film_title(stored.film_id), "X");
}

#[test]
fn console_session_adds_lists_and_guards() {
    let dir = TempDir::new().unwrap();
    let mut store = open_catalog(&dir);

    let input = [
        "2", "2", "4", // фильм без поставщиков
        "1", "2", "", "Acme", "Москва", "Сбербанк", "123", "40702810000000000001", "7701234567",
        "1", "4", //
        "2", "2", "X", "Драма", "", "", "", "abc", "2020", "9", "1", "100,5", "4", //
        "1", "3", "1", "4", //
        "3", "1", //
        "7", "5",
    ]
    .join("\n")
        + "\n";
    let mut output = Vec::new();
    Console::new(&mut store, Cursor::new(input), &mut output)
        .run()
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("Сначала необходимо добавить поставщика!"));
    assert!(output.contains("Поле \"Название\" обязательно для заполнения"));
    assert!(output.contains("Номер счета должен содержать 20 цифр"));
    assert!(output.contains("Поставщик добавлен с ID: 1"));
    assert!(output.contains("Неверный год! Введите корректный год: "));
    assert!(output.contains("Необходимо выбрать поставщика"));
    assert!(output.contains("Фильм добавлен с ID: 1"));
    assert!(output.contains("Невозможно удалить поставщика, так как есть фильмы от него!"));
    assert!(output.contains("Фильмов от поставщика: 1"));
    assert!(output.contains("Неверный выбор!"));
    assert!(output.trim_end().ends_with("До свидания!"));

    let films = std::fs::read_to_string(store.films_path()).unwrap();
    assert_eq!(films, "1|X|Драма||||2020|1|100.5\n");
}

#[test]
fn console_reprompts_text_with_field_separator() {
    let dir = TempDir::new().unwrap();
    let mut store = open_catalog(&dir);

    let input = [
        "1", "2", "Acme | Films", "Acme Films", "Москва", "Сбербанк", "", "", //
        "1", "2", "Second", "Казань", "ВТБ", "", "", "4", //
        "5",
    ]
    .join("\n")
        + "\n";
    let mut output = Vec::new();
    Console::new(&mut store, Cursor::new(input), &mut output)
        .run()
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains(
        "Поле \"Название поставщика\" не может содержать символ \"|\" или перевод строки"
    ));
    assert!(output.contains("Поставщик добавлен с ID: 2"));

    let reopened = open_catalog(&dir);
    let names: Vec<_> = Repository::<Supplier<i64>>::list_all(&reopened)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Acme Films", "Second"]);
}

#[test]
fn console_saves_when_input_ends() {
    let dir = TempDir::new().unwrap();
    let mut store = open_catalog(&dir);
    let mut output = Vec::new();
    Console::new(&mut store, Cursor::new("1\n2\nAcme\n"), &mut output)
        .run()
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Данные успешно сохранены!"));
    assert!(Repository::<Supplier<i64>>::list_all(&store).is_empty());
}
