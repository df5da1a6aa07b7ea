//! Flat-file storage for the film catalog: `suppliers.txt` and `films.txt`.
//!
//! One record per line, fields separated by `|`, no header and no quoting.
//! Identifiers are integers assigned as max + 1.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use contracts::domain::a002_supplier::Supplier;
use contracts::domain::a003_film::Film;
use contracts::domain::common::AggregateId;
use contracts::shared::validator;
use contracts::shared::variant::VariantConfig;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};

use super::error::settle_write;
use super::{Collection, DeleteOutcome, Repository, StoreError};

const SUPPLIER_FIELDS: usize = 6;
const FILM_FIELDS: usize = 9;

/// Менеджер данных каталога фильмов
#[derive(Debug)]
pub struct DataManager {
    suppliers_path: PathBuf,
    films_path: PathBuf,
    config: VariantConfig,
    suppliers: Collection<Supplier<i64>>,
    films: Collection<Film<i64>>,
}

impl DataManager {
    pub const DEFAULT_SUPPLIERS_FILE: &'static str = "suppliers.txt";
    pub const DEFAULT_FILMS_FILE: &'static str = "films.txt";

    pub fn open(
        suppliers_path: impl Into<PathBuf>,
        films_path: impl Into<PathBuf>,
        config: VariantConfig,
    ) -> Result<Self, StoreError> {
        if config.id_scheme != i64::SCHEME {
            return Err(StoreError::SchemeMismatch {
                variant: config.name,
                expected: i64::SCHEME,
                configured: config.id_scheme,
            });
        }

        let mut manager = Self {
            suppliers_path: suppliers_path.into(),
            films_path: films_path.into(),
            config,
            suppliers: Collection::new(),
            films: Collection::new(),
        };
        manager.load();
        Ok(manager)
    }

    pub fn suppliers_path(&self) -> &Path {
        &self.suppliers_path
    }

    pub fn films_path(&self) -> &Path {
        &self.films_path
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    /// Загрузить поставщиков и фильмы
    ///
    /// Чтение файла прекращается на первой ошибочной строке; уже
    /// прочитанные записи остаются в памяти.
    pub fn load(&mut self) {
        let (suppliers, error) = read_records(&self.suppliers_path, "поставщик", parse_supplier);
        self.suppliers = Collection::from_vec(suppliers);
        match error {
            Some(e) => tracing::error!("Ошибка при загрузке поставщиков: {}", e),
            None => tracing::info!("Загружено поставщиков: {}", self.suppliers.len()),
        }

        let (films, error) = read_records(&self.films_path, "фильм", parse_film);
        self.films = Collection::from_vec(films);
        match error {
            Some(e) => tracing::error!("Ошибка при загрузке фильмов: {}", e),
            None => tracing::info!("Загружено фильмов: {}", self.films.len()),
        }

        for path in [&self.suppliers_path, &self.films_path] {
            if !path.exists() {
                if let Err(e) = std::fs::write(path, "") {
                    tracing::error!("{}", StoreError::io("создать", path, e));
                }
            }
        }
    }

    /// Записать оба файла целиком
    pub fn save(&self) -> Result<(), StoreError> {
        settle_write(self.config.persistence_errors, self.write_files())
    }

    /// Сохранить изменение; если ошибка записи возвращается вызывающему,
    /// память возвращается к состоянию до изменения
    fn persist(&mut self, rollback: impl FnOnce(&mut Self)) -> Result<(), StoreError> {
        let result = self.save();
        if result.is_err() {
            rollback(self);
        }
        result
    }

    pub fn films_by_supplier(&self, supplier_id: i64) -> Vec<Film<i64>> {
        self.films
            .iter()
            .filter(|film| film.supplier_id == supplier_id)
            .cloned()
            .collect()
    }

    fn write_files(&self) -> Result<(), StoreError> {
        write_records(&self.suppliers_path, self.suppliers.iter().map(supplier_record))?;
        tracing::info!("Сохранено поставщиков: {}", self.suppliers.len());
        write_records(&self.films_path, self.films.iter().map(film_record))?;
        tracing::info!("Сохранено фильмов: {}", self.films.len());
        Ok(())
    }
}

// ============================================================================
// Repository
// ============================================================================

impl Repository<Supplier<i64>> for DataManager {
    fn list_all(&self) -> Vec<Supplier<i64>> {
        self.suppliers.to_vec()
    }

    fn get_by_id(&self, id: i64) -> Option<Supplier<i64>> {
        self.suppliers.get(id).cloned()
    }

    fn add(&mut self, supplier: Supplier<i64>) -> Result<i64, StoreError> {
        check_supplier_text(&supplier)?;
        let snapshot = self.suppliers.clone();
        let id = self.suppliers.insert(supplier);
        self.persist(|s| s.suppliers = snapshot)?;
        tracing::info!("Поставщик добавлен с ID: {}", id);
        Ok(id)
    }

    fn update(&mut self, supplier: Supplier<i64>) -> Result<bool, StoreError> {
        check_supplier_text(&supplier)?;
        let snapshot = self.suppliers.clone();
        if !self.suppliers.replace(supplier) {
            return Ok(false);
        }
        self.persist(|s| s.suppliers = snapshot)?;
        Ok(true)
    }

    fn delete(&mut self, id: i64) -> Result<DeleteOutcome, StoreError> {
        if !self.suppliers.contains(id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if self.config.guard_supplier_delete {
            let films = self.films.iter().filter(|f| f.supplier_id == id).count();
            if films > 0 {
                tracing::warn!(
                    "Невозможно удалить поставщика {}, так как есть фильмы от него ({})",
                    id,
                    films
                );
                return Ok(DeleteOutcome::Referenced { films });
            }
        }
        let snapshot = self.suppliers.clone();
        self.suppliers.remove(id);
        self.persist(|s| s.suppliers = snapshot)?;
        Ok(DeleteOutcome::Deleted)
    }
}

impl Repository<Film<i64>> for DataManager {
    fn list_all(&self) -> Vec<Film<i64>> {
        self.films.to_vec()
    }

    fn get_by_id(&self, id: i64) -> Option<Film<i64>> {
        self.films.get(id).cloned()
    }

    fn add(&mut self, film: Film<i64>) -> Result<i64, StoreError> {
        check_film_text(&film)?;
        let snapshot = self.films.clone();
        let id = self.films.insert(film);
        self.persist(|s| s.films = snapshot)?;
        tracing::info!("Фильм добавлен с ID: {}", id);
        Ok(id)
    }

    fn update(&mut self, film: Film<i64>) -> Result<bool, StoreError> {
        check_film_text(&film)?;
        let snapshot = self.films.clone();
        if !self.films.replace(film) {
            return Ok(false);
        }
        self.persist(|s| s.films = snapshot)?;
        Ok(true)
    }

    fn delete(&mut self, id: i64) -> Result<DeleteOutcome, StoreError> {
        let snapshot = self.films.clone();
        if self.films.remove(id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }
        self.persist(|s| s.films = snapshot)?;
        Ok(DeleteOutcome::Deleted)
    }
}

// ============================================================================
// Line format
// ============================================================================

fn check_supplier_text(s: &Supplier<i64>) -> Result<(), StoreError> {
    check_text(
        "поставщик",
        &[
            ("Название", s.name.as_str()),
            ("Юридический адрес", s.legal_address.as_str()),
            ("Банк", s.bank.as_str()),
            ("Номер счета", s.account_number.as_str()),
            ("ИНН", s.inn.as_str()),
        ],
    )
}

fn check_film_text(f: &Film<i64>) -> Result<(), StoreError> {
    check_text(
        "фильм",
        &[
            ("Название", f.title.as_str()),
            ("Категория", f.category.as_str()),
            ("Сценарист", f.screenwriter.as_str()),
            ("Режиссер", f.director.as_str()),
            ("Компания-производитель", f.production_company.as_str()),
        ],
    )
}

/// Текстовые поля пишутся без кавычек, поэтому разделитель и переводы
/// строк в них не допускаются
fn check_text(entity: &'static str, fields: &[(&'static str, &str)]) -> Result<(), StoreError> {
    match fields.iter().find(|(_, value)| !validator::is_valid_flat_text(value)) {
        Some(&(field, _)) => Err(StoreError::InvalidText { entity, field }),
        None => Ok(()),
    }
}

fn supplier_record(s: &Supplier<i64>) -> Vec<String> {
    vec![
        s.id.to_string(),
        s.name.clone(),
        s.legal_address.clone(),
        s.bank.clone(),
        s.account_number.clone(),
        s.inn.clone(),
    ]
}

fn film_record(f: &Film<i64>) -> Vec<String> {
    vec![
        f.id.to_string(),
        f.title.clone(),
        f.category.clone(),
        f.screenwriter.clone(),
        f.director.clone(),
        f.production_company.clone(),
        f.release_year.to_string(),
        f.supplier_id.to_string(),
        f.purchase_cost.to_string(),
    ]
}

fn parse_supplier(record: &StringRecord, line: u64) -> Result<Supplier<i64>, StoreError> {
    expect_fields(record, SUPPLIER_FIELDS, "поставщик", line)?;
    Ok(Supplier {
        id: parse_field(record, 0, "поставщик", line)?,
        name: record[1].to_string(),
        legal_address: record[2].to_string(),
        bank: record[3].to_string(),
        account_number: record[4].to_string(),
        inn: record[5].to_string(),
    })
}

fn parse_film(record: &StringRecord, line: u64) -> Result<Film<i64>, StoreError> {
    expect_fields(record, FILM_FIELDS, "фильм", line)?;
    let cost = record[8].trim().replace(',', ".");
    Ok(Film {
        id: parse_field(record, 0, "фильм", line)?,
        title: record[1].to_string(),
        category: record[2].to_string(),
        screenwriter: record[3].to_string(),
        director: record[4].to_string(),
        production_company: record[5].to_string(),
        release_year: parse_field(record, 6, "фильм", line)?,
        supplier_id: parse_field(record, 7, "фильм", line)?,
        purchase_cost: cost.parse().map_err(|e| StoreError::Format {
            entity: "фильм",
            line,
            reason: format!("стоимость {:?}: {}", &record[8], e),
        })?,
    })
}

fn expect_fields(
    record: &StringRecord,
    expected: usize,
    entity: &'static str,
    line: u64,
) -> Result<(), StoreError> {
    if record.len() == expected {
        return Ok(());
    }
    Err(StoreError::Format {
        entity,
        line,
        reason: format!("ожидалось полей: {}, получено: {}", expected, record.len()),
    })
}

fn parse_field<T>(
    record: &StringRecord,
    index: usize,
    entity: &'static str,
    line: u64,
) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = &record[index];
    raw.trim().parse().map_err(|e: T::Err| StoreError::Format {
        entity,
        line,
        reason: format!("поле {} {:?}: {}", index + 1, raw, e),
    })
}

/// Прочитать записи до первой ошибки
///
/// Возвращает прочитанные записи и ошибку, на которой чтение остановилось.
/// Отсутствующий файл читается как пустой.
fn read_records<T>(
    path: &Path,
    entity: &'static str,
    parse: fn(&StringRecord, u64) -> Result<T, StoreError>,
) -> (Vec<T>, Option<StoreError>) {
    let mut items = Vec::new();
    if !path.exists() {
        return (items, None);
    }

    let mut reader = match ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(source) => {
            let error = StoreError::Csv {
                path: path.to_path_buf(),
                source,
            };
            return (items, Some(error));
        }
    };

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(source) => {
                let error = StoreError::Csv {
                    path: path.to_path_buf(),
                    source,
                };
                return (items, Some(error));
            }
        };
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);
        match parse(&record, line) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::debug!("Чтение {} остановлено на строке {} ({})", path.display(), line, entity);
                return (items, Some(e));
            }
        }
    }
    (items, None)
}

fn write_records<I>(path: &Path, records: I) -> Result<(), StoreError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let csv_error = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_path(path)
        .map_err(csv_error)?;
    for record in records {
        writer.write_record(&record).map_err(csv_error)?;
    }
    writer
        .flush()
        .map_err(|e| StoreError::io("записать", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::variant::{PersistenceErrorPolicy, CINEMA_RENTAL, FILM_CATALOG};
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> DataManager {
        DataManager::open(
            dir.path().join(DataManager::DEFAULT_SUPPLIERS_FILE),
            dir.path().join(DataManager::DEFAULT_FILMS_FILE),
            FILM_CATALOG,
        )
        .unwrap()
    }

    fn supplier(name: &str) -> Supplier<i64> {
        let mut s = Supplier::new();
        s.name = name.to_string();
        s.legal_address = "Москва, ул. Тверская, 1".to_string();
        s.bank = "Сбербанк".to_string();
        s.account_number = "40702810000000000001".to_string();
        s.inn = "7701234567".to_string();
        s
    }

    fn film(title: &str, supplier_id: i64) -> Film<i64> {
        let mut f = Film::new();
        f.title = title.to_string();
        f.category = "Драма".to_string();
        f.release_year = 1999;
        f.supplier_id = supplier_id;
        f.purchase_cost = 1500.5;
        f
    }

    #[test]
    fn test_missing_files_are_created() {
        let dir = TempDir::new().unwrap();
        let manager = open_in(&dir);
        assert!(manager.suppliers_path().exists());
        assert!(manager.films_path().exists());
        assert!(Repository::<Supplier<i64>>::list_all(&manager).is_empty());
    }

    #[test]
    fn test_rejects_uuid_variant() {
        let dir = TempDir::new().unwrap();
        let result = DataManager::open(dir.path().join("s"), dir.path().join("f"), CINEMA_RENTAL);
        assert!(matches!(result, Err(StoreError::SchemeMismatch { .. })));
    }

    #[test]
    fn test_lines_written_in_pipe_format() {
        let dir = TempDir::new().unwrap();
        let mut manager = open_in(&dir);
        let supplier_id = manager.add(supplier("Acme")).unwrap();
        manager.add(film("X", supplier_id)).unwrap();

        let suppliers = std::fs::read_to_string(manager.suppliers_path()).unwrap();
        assert_eq!(
            suppliers,
            "1|Acme|Москва, ул. Тверская, 1|Сбербанк|40702810000000000001|7701234567\n"
        );
        let films = std::fs::read_to_string(manager.films_path()).unwrap();
        assert_eq!(films, "1|X|Драма||||1999|1|1500.5\n");
    }

    #[test]
    fn test_reload_keeps_ids_and_continues_sequence() {
        let dir = TempDir::new().unwrap();
        let mut manager = open_in(&dir);
        manager.add(supplier("A")).unwrap();
        let b = manager.add(supplier("B")).unwrap();
        assert_eq!(b, 2);

        let mut reopened = open_in(&dir);
        let names: Vec<_> = Repository::<Supplier<i64>>::list_all(&reopened)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(reopened.add(supplier("C")).unwrap(), 3);
    }

    #[test]
    fn test_bad_line_stops_reading_and_keeps_earlier_records() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DataManager::DEFAULT_SUPPLIERS_FILE),
            "1|A|addr|bank|acc|inn\n\n2|B|too|few\n3|C|addr|bank|acc|inn\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(DataManager::DEFAULT_FILMS_FILE),
            "1|X|cat|sc|dir|prod|2001|1|99,90\n",
        )
        .unwrap();

        let manager = open_in(&dir);
        let suppliers = Repository::<Supplier<i64>>::list_all(&manager);
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].name, "A");

        let films = Repository::<Film<i64>>::list_all(&manager);
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].purchase_cost, 99.9);
    }

    #[test]
    fn test_wrong_field_count_is_format_error() {
        let record = StringRecord::from(vec!["1", "A"]);
        let error = parse_supplier(&record, 7).unwrap_err();
        assert!(matches!(error, StoreError::Format { line: 7, .. }));
    }

    #[test]
    fn test_supplier_with_films_cannot_be_deleted() {
        let dir = TempDir::new().unwrap();
        let mut manager = open_in(&dir);
        let supplier_id = manager.add(supplier("Acme")).unwrap();
        let film_id = manager.add(film("X", supplier_id)).unwrap();
        let before = std::fs::read_to_string(manager.suppliers_path()).unwrap();

        let outcome = Repository::<Supplier<i64>>::delete(&mut manager, supplier_id).unwrap();
        assert_eq!(outcome, DeleteOutcome::Referenced { films: 1 });
        assert_eq!(std::fs::read_to_string(manager.suppliers_path()).unwrap(), before);

        Repository::<Film<i64>>::delete(&mut manager, film_id).unwrap();
        let outcome = Repository::<Supplier<i64>>::delete(&mut manager, supplier_id).unwrap();
        assert!(outcome.is_deleted());
        assert_eq!(
            Repository::<Supplier<i64>>::delete(&mut manager, supplier_id).unwrap(),
            DeleteOutcome::NotFound
        );
    }

    #[test]
    fn test_separator_in_text_is_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let mut manager = open_in(&dir);

        let error = manager.add(supplier("Acme | Films")).unwrap_err();
        assert!(matches!(
            error,
            StoreError::InvalidText { entity: "поставщик", field: "Название" }
        ));
        let second = manager.add(supplier("Second")).unwrap();
        assert_eq!(second, 1);

        let mut renamed = Repository::<Supplier<i64>>::get_by_id(&manager, second).unwrap();
        renamed.bank = "Сбер\nбанк".to_string();
        assert!(manager.update(renamed).is_err());
        let mut multiline = film("Первая строка\r\nвторая", second);
        multiline.director = "A|B".to_string();
        assert!(manager.add(multiline).is_err());
        manager.add(film("X", second)).unwrap();

        let reopened = open_in(&dir);
        let suppliers = Repository::<Supplier<i64>>::list_all(&reopened);
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].name, "Second");
        assert_eq!(suppliers[0].bank, "Сбербанк");
        assert_eq!(reopened.films_by_supplier(second).len(), 1);
    }

    #[test]
    fn test_propagated_write_failure_rolls_back() {
        let dir = TempDir::new().unwrap();
        let config = VariantConfig {
            persistence_errors: PersistenceErrorPolicy::Propagate,
            ..FILM_CATALOG
        };
        let mut manager = DataManager::open(
            dir.path().join(DataManager::DEFAULT_SUPPLIERS_FILE),
            dir.path().join(DataManager::DEFAULT_FILMS_FILE),
            config,
        )
        .unwrap();
        let kept = manager.add(supplier("Acme")).unwrap();

        let good_path = manager.suppliers_path.clone();
        manager.suppliers_path = dir.path().join("missing-dir").join("suppliers.txt");
        assert!(manager.add(supplier("Lost")).is_err());
        assert!(Repository::<Supplier<i64>>::delete(&mut manager, kept).is_err());
        assert!(manager.add(film("X", kept)).is_err());

        let names: Vec<_> = Repository::<Supplier<i64>>::list_all(&manager)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Acme"]);
        assert!(manager.films_by_supplier(kept).is_empty());

        manager.suppliers_path = good_path;
        assert_eq!(manager.add(supplier("Next")).unwrap(), 2);
    }

    #[test]
    fn test_write_failure_is_only_logged() {
        let dir = TempDir::new().unwrap();
        let mut manager = open_in(&dir);
        manager.suppliers_path = dir.path().join("missing-dir").join("suppliers.txt");

        let id = manager.add(supplier("Acme")).unwrap();
        assert_eq!(id, 1);
        assert_eq!(manager.films_by_supplier(id), Vec::new());
    }
}
