//! Structured storage: all four collections in one JSON document.
//!
//! The file is rewritten in full after every change. A missing file is
//! created empty on load; an unreadable file leaves the store empty in
//! memory without touching the file.

use std::path::{Path, PathBuf};

use contracts::domain::a001_cinema::Cinema;
use contracts::domain::a002_supplier::Supplier;
use contracts::domain::a003_film::Film;
use contracts::domain::a004_rental::Rental;
use contracts::domain::common::AggregateId;
use contracts::shared::variant::VariantConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::settle_write;
use super::{Collection, DeleteOutcome, Repository, StoreError};

/// Содержимое файла данных
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DataContainer {
    cinemas: Vec<Cinema>,
    suppliers: Vec<Supplier<Uuid>>,
    films: Vec<Film<Uuid>>,
    rentals: Vec<Rental>,
}

/// То же содержимое для записи, без копирования коллекций
#[derive(Serialize)]
struct DataContainerRef<'a> {
    cinemas: &'a [Cinema],
    suppliers: &'a [Supplier<Uuid>],
    films: &'a [Film<Uuid>],
    rentals: &'a [Rental],
}

/// Хранилище учёта проката: кинотеатры, поставщики, фильмы, аренда
#[derive(Debug)]
pub struct DataStorage {
    path: PathBuf,
    config: VariantConfig,
    cinemas: Collection<Cinema>,
    suppliers: Collection<Supplier<Uuid>>,
    films: Collection<Film<Uuid>>,
    rentals: Collection<Rental>,
}

impl DataStorage {
    pub const DEFAULT_FILE_NAME: &'static str = "cinema_rental_data.json";

    /// Открыть хранилище и загрузить данные из файла
    pub fn open(path: impl Into<PathBuf>, config: VariantConfig) -> Result<Self, StoreError> {
        if config.id_scheme != Uuid::SCHEME {
            return Err(StoreError::SchemeMismatch {
                variant: config.name,
                expected: Uuid::SCHEME,
                configured: config.id_scheme,
            });
        }

        let mut storage = Self {
            path: path.into(),
            config,
            cinemas: Collection::new(),
            suppliers: Collection::new(),
            films: Collection::new(),
            rentals: Collection::new(),
        };
        storage.load();
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    /// Загрузить данные из файла
    ///
    /// Не падает: при ошибке чтения или разбора данные остаются пустыми.
    pub fn load(&mut self) {
        self.replace_data(DataContainer::default());

        if !self.path.exists() {
            tracing::info!(
                "Файл данных {} не найден, создаём пустой",
                self.path.display()
            );
            if let Err(e) = self.write_file() {
                tracing::error!("Ошибка при загрузке данных: {}", e);
            }
            return;
        }

        match self.read_file() {
            Ok(data) => {
                self.replace_data(data);
                tracing::info!(
                    "Загружено из {}: кинотеатров {}, поставщиков {}, фильмов {}, аренд {}",
                    self.path.display(),
                    self.cinemas.len(),
                    self.suppliers.len(),
                    self.films.len(),
                    self.rentals.len()
                );
            }
            Err(e) => tracing::error!("Ошибка при загрузке данных: {}", e),
        }
    }

    /// Сохранить все данные в файл
    pub fn save(&self) -> Result<(), StoreError> {
        settle_write(self.config.persistence_errors, self.write_file())
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

    /// Фильмы указанного поставщика
    pub fn films_by_supplier(&self, supplier_id: Uuid) -> Vec<Film<Uuid>> {
        self.films
            .iter()
            .filter(|film| film.supplier_id == supplier_id)
            .cloned()
            .collect()
    }

    fn replace_data(&mut self, data: DataContainer) {
        self.cinemas = Collection::from_vec(data.cinemas);
        self.suppliers = Collection::from_vec(data.suppliers);
        self.films = Collection::from_vec(data.films);
        self.rentals = Collection::from_vec(data.rentals);
    }

    fn read_file(&self) -> Result<DataContainer, StoreError> {
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::io("прочитать", &self.path, e))?;
        serde_json::from_str(&json).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_file(&self) -> Result<(), StoreError> {
        let data = DataContainerRef {
            cinemas: self.cinemas.as_slice(),
            suppliers: self.suppliers.as_slice(),
            films: self.films.as_slice(),
            rentals: self.rentals.as_slice(),
        };
        let json = serde_json::to_string_pretty(&data).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::io("записать", &self.path, e))
    }
}

impl Repository<Cinema> for DataStorage {
    fn list_all(&self) -> Vec<Cinema> {
        self.cinemas.to_vec()
    }

    fn get_by_id(&self, id: Uuid) -> Option<Cinema> {
        self.cinemas.get(id).cloned()
    }

    fn add(&mut self, cinema: Cinema) -> Result<Uuid, StoreError> {
        let snapshot = self.cinemas.clone();
        let id = self.cinemas.insert(cinema);
        self.persist(|s| s.cinemas = snapshot)?;
        Ok(id)
    }

    fn update(&mut self, cinema: Cinema) -> Result<bool, StoreError> {
        let snapshot = self.cinemas.clone();
        if !self.cinemas.replace(cinema) {
            return Ok(false);
        }
        self.persist(|s| s.cinemas = snapshot)?;
        Ok(true)
    }

    fn delete(&mut self, id: Uuid) -> Result<DeleteOutcome, StoreError> {
        let snapshot = self.cinemas.clone();
        if self.cinemas.remove(id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }
        self.persist(|s| s.cinemas = snapshot)?;
        Ok(DeleteOutcome::Deleted)
    }
}

impl Repository<Supplier<Uuid>> for DataStorage {
    fn list_all(&self) -> Vec<Supplier<Uuid>> {
        self.suppliers.to_vec()
    }

    fn get_by_id(&self, id: Uuid) -> Option<Supplier<Uuid>> {
        self.suppliers.get(id).cloned()
    }

    fn add(&mut self, supplier: Supplier<Uuid>) -> Result<Uuid, StoreError> {
        let snapshot = self.suppliers.clone();
        let id = self.suppliers.insert(supplier);
        self.persist(|s| s.suppliers = snapshot)?;
        Ok(id)
    }

    fn update(&mut self, supplier: Supplier<Uuid>) -> Result<bool, StoreError> {
        let snapshot = self.suppliers.clone();
        if !self.suppliers.replace(supplier) {
            return Ok(false);
        }
        self.persist(|s| s.suppliers = snapshot)?;
        Ok(true)
    }

    fn delete(&mut self, id: Uuid) -> Result<DeleteOutcome, StoreError> {
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

impl Repository<Film<Uuid>> for DataStorage {
    fn list_all(&self) -> Vec<Film<Uuid>> {
        self.films.to_vec()
    }

    fn get_by_id(&self, id: Uuid) -> Option<Film<Uuid>> {
        self.films.get(id).cloned()
    }

    fn add(&mut self, film: Film<Uuid>) -> Result<Uuid, StoreError> {
        let snapshot = self.films.clone();
        let id = self.films.insert(film);
        self.persist(|s| s.films = snapshot)?;
        Ok(id)
    }

    fn update(&mut self, film: Film<Uuid>) -> Result<bool, StoreError> {
        let snapshot = self.films.clone();
        if !self.films.replace(film) {
            return Ok(false);
        }
        self.persist(|s| s.films = snapshot)?;
        Ok(true)
    }

    fn delete(&mut self, id: Uuid) -> Result<DeleteOutcome, StoreError> {
        let snapshot = self.films.clone();
        if self.films.remove(id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }
        self.persist(|s| s.films = snapshot)?;
        Ok(DeleteOutcome::Deleted)
    }
}

impl Repository<Rental> for DataStorage {
    fn list_all(&self) -> Vec<Rental> {
        self.rentals.to_vec()
    }

    fn get_by_id(&self, id: Uuid) -> Option<Rental> {
        self.rentals.get(id).cloned()
    }

    fn add(&mut self, rental: Rental) -> Result<Uuid, StoreError> {
        let snapshot = self.rentals.clone();
        let id = self.rentals.insert(rental);
        self.persist(|s| s.rentals = snapshot)?;
        Ok(id)
    }

    fn update(&mut self, rental: Rental) -> Result<bool, StoreError> {
        let snapshot = self.rentals.clone();
        if !self.rentals.replace(rental) {
            return Ok(false);
        }
        self.persist(|s| s.rentals = snapshot)?;
        Ok(true)
    }

    fn delete(&mut self, id: Uuid) -> Result<DeleteOutcome, StoreError> {
        let snapshot = self.rentals.clone();
        if self.rentals.remove(id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }
        self.persist(|s| s.rentals = snapshot)?;
        Ok(DeleteOutcome::Deleted)
    }
}
