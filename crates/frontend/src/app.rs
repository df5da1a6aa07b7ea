//! Cinema rental application state: one JSON store and the four forms.

use backend::shared::config::{self, Config};
use backend::shared::data::{DataStorage, StoreError};
use contracts::shared::variant::CINEMA_RENTAL;

use crate::domain::a001_cinema::ui::details::CinemaDetailsVm;
use crate::domain::a002_supplier::ui::details::SupplierDetailsVm;
use crate::domain::a003_film::ui::details::FilmDetailsVm;
use crate::domain::a004_rental::ui::details::RentalDetailsVm;

/// Раздел главного окна
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Cinemas,
    Suppliers,
    Films,
    Rentals,
}

pub struct CinemaRentalApp {
    pub store: DataStorage,
    pub cinemas: CinemaDetailsVm,
    pub suppliers: SupplierDetailsVm,
    pub films: FilmDetailsVm,
    pub rentals: RentalDetailsVm,
    active: Section,
}

impl CinemaRentalApp {
    /// Открыть файл данных, указанный в `[storage] data_file`
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let path = config::get_data_file_path(config);
        tracing::info!("Файл данных: {}", path.display());
        Ok(Self::with_store(DataStorage::open(path, CINEMA_RENTAL)?))
    }

    pub fn with_store(store: DataStorage) -> Self {
        let films = FilmDetailsVm::new(store.config());
        let mut app = Self {
            store,
            cinemas: CinemaDetailsVm::new(),
            suppliers: SupplierDetailsVm::new(),
            films,
            rentals: RentalDetailsVm::new(),
            active: Section::Cinemas,
        };
        for section in [Section::Suppliers, Section::Films, Section::Rentals, Section::Cinemas] {
            app.show(section);
        }
        app
    }

    pub fn active(&self) -> Section {
        self.active
    }

    /// Перейти в раздел и перечитать его списки
    ///
    /// Пикеры фильмов и аренды видят записи, добавленные в других разделах.
    pub fn show(&mut self, section: Section) {
        match section {
            Section::Cinemas => self.cinemas.load(&self.store),
            Section::Suppliers => self.suppliers.load(&self.store),
            Section::Films => self.films.load(&self.store),
            Section::Rentals => self.rentals.load(&self.store),
        }
        self.active = section;
    }
}
