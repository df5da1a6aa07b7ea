use std::ops::RangeInclusive;

use backend::shared::data::Repository;
use chrono::Datelike;
use contracts::domain::a002_supplier::Supplier;
use contracts::domain::a003_film::{Film, FilmField};
use contracts::domain::common::AggregateId;
use contracts::shared::validator;
use contracts::shared::variant::VariantConfig;
use uuid::Uuid;

use crate::shared::edit_session::{EditSession, FormRules};

/// Правила формы фильмов: границы года и список поставщиков для выбора
pub struct FilmRules<K = Uuid> {
    pub release_years: RangeInclusive<i32>,
    pub suppliers: Vec<Supplier<K>>,
}

impl<K: AggregateId> FilmRules<K> {
    fn supplier_selected(&self, draft: &Film<K>) -> bool {
        draft.has_supplier() && self.suppliers.iter().any(|s| s.id == draft.supplier_id)
    }
}

impl<K: AggregateId> FormRules for FilmRules<K> {
    type Record = Film<K>;
    const FIELDS: &'static [FilmField] = &[
        FilmField::Title,
        FilmField::ReleaseYear,
        FilmField::PurchaseCost,
        FilmField::Supplier,
    ];
    const ELEMENT_GENITIVE: &'static str = "фильма";

    fn blank(&self) -> Film<K> {
        Film::new()
    }

    fn validate_field(&self, draft: &Film<K>, field: FilmField) -> Option<String> {
        match field {
            FilmField::Supplier if !self.supplier_selected(draft) => {
                Some("Необходимо выбрать поставщика".to_string())
            }
            _ => draft.validate_field(field, &self.release_years),
        }
    }

    fn has_required_fields(&self, draft: &Film<K>) -> bool {
        validator::is_valid_required_string(&draft.title) && self.supplier_selected(draft)
    }
}

/// ViewModel формы фильмов
pub struct FilmDetailsVm<K: AggregateId = Uuid> {
    pub session: EditSession<FilmRules<K>>,
}

impl<K: AggregateId> FilmDetailsVm<K> {
    pub fn new(config: &VariantConfig) -> Self {
        let current_year = chrono::Local::now().year();
        Self {
            session: EditSession::new(FilmRules {
                release_years: config.release_year_bounds(current_year),
                suppliers: Vec::new(),
            }),
        }
    }

    /// Загрузить фильмы и список поставщиков
    pub fn load<S>(&mut self, store: &S)
    where
        S: Repository<Film<K>> + Repository<Supplier<K>>,
    {
        self.set_suppliers(Repository::<Supplier<K>>::list_all(store));
        self.session.refresh(store);
    }

    /// Заменить список поставщиков для выбора
    pub fn set_suppliers(&mut self, suppliers: Vec<Supplier<K>>) {
        self.session.rules_mut().suppliers = suppliers;
        if self.session.draft().has_supplier() {
            self.session.validate_field(FilmField::Supplier);
        }
    }

    pub fn supplier_options(&self) -> &[Supplier<K>] {
        &self.session.rules().suppliers
    }

    pub fn release_years(&self) -> &RangeInclusive<i32> {
        &self.session.rules().release_years
    }

    /// Название поставщика по ID
    pub fn supplier_name(&self, id: K) -> String {
        self.supplier_options()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Неизвестный поставщик".to_string())
    }
}
