use backend::shared::data::Repository;
use contracts::domain::a001_cinema::Cinema;
use contracts::domain::a003_film::Film;
use contracts::domain::a004_rental::{Rental, RentalField};
use uuid::Uuid;

use crate::shared::edit_session::{EditSession, FieldErrors, FormRules};

/// Правила формы аренды: списки кинотеатров и фильмов для выбора
#[derive(Default)]
pub struct RentalRules {
    pub cinemas: Vec<Cinema>,
    pub films: Vec<Film<Uuid>>,
}

impl RentalRules {
    fn cinema_selected(&self, draft: &Rental) -> bool {
        !draft.cinema_id.is_nil() && self.cinemas.iter().any(|c| c.id == draft.cinema_id)
    }

    fn film_selected(&self, draft: &Rental) -> bool {
        !draft.film_id.is_nil() && self.films.iter().any(|f| f.id == draft.film_id)
    }
}

impl FormRules for RentalRules {
    type Record = Rental;
    const FIELDS: &'static [RentalField] = &Rental::VALIDATED_FIELDS;
    const ELEMENT_GENITIVE: &'static str = "аренды";

    fn blank(&self) -> Rental {
        Rental::new()
    }

    fn validate_field(&self, draft: &Rental, field: RentalField) -> Option<String> {
        match field {
            RentalField::Cinema if !self.cinema_selected(draft) => {
                Some("Необходимо выбрать кинотеатр".to_string())
            }
            RentalField::Film if !self.film_selected(draft) => {
                Some("Необходимо выбрать фильм (киноленту)".to_string())
            }
            _ => draft.validate_field(field),
        }
    }

    fn has_required_fields(&self, draft: &Rental) -> bool {
        self.cinema_selected(draft) && self.film_selected(draft)
    }

    /// Корректная дата снимает ошибку парной даты, если даты согласованы.
    /// Парное поле заново не проверяется.
    fn reconcile(&self, draft: &Rental, changed: RentalField, errors: &mut FieldErrors<RentalField>) {
        let paired = match changed {
            RentalField::DemoStartDate => RentalField::DemoEndDate,
            RentalField::DemoEndDate => RentalField::DemoStartDate,
            _ => return,
        };
        if errors.get(changed).is_none() && draft.dates_consistent() {
            errors.clear_field(paired);
        }
    }
}

/// ViewModel формы аренды
pub struct RentalDetailsVm {
    pub session: EditSession<RentalRules>,
}

impl RentalDetailsVm {
    pub fn new() -> Self {
        Self {
            session: EditSession::new(RentalRules::default()),
        }
    }

    /// Загрузить аренды и списки кинотеатров и фильмов
    pub fn load<S>(&mut self, store: &S)
    where
        S: Repository<Rental> + Repository<Cinema> + Repository<Film<Uuid>>,
    {
        let rules = self.session.rules_mut();
        rules.cinemas = Repository::<Cinema>::list_all(store);
        rules.films = Repository::<Film<Uuid>>::list_all(store);
        self.session.refresh(store);
    }

    pub fn cinema_options(&self) -> &[Cinema] {
        &self.session.rules().cinemas
    }

    pub fn film_options(&self) -> &[Film<Uuid>] {
        &self.session.rules().films
    }

    /// Название кинотеатра по ID
    pub fn cinema_name(&self, id: Uuid) -> String {
        self.cinema_options()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Неизвестный кинотеатр".to_string())
    }

    /// Название фильма по ID
    pub fn film_title(&self, id: Uuid) -> String {
        self.film_options()
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.title.clone())
            .unwrap_or_else(|| "Неизвестный фильм".to_string())
    }
}

impl Default for RentalDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}
