use backend::shared::data::Repository;
use contracts::domain::a001_cinema::{Cinema, CinemaField};
use contracts::shared::validator;
use uuid::Uuid;

use crate::shared::edit_session::{EditSession, FormRules};

pub struct CinemaRules;

impl FormRules for CinemaRules {
    type Record = Cinema;
    const FIELDS: &'static [CinemaField] = &Cinema::VALIDATED_FIELDS;
    const ELEMENT_GENITIVE: &'static str = "кинотеатра";

    fn blank(&self) -> Cinema {
        Cinema::new()
    }

    fn validate_field(&self, draft: &Cinema, field: CinemaField) -> Option<String> {
        draft.validate_field(field)
    }

    fn has_required_fields(&self, draft: &Cinema) -> bool {
        validator::is_valid_required_string(&draft.name)
    }
}

/// ViewModel формы кинотеатров
pub struct CinemaDetailsVm {
    pub session: EditSession<CinemaRules>,
}

impl CinemaDetailsVm {
    pub fn new() -> Self {
        Self {
            session: EditSession::new(CinemaRules),
        }
    }

    pub fn load<S: Repository<Cinema>>(&mut self, store: &S) {
        self.session.refresh(store);
    }

    /// Название кинотеатра по ID
    pub fn cinema_name(&self, id: Uuid) -> String {
        self.session
            .items()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Неизвестный кинотеатр".to_string())
    }
}

impl Default for CinemaDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::shared::data::DataStorage;
    use contracts::domain::a001_cinema::CinemaChange;
    use contracts::shared::variant::CINEMA_RENTAL;
    use tempfile::TempDir;

    #[test]
    fn test_first_error_follows_field_order() {
        let dir = TempDir::new().unwrap();
        let mut store = DataStorage::open(dir.path().join("data.json"), CINEMA_RENTAL).unwrap();
        let mut vm = CinemaDetailsVm::new();
        vm.session.apply(CinemaChange::Name("Октябрь".into()));
        vm.session.apply(CinemaChange::Inn("12345".into()));
        vm.session.apply(CinemaChange::Phone("abc".into()));

        // места (0) проверяются раньше ИНН, телефон раньше мест
        let error = vm.session.commit_add(&mut store).unwrap_err();
        assert_eq!(error, validator::phone_error_message());

        vm.session.apply(CinemaChange::Phone("+7 (495) 123-45-67".into()));
        let error = vm.session.commit_add(&mut store).unwrap_err();
        assert_eq!(error, validator::seats_count_error_message());

        vm.session.apply(CinemaChange::SeatsCount(350));
        let error = vm.session.commit_add(&mut store).unwrap_err();
        assert_eq!(error, validator::inn_error_message());
        assert!(Repository::<Cinema>::list_all(&store).is_empty());
    }

    #[test]
    fn test_optional_requisites_may_stay_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = DataStorage::open(dir.path().join("data.json"), CINEMA_RENTAL).unwrap();
        let mut vm = CinemaDetailsVm::new();
        assert!(!vm.session.can_add());
        vm.session.apply(CinemaChange::Name("Октябрь".into()));
        vm.session.apply(CinemaChange::SeatsCount(1));
        assert!(vm.session.can_add());

        let id = vm.session.commit_add(&mut store).unwrap();
        assert_eq!(vm.cinema_name(id), "Октябрь");
        assert_eq!(vm.cinema_name(Uuid::nil()), "Неизвестный кинотеатр");
    }
}
