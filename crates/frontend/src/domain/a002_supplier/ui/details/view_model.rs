use backend::shared::data::Repository;
use contracts::domain::a002_supplier::{Supplier, SupplierField};
use contracts::domain::common::AggregateId;
use contracts::shared::validator;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::shared::edit_session::{EditSession, FormRules};

pub struct SupplierRules<K = Uuid>(PhantomData<K>);

impl<K> Default for SupplierRules<K> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<K: AggregateId> FormRules for SupplierRules<K> {
    type Record = Supplier<K>;
    const FIELDS: &'static [SupplierField] = &[
        SupplierField::Name,
        SupplierField::AccountNumber,
        SupplierField::Inn,
    ];
    const ELEMENT_GENITIVE: &'static str = "поставщика";

    fn blank(&self) -> Supplier<K> {
        Supplier::new()
    }

    fn validate_field(&self, draft: &Supplier<K>, field: SupplierField) -> Option<String> {
        draft.validate_field(field)
    }

    fn has_required_fields(&self, draft: &Supplier<K>) -> bool {
        validator::is_valid_required_string(&draft.name)
    }
}

/// ViewModel формы поставщиков
pub struct SupplierDetailsVm<K: AggregateId = Uuid> {
    pub session: EditSession<SupplierRules<K>>,
}

impl<K: AggregateId> SupplierDetailsVm<K> {
    pub fn new() -> Self {
        Self {
            session: EditSession::new(SupplierRules::default()),
        }
    }

    pub fn load<S: Repository<Supplier<K>>>(&mut self, store: &S) {
        self.session.refresh(store);
    }
}

impl<K: AggregateId> Default for SupplierDetailsVm<K> {
    fn default() -> Self {
        Self::new()
    }
}
