//! Editing session shared by the four record forms.
//!
//! A session owns the visible list, the selection, the draft and the
//! per-field errors. Every draft change goes through [`EditSession::apply`],
//! which revalidates the changed field only. Commits validate everything and
//! report the first error in the form's field order.

use backend::shared::data::{DeleteOutcome, Repository};
use contracts::domain::common::{AggregateRoot, Draft};

pub type FieldOf<R> = <<R as FormRules>::Record as Draft>::Field;
pub type ChangeOf<R> = <<R as FormRules>::Record as Draft>::Change;
pub type IdOf<R> = <<R as FormRules>::Record as AggregateRoot>::Id;

// ============================================================================
// Field errors
// ============================================================================

/// Сообщения об ошибках по полям формы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F> {
    entries: Vec<(F, String)>,
}

impl<F: Copy + Eq> FieldErrors<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    /// Установить или снять ошибку поля; пустое сообщение снимает ошибку
    pub fn set(&mut self, field: F, error: Option<String>) {
        match error.filter(|message| !message.trim().is_empty()) {
            Some(message) => match self.entries.iter_mut().find(|(f, _)| *f == field) {
                Some(entry) => entry.1 = message,
                None => self.entries.push((field, message)),
            },
            None => self.clear_field(field),
        }
    }

    pub fn clear_field(&mut self, field: F) {
        self.entries.retain(|(f, _)| *f != field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Первая ошибка в заданном порядке полей
    pub fn first_in(&self, order: &[F]) -> Option<&str> {
        order.iter().find_map(|field| self.get(*field))
    }
}

impl<F: Copy + Eq> Default for FieldErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Form rules
// ============================================================================

/// Состояние сессии редактирования
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ничего не выбрано, черновик пустой
    Idle,
    /// Черновик привязан к записи или к новой записи
    Editing,
}

/// Правила формы конкретного вида записей
pub trait FormRules {
    type Record: AggregateRoot + Draft + Clone;

    /// Проверяемые поля в порядке вывода первой ошибки
    const FIELDS: &'static [FieldOf<Self>];

    /// Название записи в родительном падеже: "Ошибка при добавлении ..."
    const ELEMENT_GENITIVE: &'static str;

    fn blank(&self) -> Self::Record;

    fn validate_field(&self, draft: &Self::Record, field: FieldOf<Self>) -> Option<String>;

    /// Быстрая проверка обязательных полей для доступности добавления
    fn has_required_fields(&self, draft: &Self::Record) -> bool;

    /// Завершающая проверка связанных полей после проверки `changed`
    fn reconcile(
        &self,
        _draft: &Self::Record,
        _changed: FieldOf<Self>,
        _errors: &mut FieldErrors<FieldOf<Self>>,
    ) {
    }
}

// ============================================================================
// Session
// ============================================================================

pub struct EditSession<R: FormRules> {
    rules: R,
    items: Vec<R::Record>,
    selected: Option<IdOf<R>>,
    draft: R::Record,
    errors: FieldErrors<FieldOf<R>>,
    message: Option<String>,
    state: SessionState,
}

impl<R: FormRules> EditSession<R> {
    pub fn new(rules: R) -> Self {
        let draft = rules.blank();
        Self {
            rules,
            items: Vec::new(),
            selected: None,
            draft,
            errors: FieldErrors::new(),
            message: None,
            state: SessionState::Idle,
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    /// Записи, видимые в списке формы
    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn selected(&self) -> Option<IdOf<R>> {
        self.selected
    }

    pub fn draft(&self) -> &R::Record {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors<FieldOf<R>> {
        &self.errors
    }

    pub fn error(&self, field: FieldOf<R>) -> Option<&str> {
        self.errors.get(field)
    }

    /// Общее сообщение формы (первая ошибка или ошибка хранилища)
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Перечитать список из хранилища
    pub fn refresh<S: Repository<R::Record>>(&mut self, store: &S) {
        self.items = store.list_all();
        if let Some(id) = self.selected {
            if !self.items.iter().any(|item| item.id() == id) {
                self.clear();
            }
        }
    }

    /// Выбрать запись из списка: черновик становится её копией
    pub fn select(&mut self, id: IdOf<R>) -> bool {
        let Some(record) = self.items.iter().find(|item| item.id() == id).cloned() else {
            return false;
        };
        self.selected = Some(id);
        self.draft = record;
        self.message = None;
        self.state = SessionState::Editing;
        // Ошибки при выборе видны у полей, общее сообщение остаётся пустым
        let _ = self.validate_all();
        true
    }

    /// Изменить одно поле черновика и перепроверить его
    pub fn apply(&mut self, change: ChangeOf<R>) -> Option<FieldOf<R>> {
        let field = self.draft.apply(change)?;
        self.state = SessionState::Editing;
        self.validate_field(field);
        Some(field)
    }

    /// Перепроверить одно поле (например, после смены списка выбора)
    pub fn validate_field(&mut self, field: FieldOf<R>) {
        let error = self.rules.validate_field(&self.draft, field);
        self.errors.set(field, error);
        self.rules.reconcile(&self.draft, field, &mut self.errors);
    }

    /// Проверить все поля; первая ошибка по порядку полей
    pub fn validate_all(&mut self) -> Result<(), String> {
        for &field in R::FIELDS {
            self.validate_field(field);
        }
        match self.errors.first_in(R::FIELDS) {
            Some(message) => Err(message.to_string()),
            None => Ok(()),
        }
    }

    pub fn can_add(&self) -> bool {
        self.selected.is_none() && self.rules.has_required_fields(&self.draft)
    }

    pub fn can_update(&self) -> bool {
        self.selected.is_some() && self.rules.has_required_fields(&self.draft)
    }

    pub fn can_delete(&self) -> bool {
        self.selected.is_some()
    }

    /// Добавить копию черновика как новую запись
    ///
    /// После успеха форма очищается. При ошибке проверки хранилище не
    /// трогается, а первая ошибка становится сообщением формы.
    pub fn commit_add<S: Repository<R::Record>>(&mut self, store: &mut S) -> Result<IdOf<R>, String> {
        if let Err(message) = self.validate_all() {
            return Err(self.fail(message));
        }
        self.message = None;

        match store.add(self.draft.clone()) {
            Ok(id) => {
                self.items = store.list_all();
                self.clear();
                Ok(id)
            }
            Err(e) => {
                tracing::error!("Ошибка при добавлении {}: {}", R::ELEMENT_GENITIVE, e);
                self.refresh(&*store);
                Err(self.fail(format!("Ошибка при добавлении {}: {}", R::ELEMENT_GENITIVE, e)))
            }
        }
    }

    /// Сохранить черновик поверх выбранной записи и оставить её выбранной
    pub fn commit_update<S: Repository<R::Record>>(&mut self, store: &mut S) -> Result<(), String> {
        let Some(id) = self.selected else {
            return Err(self.fail("Не выбрана запись для изменения".to_string()));
        };
        if let Err(message) = self.validate_all() {
            return Err(self.fail(message));
        }
        self.message = None;

        let mut record = self.draft.clone();
        record.set_id(id);
        match store.update(record) {
            Ok(true) => {
                self.items = store.list_all();
                self.select(id);
                Ok(())
            }
            Ok(false) => {
                tracing::warn!("Запись {} не найдена при обновлении {}", id, R::ELEMENT_GENITIVE);
                self.refresh(&*store);
                Err(self.fail(format!(
                    "Ошибка при обновлении {}: запись не найдена",
                    R::ELEMENT_GENITIVE
                )))
            }
            Err(e) => {
                tracing::error!("Ошибка при обновлении {}: {}", R::ELEMENT_GENITIVE, e);
                self.refresh(&*store);
                Err(self.fail(format!("Ошибка при обновлении {}: {}", R::ELEMENT_GENITIVE, e)))
            }
        }
    }

    /// Удалить выбранную запись; после удаления форма очищается
    ///
    /// Отказ из-за фильмов поставщика возвращается как
    /// `DeleteOutcome::Referenced` с сообщением формы, ошибка хранилища
    /// как `Err` с тем же текстом.
    pub fn delete<S: Repository<R::Record>>(&mut self, store: &mut S) -> Result<DeleteOutcome, String> {
        let Some(id) = self.selected else {
            return Err(self.fail("Не выбрана запись для удаления".to_string()));
        };
        match store.delete(id) {
            Ok(DeleteOutcome::Referenced { films }) => {
                self.fail(format!(
                    "Невозможно удалить {}, так как есть фильмы от него!",
                    R::ELEMENT_GENITIVE
                ));
                Ok(DeleteOutcome::Referenced { films })
            }
            Ok(outcome) => {
                self.items = store.list_all();
                self.clear();
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Ошибка при удалении {}: {}", R::ELEMENT_GENITIVE, e);
                self.refresh(&*store);
                Err(self.fail(format!("Ошибка при удалении {}: {}", R::ELEMENT_GENITIVE, e)))
            }
        }
    }

    /// Сбросить черновик, выбор и ошибки
    pub fn clear(&mut self) {
        self.draft = self.rules.blank();
        self.selected = None;
        self.errors.clear();
        self.message = None;
        self.state = SessionState::Idle;
    }

    fn fail(&mut self, message: String) -> String {
        self.message = Some(message.clone());
        message
    }
}
