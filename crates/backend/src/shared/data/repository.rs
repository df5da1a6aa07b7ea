use contracts::domain::common::AggregateRoot;

use super::StoreError;

/// Результат удаления записи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Поставщика не удалили: на него ссылаются фильмы
    Referenced { films: usize },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Операции хранилища над агрегатами одного типа
///
/// Каждая успешная изменяющая операция перезаписывает файл данных целиком
/// до возврата из вызова.
pub trait Repository<A: AggregateRoot> {
    /// Все записи в порядке добавления (копии)
    fn list_all(&self) -> Vec<A>;

    fn get_by_id(&self, id: A::Id) -> Option<A>;

    /// Добавить запись с новым идентификатором и вернуть его
    fn add(&mut self, aggregate: A) -> Result<A::Id, StoreError>;

    /// Заменить запись с тем же ID; `Ok(false)`, если записи нет (файл не трогается)
    fn update(&mut self, aggregate: A) -> Result<bool, StoreError>;

    fn delete(&mut self, id: A::Id) -> Result<DeleteOutcome, StoreError>;
}
