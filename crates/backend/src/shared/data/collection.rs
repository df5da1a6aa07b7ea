use contracts::domain::common::{AggregateId, AggregateRoot};

/// Коллекция агрегатов одного типа с доступом по идентификатору
///
/// Порядок добавления сохраняется: в нём записи попадают в файл и в списки.
/// Идентификаторы уникальны.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<A> {
    items: Vec<A>,
}

impl<A: AggregateRoot> Collection<A> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Собрать коллекцию из загруженных записей; повтор ID отбрасывается
    pub fn from_vec(items: Vec<A>) -> Self {
        let mut collection = Self::new();
        for item in items {
            let id = item.id();
            if collection.contains(id) {
                tracing::warn!(
                    "{}: повторный идентификатор {} пропущен",
                    A::full_name(),
                    id
                );
                continue;
            }
            collection.items.push(item);
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[A] {
        &self.items
    }

    fn position(&self, id: A::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: A::Id) -> Option<&A> {
        self.position(id).map(|index| &self.items[index])
    }

    pub fn contains(&self, id: A::Id) -> bool {
        self.position(id).is_some()
    }

    /// Добавить запись в конец с новым идентификатором
    pub fn insert(&mut self, mut item: A) -> A::Id {
        let id = <A::Id as AggregateId>::next_after(self.items.iter().map(AggregateRoot::id));
        item.set_id(id);
        self.items.push(item);
        id
    }

    /// Заменить запись с тем же ID на месте; `false`, если такой нет
    pub fn replace(&mut self, item: A) -> bool {
        match self.position(item.id()) {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: A::Id) -> Option<A> {
        self.position(id).map(|index| self.items.remove(index))
    }
}

impl<A: AggregateRoot + Clone> Collection<A> {
    pub fn to_vec(&self) -> Vec<A> {
        self.items.clone()
    }
}

impl<A: AggregateRoot> Default for Collection<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_supplier::Supplier;

    fn named(name: &str) -> Supplier<i64> {
        let mut supplier = Supplier::new();
        supplier.name = name.into();
        supplier
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut suppliers = Collection::new();
        assert_eq!(suppliers.insert(named("A")), 1);
        assert_eq!(suppliers.insert(named("B")), 2);
        suppliers.remove(1);
        assert_eq!(suppliers.insert(named("C")), 3);
        let names: Vec<_> = suppliers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B", "C"]);
    }

    #[test]
    fn test_replace_keeps_position_and_ignores_unknown_id() {
        let mut suppliers = Collection::new();
        let a = suppliers.insert(named("A"));
        suppliers.insert(named("B"));

        let mut renamed = suppliers.get(a).cloned().unwrap();
        renamed.name = "A2".into();
        assert!(suppliers.replace(renamed));
        assert_eq!(suppliers.as_slice()[0].name, "A2");

        let mut stranger = named("X");
        stranger.id = 99;
        assert!(!suppliers.replace(stranger));
        assert_eq!(suppliers.len(), 2);
    }

    #[test]
    fn test_from_vec_drops_duplicate_ids() {
        let mut a = named("A");
        a.id = 5;
        let mut b = named("B");
        b.id = 5;
        let suppliers = Collection::from_vec(vec![a, b]);
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers.get(5).map(|s| s.name.as_str()), Some("A"));
    }
}
