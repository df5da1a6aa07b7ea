/// Редактируемая копия агрегата (черновик формы)
///
/// Каждое изменение идёт через [`Draft::apply`], который сообщает, какое
/// поле действительно поменялось. Форма перепроверяет только это поле.
pub trait Draft {
    /// Поля, которые проверяет форма
    type Field: Copy + Eq + std::fmt::Debug + 'static;

    /// Одно изменение черновика
    type Change;

    /// Применить изменение; `None`, если значение не изменилось
    fn apply(&mut self, change: Self::Change) -> Option<Self::Field>;
}

/// Присвоить значение, если оно отличается, и вернуть признак изменения
pub(crate) fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
