/// Закрытый набор альтернатив, которые принимает брокер.
///
/// Реализуется перечислением, в котором каждый вариант несёт полезную
/// нагрузку одного типа. Обычно реализация генерируется макросом
/// [`alternatives!`](crate::alternatives).
pub trait Alternatives: Sized + 'static {
    /// Имена альтернатив в порядке объявления.
    const NAMES: &'static [&'static str];

    /// Позиция активной альтернативы в [`Self::NAMES`].
    fn index(&self) -> usize;

    /// Имя активной альтернативы.
    fn name(&self) -> &'static str {
        Self::NAMES.get(self.index()).copied().unwrap_or("<unknown>")
    }
}

/// Доступ к активной альтернативе по изменяемой ссылке как к `T`.
///
/// `T` может быть типом самой полезной нагрузки или trait-объектом, общим
/// для нескольких альтернатив (например, `dyn Event`).
pub trait Project<T: ?Sized>: Alternatives {
    /// Принимает ли колбэк от `&mut T` альтернативу с индексом `index`.
    fn accepts(index: usize) -> bool;

    /// Полезная нагрузка как `&mut T`, если активная альтернатива подходит.
    fn project(&mut self) -> Option<&mut T>;
}

/// Преобразование активной альтернативы в `T` по значению через `From`.
pub trait Widen<T>: Alternatives {
    /// Принимает ли колбэк от `T` альтернативу с индексом `index`.
    fn accepts(index: usize) -> bool;

    /// Копия полезной нагрузки, расширенная до `T`.
    fn widen(&self) -> Option<T>;
}

/// Тождественный псевдоним для сигнатур, генерируемых макросом: внутри него
/// `dyn Trait` получает время жизни `'static`, как в `Project<dyn Trait>`.
#[doc(hidden)]
pub type Target<T> = T;

/// Таблица приёма: по одному флагу на каждую альтернативу набора.
pub(crate) fn acceptance_table<M: Alternatives>(accepts: impl Fn(usize) -> bool) -> Box<[bool]> {
    (0..M::NAMES.len()).map(accepts).collect()
}
