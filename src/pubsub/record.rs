use std::{any::type_name, cell::RefCell, fmt};

use herald_error::SubscribeError;

use super::envelope::{acceptance_table, Alternatives, Project, Widen};

/// Стёртый по типу вызов колбэка для конкретного набора альтернатив.
type Invoker<M> = Box<dyn FnMut(&mut M)>;

/// Запись подписки: колбэк и таблица приёма по альтернативам.
///
/// Таблица строится один раз при `subscribe` и дальше не меняется.
pub(crate) struct Record<M: Alternatives> {
    id: u64,
    view: &'static str,
    accepts: Box<[bool]>,
    invoker: RefCell<Invoker<M>>,
}

impl<M: Alternatives> Record<M> {
    fn new(
        id: u64,
        view: &'static str,
        accepts: Box<[bool]>,
        invoker: Invoker<M>,
    ) -> Result<Self, SubscribeError> {
        if !accepts.iter().any(|&a| a) {
            return Err(SubscribeError::NoAcceptedAlternative {
                view,
                alternatives: M::NAMES,
            });
        }
        Ok(Self {
            id,
            view,
            accepts,
            invoker: RefCell::new(invoker),
        })
    }

    /// Запись для колбэка, принимающего `&mut T`.
    pub(crate) fn projecting<T, F>(
        id: u64,
        mut callback: F,
    ) -> Result<Self, SubscribeError>
    where
        T: ?Sized + 'static,
        M: Project<T>,
        F: FnMut(&mut T) + 'static,
    {
        let accepts = acceptance_table::<M>(<M as Project<T>>::accepts);
        let invoker = Box::new(move |message: &mut M| {
            if let Some(payload) = <M as Project<T>>::project(message) {
                callback(payload);
            }
        });
        Self::new(id, type_name::<T>(), accepts, invoker)
    }

    /// Запись для колбэка, принимающего `T` по значению.
    pub(crate) fn widening<T, F>(
        id: u64,
        mut callback: F,
    ) -> Result<Self, SubscribeError>
    where
        T: 'static,
        M: Widen<T>,
        F: FnMut(T) + 'static,
    {
        let accepts = acceptance_table::<M>(<M as Widen<T>>::accepts);
        let invoker = Box::new(move |message: &mut M| {
            if let Some(value) = <M as Widen<T>>::widen(message) {
                callback(value);
            }
        });
        Self::new(id, type_name::<T>(), accepts, invoker)
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn view(&self) -> &'static str {
        self.view
    }

    /// Принимает ли запись альтернативу с индексом `index`.
    pub(crate) fn accepts(
        &self,
        index: usize,
    ) -> bool {
        self.accepts.get(index).copied().unwrap_or(false)
    }

    /// Имена принятых альтернатив.
    pub(crate) fn accepted(&self) -> impl Iterator<Item = &'static str> + '_ {
        M::NAMES
            .iter()
            .zip(self.accepts.iter())
            .filter_map(|(name, &a)| a.then_some(*name))
    }

    /// Вызывает колбэк. Повторный вход в тот же колбэк невозможен: вложенный
    /// `publish` отклоняется брокером раньше.
    pub(crate) fn invoke(
        &self,
        message: &mut M,
    ) {
        let mut invoker = self.invoker.borrow_mut();
        (*invoker)(message);
    }
}

impl<M: Alternatives> fmt::Debug for Record<M> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("view", &self.view)
            .field("accepts", &self.accepted().collect::<Vec<_>>())
            .finish()
    }
}
