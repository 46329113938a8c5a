use std::{fmt, rc::Rc};

use super::{envelope::Alternatives, record::Record};

/// Владеющий токен подписки, возвращаемый [`Broker::subscribe`].
///
/// Брокер хранит только слабую ссылку на запись, поэтому подписка жива,
/// пока существует хотя бы одна копия этого токена. Копии создаются через
/// `Clone`; отписка происходит автоматически при `Drop` последней копии
/// и обнаруживается брокером при следующем проходе доставки.
///
/// [`Broker::subscribe`]: super::Broker::subscribe
#[must_use = "dropping a subscription unsubscribes it"]
pub struct Subscription<M: Alternatives> {
    record: Rc<Record<M>>,
}

impl<M: Alternatives> Subscription<M> {
    pub(crate) fn new(record: Rc<Record<M>>) -> Self {
        Self { record }
    }

    /// Идентификатор записи, уникальный в пределах брокера.
    pub fn id(&self) -> u64 {
        self.record.id()
    }

    /// Явно отписаться. Аналогично `drop(self)`: остальные копии токена
    /// продолжают удерживать подписку.
    pub fn unsubscribe(self) {}
}

impl<M: Alternatives> Clone for Subscription<M> {
    fn clone(&self) -> Self {
        Self {
            record: Rc::clone(&self.record),
        }
    }
}

impl<M: Alternatives> fmt::Debug for Subscription<M> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.record.id())
            .field("view", &self.record.view())
            .field("accepts", &self.record.accepted().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    crate::alternatives! {
        enum Tick {
            Count(u32),
        }
    }

    fn subscription(id: u64) -> Subscription<Tick> {
        let record = Record::projecting(id, |_: &mut u32| {}).unwrap();
        Subscription::new(Rc::new(record))
    }

    /// Тест проверяет, что копии токена разделяют одну запись.
    #[test]
    fn test_clone_shares_record() {
        let a = subscription(9);
        let b = a.clone();
        assert_eq!(a.id(), 9);
        assert_eq!(b.id(), 9);
        assert!(Rc::ptr_eq(&a.record, &b.record));
        assert_eq!(Rc::strong_count(&a.record), 2);
    }

    /// Тест проверяет, что `unsubscribe` освобождает только свою копию.
    #[test]
    fn test_unsubscribe_releases_one_owner() {
        let a = subscription(1);
        let weak = Rc::downgrade(&a.record);
        let b = a.clone();
        a.unsubscribe();
        assert!(weak.upgrade().is_some());
        drop(b);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_debug_output() {
        let dbg = format!("{:?}", subscription(3));
        assert!(dbg.starts_with("Subscription"), "got: {dbg}");
        assert!(dbg.contains("\"Count\""), "got: {dbg}");
    }
}
