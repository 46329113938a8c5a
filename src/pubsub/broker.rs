use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use herald_error::{ErrorExt, PublishError, SubscribeError};
use tracing::{debug, trace, warn};

use super::{Alternatives, Project, Record, Subscription, Widen};
use crate::config::BrokerSettings;

type Slot<M> = Weak<Record<M>>;

/// Счётчики брокера.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrokerStats {
    /// Количество успешно начатых вызовов `publish`.
    pub publish_count: u64,
    /// Количество вызовов колбэков.
    pub delivery_count: u64,
    /// Количество мёртвых записей, удалённых при уплотнении.
    pub reclaimed_count: u64,
    /// Количество раундов слияния (больше одного на `publish` при каскаде).
    pub merge_rounds: u64,
}

/// Синхронный внутрипроцессный брокер для закрытого набора альтернатив `M`.
///
/// - `subscribe` ставит запись в очередь ожидания и возвращает токен;
/// - `publish` сливает очередь в реестр и за один проход доставляет
///   сообщение всем живым подписчикам, принимающим активную альтернативу,
///   в порядке подписки;
/// - записи, у которых не осталось токенов, удаляются лениво на следующем
///   проходе без нарушения порядка остальных.
///
/// Брокер однопоточный (`!Send`, `!Sync`). Колбэки могут вызывать
/// `subscribe` на том же брокере: новая запись получает текущее сообщение
/// в рамках того же `publish`. Вложенный `publish` отклоняется.
pub struct Broker<M: Alternatives> {
    /// Слитые записи, порядок вставки = порядок доставки
    registry: RefCell<Vec<Slot<M>>>,
    /// Записи, ещё не слитые в реестр
    pending: RefCell<Vec<Slot<M>>>,
    /// Длина реестра, доступная и во время прохода
    registered: Cell<usize>,
    next_id: Cell<u64>,
    stats: Cell<BrokerStats>,
    settings: BrokerSettings,
}

impl<M: Alternatives> Broker<M> {
    /// Создаёт брокер с настройками по умолчанию.
    pub fn new() -> Self {
        Self::with_settings(BrokerSettings::default())
    }

    pub fn with_settings(settings: BrokerSettings) -> Self {
        Self {
            registry: RefCell::new(Vec::with_capacity(settings.initial_capacity)),
            pending: RefCell::new(Vec::new()),
            registered: Cell::new(0),
            next_id: Cell::new(0),
            stats: Cell::new(BrokerStats::default()),
            settings,
        }
    }

    /// Подписка колбэком от `&mut T`.
    ///
    /// `T` — тип полезной нагрузки одной из альтернатив или общий вид
    /// нескольких (например, `dyn Event`); для trait-объектов удобнее указать
    /// его явно: `broker.subscribe::<dyn Event, _>(|e| ...)`. Колбэк может
    /// изменять полезную нагрузку: следующие подписчики видят изменения.
    ///
    /// Колбэк не вызывается синхронно при подписке. Возвращает
    /// [`SubscribeError::NoAcceptedAlternative`], если `T` не подходит ни
    /// одной альтернативе.
    pub fn subscribe<T, F>(
        &self,
        callback: F,
    ) -> Result<Subscription<M>, SubscribeError>
    where
        T: ?Sized + 'static,
        M: Project<T>,
        F: FnMut(&mut T) + 'static,
    {
        let record = Record::projecting(self.allocate_id(), callback).map_err(rejected)?;
        Ok(self.enqueue(record))
    }

    /// Подписка колбэком от `T` по значению (расширение через `From`).
    pub fn subscribe_value<T, F>(
        &self,
        callback: F,
    ) -> Result<Subscription<M>, SubscribeError>
    where
        T: 'static,
        M: Widen<T>,
        F: FnMut(T) + 'static,
    {
        let record = Record::widening(self.allocate_id(), callback).map_err(rejected)?;
        Ok(self.enqueue(record))
    }

    /// Публикует сообщение и синхронно доставляет его до возврата.
    ///
    /// Проход повторяется, пока колбэки добавляют новые подписки. Паника
    /// в колбэке прерывает проход и уходит вызывающему; состояние брокера
    /// при этом остаётся согласованным.
    pub fn publish(
        &self,
        message: impl Into<M>,
    ) -> Result<(), PublishError> {
        let mut message = message.into();
        let alternative = message.index();
        let name = message.name();

        let Ok(mut registry) = self.registry.try_borrow_mut() else {
            return Err(rejected(PublishError::Reentrant { alternative: name }));
        };
        self.bump(|s| s.publish_count += 1);

        let mut cursor = 0;
        let mut rounds = 0;
        loop {
            let merged = self.merge_pending(&mut registry);
            if merged == 0 && cursor == registry.len() {
                break;
            }

            rounds += 1;
            if let Some(limit) = self.settings.max_merge_rounds {
                if rounds > limit {
                    return Err(rejected(PublishError::CascadeLimitExceeded {
                        alternative: name,
                        limit,
                    }));
                }
            }
            self.bump(|s| s.merge_rounds += 1);

            cursor = self.dispatch_round(&mut registry, cursor, &mut message, alternative);
        }

        Ok(())
    }

    /// Количество записей в реестре, включая ещё не обнаруженные мёртвые.
    pub fn len(&self) -> usize {
        self.registered.get()
    }

    /// Реестр и очередь ожидания пусты.
    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.pending_len() == 0
    }

    /// Количество записей, ожидающих слияния.
    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn stats(&self) -> BrokerStats {
        self.stats.get()
    }

    pub fn settings(&self) -> &BrokerSettings {
        &self.settings
    }

    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn enqueue(
        &self,
        record: Record<M>,
    ) -> Subscription<M> {
        let record = Rc::new(record);
        self.pending.borrow_mut().push(Rc::downgrade(&record));
        debug!(id = record.id(), view = record.view(), "subscription queued");
        Subscription::new(record)
    }

    /// Переносит очередь ожидания в хвост реестра в порядке подписки.
    fn merge_pending(
        &self,
        registry: &mut Vec<Slot<M>>,
    ) -> usize {
        let mut pending = self.pending.borrow_mut();
        let merged = pending.len();
        if merged > 0 {
            registry.append(&mut pending);
            self.registered.set(registry.len());
            debug!(merged, registered = registry.len(), "pending subscriptions merged");
        }
        merged
    }

    /// Один проход от `cursor` до конца реестра с уплотнением.
    ///
    /// Мёртвая запись сдвигается в конец ещё не просмотренного диапазона,
    /// поэтому относительный порядок живых записей сохраняется. Возвращает
    /// новую позицию курсора, равную длине реестра после усечения.
    fn dispatch_round(
        &self,
        registry: &mut Vec<Slot<M>>,
        mut cursor: usize,
        message: &mut M,
        alternative: usize,
    ) -> usize {
        let mut end = registry.len();
        while cursor < end {
            match registry[cursor].upgrade() {
                Some(record) => {
                    if record.accepts(alternative) {
                        if self.settings.trace_deliveries {
                            trace!(
                                id = record.id(),
                                alternative = message.name(),
                                "delivering message"
                            );
                        }
                        record.invoke(message);
                        self.bump(|s| s.delivery_count += 1);
                    }
                    cursor += 1;
                }
                None => {
                    registry[cursor..end].rotate_left(1);
                    end -= 1;
                }
            }
        }

        let reclaimed = registry.len() - end;
        if reclaimed > 0 {
            registry.truncate(end);
            self.registered.set(end);
            self.bump(|s| s.reclaimed_count += reclaimed as u64);
            debug!(reclaimed, registered = end, "dead subscriptions reclaimed");
        }
        cursor
    }

    fn bump(
        &self,
        update: impl FnOnce(&mut BrokerStats),
    ) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

/// Пишет отклонённую операцию в лог и возвращает ошибку дальше.
fn rejected<E: ErrorExt>(err: E) -> E {
    warn!(
        code = %err.status_code(),
        tags = ?err.metrics_tags(),
        "{err}"
    );
    err
}

impl<M: Alternatives> Default for Broker<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Alternatives> fmt::Debug for Broker<M> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Broker")
            .field("alternatives", &M::NAMES)
            .field("registered", &self.len())
            .field("pending", &self.pending_len())
            .field("stats", &self.stats())
            .finish()
    }
}
