use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "extras")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "extras")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок брокера.
///
/// # Диапазоны:
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки регистрации подписок
/// - 3xxx: Ошибки доставки сообщений
/// - 4xxx: Ограничения
/// - 5xxx: Конфигурация и окружение
///
/// `num_enum::TryFromPrimitive` даёт реализацию `TryFrom<u32>` для кодов,
/// прочитанных из логов или метрик; с фичей `extras` добавляются
/// `AsRefStr`/`EnumIter` и числовая сериализация.
#[cfg_attr(
    feature = "extras",
    derive(AsRefStr, EnumIter, Serialize_repr, Deserialize_repr)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 1xxx: Общие ошибки ===
    Internal = 1000,

    // === 2xxx: Регистрация ===
    NoAcceptedAlternative = 2000,

    // === 3xxx: Доставка ===
    ReentrantPublish = 3000,

    // === 4xxx: Ограничения ===
    CascadeLimitExceeded = 4000,

    // === 5xxx: Конфигурация ===
    InvalidConfig = 5000,
    LoggingInitFailed = 5001,
}

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "extras")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "extras"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
