//! Синхронный внутрипроцессный Publish–Subscribe для закрытого набора типов.
//!
//! - `envelope`: трейты набора альтернатив и проверки приёма колбэком.
//! - `macros`: макрос [`alternatives!`](crate::alternatives) для объявления
//!   набора.
//! - `record` (приватный): запись подписки с таблицей приёма.
//! - `subscription`: токен владения подпиской.
//! - `broker`: реестр, очередь ожидания и алгоритм доставки.

pub mod broker;
pub mod envelope;
mod macros;
mod record;
pub mod subscription;

pub use broker::*;
pub use envelope::{Alternatives, Project, Widen};
pub(crate) use record::Record;
pub use subscription::*;
