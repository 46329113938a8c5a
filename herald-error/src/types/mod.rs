pub mod broker;

// Публичный экспорт всех типов ошибок из вложенных модулей.
pub use broker::*;
