use std::path::Path;

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Префикс переменных окружения по умолчанию.
pub const ENV_PREFIX: &str = "HERALD";

/// Настройки брокера.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    /// Начальная ёмкость реестра подписок.
    pub initial_capacity: usize,
    /// Максимум раундов слияния за один `publish`; `None` — без ограничения.
    pub max_merge_rounds: Option<usize>,
    /// Писать `trace`-событие на каждую доставку.
    pub trace_deliveries: bool,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            max_merge_rounds: None,
            trace_deliveries: false,
        }
    }
}

impl BrokerSettings {
    /// Загружает настройки: значения по умолчанию, затем переменные
    /// окружения `HERALD_*` (например, `HERALD_MAX_MERGE_ROUNDS=64`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    pub fn load_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        Self::build(Self::defaults()?.add_source(Self::environment(prefix)))
    }

    /// Загружает настройки из файла (формат по расширению), переменные
    /// окружения имеют приоритет над файлом.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::from(path.as_ref()))
            .add_source(Self::environment(ENV_PREFIX));
        Self::build(builder)
    }

    /// Проверяет согласованность значений.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_merge_rounds == Some(0) {
            return Err(ConfigError::Message(
                "max_merge_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("initial_capacity", defaults.initial_capacity as u64)?
            .set_default("trace_deliveries", defaults.trace_deliveries)
    }

    fn environment(prefix: &str) -> Environment {
        Environment::with_prefix(prefix).try_parsing(true)
    }

    fn build(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}
