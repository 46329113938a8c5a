//! Herald: синхронный внутрипроцессный брокер сообщений для закрытого набора
//! типов.
//!
//! ```
//! use herald::{alternatives, Broker};
//!
//! alternatives! {
//!     #[derive(Debug)]
//!     pub enum Number {
//!         Int(i32),
//!     }
//! }
//!
//! let broker = Broker::<Number>::new();
//! let _triple = broker.subscribe(|x: &mut i32| *x *= 3).unwrap();
//! let _print = broker.subscribe(|x: &mut i32| assert_eq!(*x, 6)).unwrap();
//! broker.publish(2).unwrap();
//! ```

/// Broker settings loaded from defaults, files and `HERALD_*` variables.
pub mod config;
/// Logging setup on top of `tracing-subscriber`.
pub mod logging;
/// Pub/Sub: alternatives, subscriptions and the broker.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings.
pub use config::BrokerSettings;
/// Errors and status codes.
pub use herald_error::{ErrorExt, PublishError, StatusCode, SubscribeError};
/// Logging.
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
/// Pub/Sub API.
pub use pubsub::{Alternatives, Broker, BrokerStats, Project, Subscription, Widen};
