use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки регистрации подписки.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// Колбэк не принимает ни одну альтернативу набора.
    #[error("callback taking `{view}` accepts none of the alternatives {alternatives:?}")]
    NoAcceptedAlternative {
        view: &'static str,
        alternatives: &'static [&'static str],
    },
}

/// Ошибки публикации сообщения.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// `publish` вызван из колбэка во время доставки.
    #[error("publish of `{alternative}` called from inside a dispatch pass")]
    Reentrant { alternative: &'static str },

    /// Каскад вложенных подписок превысил настроенный лимит раундов.
    #[error("dispatch of `{alternative}` exceeded {limit} merge rounds")]
    CascadeLimitExceeded {
        alternative: &'static str,
        limit: usize,
    },
}

impl ErrorExt for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoAcceptedAlternative { .. } => StatusCode::NoAcceptedAlternative,
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "broker_subscribe".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        match self {
            Self::NoAcceptedAlternative { view, .. } => tags.push(("view", view.to_string())),
        }
        tags
    }
}

impl ErrorExt for PublishError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Reentrant { .. } => StatusCode::ReentrantPublish,
            Self::CascadeLimitExceeded { .. } => StatusCode::CascadeLimitExceeded,
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "broker_publish".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        match self {
            Self::Reentrant { alternative } => tags.push(("alternative", alternative.to_string())),
            Self::CascadeLimitExceeded { alternative, limit } => {
                tags.push(("alternative", alternative.to_string()));
                tags.push(("limit", limit.to_string()));
            }
        }
        tags
    }
}
