//! Transient user notifications and the navigation a view requests after an action.

use std::time::Duration;

use uuid::Uuid;

use crate::domain::access::Route;

const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub text: String,
    pub ttl: Duration,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self::with_ttl(NoticeKind::Success, text, DEFAULT_NOTICE_TTL)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_ttl(NoticeKind::Error, text, DEFAULT_NOTICE_TTL)
    }

    pub fn with_ttl(kind: NoticeKind, text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            ttl,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error)
    }
}

/// What a finished action wants the front end to show.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub notice: Notice,
    pub navigate: Option<Route>,
}

impl Feedback {
    pub fn notice(notice: Notice) -> Self {
        Self {
            notice,
            navigate: None,
        }
    }

    pub fn then(mut self, route: Route) -> Self {
        self.navigate = Some(route);
        self
    }
}
