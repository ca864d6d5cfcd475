//! UI Ports
//!
//! What a form needs from its host: toasts and navigation.

use std::sync::Arc;

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub trait Navigator: Send + Sync {
    fn push(&self, route: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn success(&self, message: &str) {
        (**self).success(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn push(&self, route: &str) {
        (**self).push(route)
    }
}
