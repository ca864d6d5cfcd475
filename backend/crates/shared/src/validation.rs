//! Field Validation
//!
//! Ordered predicate/message rules and a field-keyed error collection.
//! Rules are evaluated independently so a form can show every problem at once.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::app_error::AppError;

/// A single validation rule: predicate plus the message shown when it fails
#[derive(Debug)]
pub struct Rule<T: ?Sized + 'static> {
    pub check: fn(&T) -> bool,
    pub message: &'static str,
}

impl<T: ?Sized> Clone for Rule<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Rule<T> {}

impl<T: ?Sized> Rule<T> {
    pub const fn new(check: fn(&T) -> bool, message: &'static str) -> Self {
        Self { check, message }
    }

    #[inline]
    pub fn passes(&self, value: &T) -> bool {
        (self.check)(value)
    }
}

/// Messages of every rule in `rules` that `value` fails, in rule order
pub fn failures<'a, T: ?Sized>(
    value: &'a T,
    rules: &'a [Rule<T>],
) -> impl Iterator<Item = &'static str> + 'a {
    rules
        .iter()
        .filter(move |rule| !rule.passes(value))
        .map(|rule| rule.message)
}

/// `Ok(())` when `value` passes every rule, else every failure message
pub fn check_all<T: ?Sized>(value: &T, rules: &[Rule<T>]) -> Result<(), Vec<&'static str>> {
    let messages: Vec<_> = failures(value, rules).collect();
    if messages.is_empty() { Ok(()) } else { Err(messages) }
}

/// Field-keyed validation messages
///
/// Serializes as `{ "field": ["message", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<Cow<'static, str>>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<Cow<'static, str>>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Run `rules` against `value` and record every failure under `field`
    pub fn check<T: ?Sized>(&mut self, field: &'static str, value: &T, rules: &[Rule<T>]) {
        for message in failures(value, rules) {
            self.push(field, message);
        }
    }

    /// Record the messages of a failed parse under `field`, passing a success through
    pub fn collect<T>(&mut self, field: &'static str, parsed: Result<T, Vec<&'static str>>) -> Option<T> {
        match parsed {
            Ok(value) => Some(value),
            Err(messages) => {
                for message in messages {
                    self.push(field, message);
                }
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[Cow<'static, str>] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// First message for a field (what a form shows under the input)
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(|m| m.as_ref())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `Ok(value)` when no errors were recorded
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        let details = serde_json::json!({ "fields": errors });
        AppError::bad_request("Validation failed")
            .with_code("VALIDATION_ERROR")
            .with_details(details)
    }
}
