//! Sign-In Form

use auth::domain::validation::{SignInForm, validate_sign_in};
use kernel::validation::FieldErrors;
use tokio::sync::watch;

use super::{FormStatus, PasswordToggle, StatusCell, Submission};
use crate::client::{AuthClient, ClientError, SignInBody};
use crate::ports::{Navigator, Notifier};
use crate::routes::ROUTES;

pub const SIGN_IN_SUCCESS: &str = "Signed in successfully.";
pub const SIGN_IN_FAILED: &str = "Something went wrong. Please try again.";

pub struct SignInController<C, N, V> {
    client: C,
    notifier: N,
    navigator: V,
    values: SignInForm,
    errors: FieldErrors,
    status: StatusCell<FormStatus>,
    pub password_toggle: PasswordToggle,
}

impl<C, N, V> SignInController<C, N, V>
where
    C: AuthClient,
    N: Notifier,
    V: Navigator,
{
    pub fn new(client: C, notifier: N, navigator: V) -> Self {
        Self {
            client,
            notifier,
            navigator,
            values: SignInForm::default(),
            errors: FieldErrors::new(),
            status: StatusCell::new(FormStatus::Idle),
            password_toggle: PasswordToggle::default(),
        }
    }

    pub fn values(&self) -> &SignInForm {
        &self.values
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.values.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.values.password = password.into();
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> FormStatus {
        self.status.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    pub fn is_disabled(&self) -> bool {
        self.status().is_busy()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_disabled() { "Signing In..." } else { "Sign In" }
    }

    pub async fn submit(&mut self) -> Submission {
        let valid = match validate_sign_in(&self.values) {
            Ok(valid) => valid,
            Err(errors) => {
                self.errors = errors;
                return Submission::Invalid;
            }
        };
        self.errors.clear();

        let body = SignInBody {
            email: valid.email.as_str().to_string(),
            password: self.values.password.clone(),
        };
        drop(valid);

        self.status.set(FormStatus::Submitting);

        match self.client.sign_in_email(&body).await {
            Ok(_) => {
                self.notifier.success(SIGN_IN_SUCCESS);
                self.values = SignInForm::default();
                self.status.set(FormStatus::Succeeded);
                self.navigator.push(ROUTES.home);
                Submission::Succeeded
            }
            Err(err) => {
                tracing::debug!(error = %err, "Sign-in failed");
                self.notifier.error(&failure_message(&err));
                self.status.set(FormStatus::Failed);
                self.status.set(FormStatus::Idle);
                Submission::Failed
            }
        }
    }
}

/// Server message when present, generic copy otherwise
fn failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Api(api) => api.message().unwrap_or(SIGN_IN_FAILED).to_string(),
        ClientError::Transport(_) => SIGN_IN_FAILED.to_string(),
    }
}
