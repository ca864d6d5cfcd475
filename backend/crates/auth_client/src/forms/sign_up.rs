//! Sign-Up Form

use auth::domain::validation::{SignUpForm, validate_sign_up};
use auth::domain::value_object::password_rules::{self, PasswordStrength};
use auth::error::{USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL, USERNAME_ALREADY_EXISTS};
use kernel::validation::FieldErrors;
use tokio::sync::watch;

use super::{FormStatus, PasswordToggle, StatusCell, Submission};
use crate::client::{AuthClient, ClientError, SignUpBody};
use crate::ports::{Navigator, Notifier};
use crate::routes::ROUTES;

pub const SIGN_UP_SUCCESS: &str = "Your account has been created successfully.";
pub const EMAIL_TAKEN: &str = "Account already exists, sign in instead.";
pub const USERNAME_TAKEN: &str = "Username already taken.";
pub const SIGN_UP_FAILED: &str =
    "We’re having trouble creating your account. Please try again in a moment.";
pub const SIGN_UP_UNEXPECTED: &str = "Unexpected error occurred. Please try again.";

/// Strength meter state for the current password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthMeter {
    pub strength: PasswordStrength,
    /// One color class per rule; the first `score` take the tier color
    pub segments: Vec<&'static str>,
}

impl StrengthMeter {
    fn new(strength: PasswordStrength) -> Self {
        let segments = (0..strength.total)
            .map(|i| {
                if i < strength.score {
                    strength.color
                } else {
                    password_rules::strength_color(0)
                }
            })
            .collect();
        Self { strength, segments }
    }
}

pub struct SignUpController<C, N, V> {
    client: C,
    notifier: N,
    navigator: V,
    values: SignUpForm,
    errors: FieldErrors,
    status: StatusCell<FormStatus>,
    pub password_toggle: PasswordToggle,
}

impl<C, N, V> SignUpController<C, N, V>
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
            values: SignUpForm::default(),
            errors: FieldErrors::new(),
            status: StatusCell::new(FormStatus::Idle),
            password_toggle: PasswordToggle::default(),
        }
    }

    pub fn values(&self) -> &SignUpForm {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut SignUpForm {
        &mut self.values
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
        if self.is_disabled() { "Creating account..." } else { "Create account" }
    }

    /// Shown only once something has been typed
    pub fn strength_meter(&self) -> Option<StrengthMeter> {
        if self.values.password.is_empty() {
            return None;
        }
        Some(StrengthMeter::new(password_rules::evaluate(&self.values.password)))
    }

    pub async fn submit(&mut self) -> Submission {
        let valid = match validate_sign_up(&self.values) {
            Ok(valid) => valid,
            Err(errors) => {
                self.errors = errors;
                return Submission::Invalid;
            }
        };
        self.errors.clear();

        let body = SignUpBody {
            name: valid.name.as_str().to_string(),
            username: valid.username.original().to_string(),
            email: valid.email.as_str().to_string(),
            password: self.values.password.clone(),
        };
        drop(valid);

        self.status.set(FormStatus::Submitting);

        match self.client.sign_up_email(&body).await {
            Ok(success) => {
                tracing::debug!(username = %success.user.username, "Account created");
                self.notifier.success(SIGN_UP_SUCCESS);
                self.values = SignUpForm::default();
                self.status.set(FormStatus::Succeeded);
                self.navigator.push(ROUTES.home);
                Submission::Succeeded
            }
            Err(err) => {
                tracing::debug!(error = %err, "Sign-up failed");
                self.notifier.error(failure_message(&err));
                self.status.set(FormStatus::Failed);
                self.status.set(FormStatus::Idle);
                Submission::Failed
            }
        }
    }
}

fn failure_message(err: &ClientError) -> &'static str {
    match err {
        ClientError::Api(api) if api.has_code(USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL) => {
            EMAIL_TAKEN
        }
        ClientError::Api(api) if api.has_code(USERNAME_ALREADY_EXISTS) => USERNAME_TAKEN,
        ClientError::Api(_) => SIGN_UP_FAILED,
        ClientError::Transport(_) => SIGN_UP_UNEXPECTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;

    fn api(code: &str) -> ClientError {
        ClientError::Api(ApiError {
            code: Some(code.to_string()),
            message: Some("ignored".to_string()),
            status: 409,
        })
    }

    #[test]
    fn test_conflict_codes_have_their_own_copy() {
        assert_eq!(failure_message(&api("USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL")), EMAIL_TAKEN);
        assert_eq!(failure_message(&api("USERNAME_ALREADY_EXISTS")), USERNAME_TAKEN);
        assert_eq!(failure_message(&api("VALIDATION_ERROR")), SIGN_UP_FAILED);
        assert_eq!(
            failure_message(&ClientError::Transport("timeout".into())),
            SIGN_UP_UNEXPECTED
        );
    }

    #[test]
    fn test_meter_segments() {
        let meter = StrengthMeter::new(password_rules::evaluate("abc1"));
        assert_eq!(meter.strength.score, 2);
        assert_eq!(
            meter.segments,
            vec!["bg-orange-500", "bg-orange-500", "bg-border", "bg-border", "bg-border"]
        );
    }
}
