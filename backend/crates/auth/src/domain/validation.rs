//! Sign-up / Sign-in Input Validation
//!
//! Every field is checked and every failing rule contributes a message, so
//! a form can render all problems after a single submit.

use kernel::validation::FieldErrors;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::RawPassword, username::Username,
};

/// Raw sign-up form values
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Raw sign-in form values
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct ValidSignUp {
    pub username: Username,
    pub name: DisplayName,
    pub email: Email,
    pub password: RawPassword,
}

#[derive(Debug)]
pub struct ValidSignIn {
    pub email: Email,
    pub password: RawPassword,
}

pub fn validate_sign_up(form: &SignUpForm) -> Result<ValidSignUp, FieldErrors> {
    let mut errors = FieldErrors::new();

    let username = errors.collect("username", Username::parse(&form.username));
    let name = errors.collect("name", DisplayName::parse(&form.name));
    let email = errors.collect("email", Email::parse(&form.email));
    let password = errors.collect("password", RawPassword::parse(form.password.clone()));

    match (username, name, email, password) {
        (Some(username), Some(name), Some(email), Some(password)) => Ok(ValidSignUp {
            username,
            name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

pub fn validate_sign_in(form: &SignInForm) -> Result<ValidSignIn, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = errors.collect("email", Email::parse(&form.email));
    let password = errors.collect("password", RawPassword::parse(form.password.clone()));

    match (email, password) {
        (Some(email), Some(password)) => Ok(ValidSignIn { email, password }),
        _ => Err(errors),
    }
}
