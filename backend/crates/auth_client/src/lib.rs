//! DevOverflow Auth Client
//!
//! Headless sign-in, sign-up and social sign-in forms. Forms validate with
//! the same schemas the server uses, call an [`AuthClient`], and report back
//! through [`Notifier`] toasts and [`Navigator`] pushes.
//!
//! - `client` - `AuthClient` trait and the reqwest `HttpAuthClient`
//! - `forms` - form controllers and their status channel
//! - `ports` - toast and navigation interfaces
//! - `routes` - frontend paths and link lists

pub mod client;
pub mod forms;
pub mod ports;
pub mod routes;


pub use client::{AuthClient, ClientError, HttpAuthClient};
pub use forms::{
    FormStatus, PasswordToggle, SignInController, SignUpController, SocialSignInController,
    Submission,
};
pub use ports::{Navigator, Notifier};
pub use routes::{AUTH_LINKS, ROUTES, SIDEBAR_LINKS};
