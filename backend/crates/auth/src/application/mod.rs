//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod get_session;
pub mod hooks;
pub mod oauth_callback;
pub mod oauth_state;
pub mod session;
pub mod session_token;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod social_sign_in;

// Re-exports
pub use config::{AuthConfig, OAuthProviderConfig};
pub use get_session::{CurrentSession, GetSessionUseCase};
pub use hooks::{AuthHook, AuthPath, DefaultHooks, HookChain, HookContext, default_hooks};
pub use oauth_callback::{OAuthCallbackInput, OAuthCallbackOutput, OAuthCallbackUseCase};
pub use session::IssuedSession;
pub use sign_in::{SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpOutput, SignUpUseCase};
pub use social_sign_in::{SocialSignInInput, SocialSignInOutput, SocialSignInUseCase};
