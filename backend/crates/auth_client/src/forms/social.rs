//! Social Sign-In Buttons
//!
//! One controller for both providers. While either is pending both buttons
//! are disabled.

use auth::domain::value_object::oauth_provider::OAuthProvider;
use tokio::sync::watch;

use super::{FormStatus, StatusCell, Submission};
use crate::client::{AuthClient, SocialBody};
use crate::ports::{Navigator, Notifier};

pub const SOCIAL_SIGN_IN_FAILED: &str = "Failed to sign in. Please try again.";

/// Which provider, if any, the status refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SocialStatus {
    pub provider: Option<OAuthProvider>,
    pub status: FormStatus,
}

pub struct SocialSignInController<C, N, V> {
    client: C,
    notifier: N,
    navigator: V,
    callback_url: Option<String>,
    status: StatusCell<SocialStatus>,
}

impl<C, N, V> SocialSignInController<C, N, V>
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
            callback_url: None,
            status: StatusCell::new(SocialStatus::default()),
        }
    }

    /// Where the provider callback should land; the server defaults to `/`
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub fn status(&self) -> SocialStatus {
        self.status.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<SocialStatus> {
        self.status.subscribe()
    }

    /// Status of one provider's button
    pub fn status_of(&self, provider: OAuthProvider) -> FormStatus {
        let current = self.status();
        if current.provider == Some(provider) {
            current.status
        } else {
            FormStatus::Idle
        }
    }

    /// True for every button while any provider is pending
    pub fn is_disabled(&self) -> bool {
        self.status().status.is_busy()
    }

    pub async fn submit(&mut self, provider: OAuthProvider) -> Submission {
        self.status.set(SocialStatus {
            provider: Some(provider),
            status: FormStatus::Submitting,
        });

        let body = SocialBody {
            provider,
            callback_url: self.callback_url.clone(),
        };

        match self.client.sign_in_social(&body).await {
            Ok(redirect) => {
                self.status.set(SocialStatus {
                    provider: Some(provider),
                    status: FormStatus::Succeeded,
                });
                self.navigator.push(&redirect.url);
                Submission::Succeeded
            }
            Err(err) => {
                tracing::debug!(provider = %provider, error = %err, "Social sign-in failed");
                self.notifier.error(SOCIAL_SIGN_IN_FAILED);
                self.status.set(SocialStatus {
                    provider: Some(provider),
                    status: FormStatus::Failed,
                });
                self.status.set(SocialStatus::default());
                Submission::Failed
            }
        }
    }
}
