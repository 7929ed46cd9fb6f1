//! Auth session: login/register forms and the current user

use crate::client::{ApiClient, ClientError, LoginPayload, RegisterPayload};
use crate::model::PublicUser;

/// Login form state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form state
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Client-side check run before anything is sent to the server
    pub fn validate(&self) -> Result<(), String> {
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }
        Ok(())
    }
}

/// Current-user session shared by every page
///
/// Owns the API client's token: logging in stores the token on the shared
/// client, logging out clears it.
pub struct Session {
    client: ApiClient,
    user: Option<PublicUser>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self { client, user: None }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn current_user(&self) -> Option<&PublicUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Log in and remember the token on the shared client
    pub async fn login(&mut self, form: &LoginForm) -> Result<(), ClientError> {
        let response = self
            .client
            .login(&LoginPayload {
                email: form.email.clone(),
                password: form.password.clone(),
            })
            .await?;

        self.client.set_token(Some(response.token));
        self.user = Some(response.user);
        Ok(())
    }

    /// Register a new account and start its session
    ///
    /// The confirm-password field never leaves the form; call
    /// [`RegisterForm::validate`] first.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<(), ClientError> {
        let response = self
            .client
            .register(&RegisterPayload {
                name: form.name.clone(),
                email: form.email.clone(),
                password: form.password.clone(),
            })
            .await?;

        self.client.set_token(Some(response.token));
        self.user = Some(response.user);
        Ok(())
    }

    /// Adopt a saved token and fetch the user it belongs to
    pub async fn restore(&mut self, token: String) -> Result<(), ClientError> {
        self.client.set_token(Some(token));
        match self.client.me().await {
            Ok(me) => {
                self.user = Some(me.user);
                Ok(())
            }
            Err(e) => {
                self.client.set_token(None);
                self.user = None;
                Err(e)
            }
        }
    }

    /// Forget the token and current user
    pub fn logout(&mut self) {
        self.client.set_token(None);
        self.user = None;
    }
}
