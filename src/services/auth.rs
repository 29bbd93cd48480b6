use validator::Validate;

use crate::domain::auth::SessionUser;
use crate::forms::auth::{ForgotPasswordForm, LoginForm, ResetPasswordForm};
use crate::repository::AuthGateway;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

/// Signs in and stores the session cookie in the repository client.
pub async fn login<R>(repo: &R, form: &LoginForm) -> ServiceResult<SessionUser>
where
    R: AuthGateway + ?Sized,
{
    let credentials = form.to_credentials()?;

    let user = repo.login(&credentials).await.map_err(|err| {
        log::error!("Failed to log in as {}: {err}", credentials.username);
        ServiceError::from(err)
    })?;

    log::info!("Logged in as {}", user.username);
    Ok(user)
}

pub async fn logout<R>(repo: &R) -> ServiceResult<()>
where
    R: AuthGateway + ?Sized,
{
    repo.logout().await.map_err(|err| {
        log::error!("Failed to log out: {err}");
        ServiceError::from(err)
    })
}

/// Route guard: resolves the session user or fails with
/// [`ServiceError::Unauthorized`].
pub async fn require_session<R>(repo: &R) -> ServiceResult<SessionUser>
where
    R: AuthGateway + ?Sized,
{
    match repo.check_auth().await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ServiceError::Unauthorized(None)),
        Err(err) => {
            log::error!("Failed to check session: {err}");
            Err(err.into())
        }
    }
}

pub async fn forgot_password<R>(repo: &R, form: &ForgotPasswordForm) -> ServiceResult<String>
where
    R: AuthGateway + ?Sized,
{
    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Email tidak valid".to_string()));
    }

    repo.forgot_password(form.email.trim()).await.map_err(|err| {
        log::error!("Failed to request a password reset: {err}");
        match err {
            RepositoryError::NotFound(message) => ServiceError::Form(
                message.unwrap_or_else(|| "Email tidak ditemukan".to_string()),
            ),
            other => ServiceError::from(other),
        }
    })
}

pub async fn reset_password<R>(repo: &R, form: &ResetPasswordForm) -> ServiceResult<String>
where
    R: AuthGateway + ?Sized,
{
    form.check().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    repo.reset_password(form.token.trim(), &form.password)
        .await
        .map_err(|err| {
            log::error!("Failed to reset password: {err}");
            ServiceError::from(err)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    fn kader() -> SessionUser {
        SessionUser {
            id: 1,
            username: "kader01".into(),
            email: "kader@example.com".into(),
            role: Some("kader".into()),
        }
    }

    #[tokio::test]
    async fn require_session_rejects_anonymous_sessions() {
        let mut repo = MockRepository::new();
        repo.expect_check_auth().times(1).returning(|| Ok(None));

        let result = require_session(&repo).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized(None))));
    }

    #[tokio::test]
    async fn require_session_returns_the_user() {
        let mut repo = MockRepository::new();
        repo.expect_check_auth().returning(|| Ok(Some(kader())));

        let user = require_session(&repo).await.unwrap();

        assert_eq!(user.username, "kader01");
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .withf(|credentials| credentials.username == "kader01")
            .returning(|_| Err(RepositoryError::Unauthorized(Some("Invalid credentials".into()))));

        let form = LoginForm {
            username: "kader01".into(),
            password: "salah".into(),
        };
        let err = login(&repo, &form).await.unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert_eq!(err.user_message("Login gagal"), "Invalid credentials");
    }

    #[tokio::test]
    async fn unknown_email_is_reported_as_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_forgot_password()
            .returning(|_| Err(RepositoryError::NotFound(None)));

        let form = ForgotPasswordForm {
            email: "tidak.ada@example.com".into(),
        };
        let err = forgot_password(&repo, &form).await.unwrap_err();

        assert_eq!(err.to_string(), "Email tidak ditemukan");
    }

    #[tokio::test]
    async fn unknown_email_prefers_the_server_message() {
        let mut repo = MockRepository::new();
        repo.expect_forgot_password()
            .returning(|_| Err(RepositoryError::NotFound(Some("Email not found".into()))));

        let form = ForgotPasswordForm {
            email: "tidak.ada@example.com".into(),
        };
        let err = forgot_password(&repo, &form).await.unwrap_err();

        assert_eq!(err.user_message("Gagal"), "Email not found");
    }

    #[tokio::test]
    async fn mismatched_passwords_never_reach_the_backend() {
        let mut repo = MockRepository::new();
        repo.expect_reset_password().times(0);

        let form = ResetPasswordForm {
            token: "token".into(),
            password: "katasandi-baru".into(),
            confirm_password: "katasandi-lain".into(),
        };

        assert!(matches!(
            reset_password(&repo, &form).await,
            Err(ServiceError::Form(_))
        ));
    }
}
