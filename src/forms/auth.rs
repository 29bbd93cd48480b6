use serde::Deserialize;
use validator::Validate;

use crate::domain::auth::Credentials;
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Form data submitted from the login screen.
pub struct LoginForm {
    /// Account name, not an email address.
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    /// Validates the form and converts it into request credentials.
    pub fn to_credentials(&self) -> Result<Credentials, FormError> {
        self.validate()?;
        Ok(Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Form data for requesting a password reset link.
pub struct ForgotPasswordForm {
    #[validate(email)]
    pub email: String,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Form data for setting a new password with a reset token.
pub struct ResetPasswordForm {
    /// Token taken from the reset link.
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// Runs the field validators and checks that both passwords match.
    pub fn check(&self) -> Result<(), FormError> {
        self.validate()?;
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            username: "kader01".into(),
            password: String::new(),
        };
        assert!(matches!(form.to_credentials(), Err(FormError::Validation(_))));

        let form = LoginForm {
            username: " kader01 ".into(),
            password: "rahasia".into(),
        };
        let credentials = form.to_credentials().unwrap();
        assert_eq!(credentials.username, "kader01");
    }

    #[test]
    fn forgot_password_requires_an_email() {
        let form = ForgotPasswordForm {
            email: "bukan-email".into(),
        };
        assert!(form.validate().is_err());

        let form = ForgotPasswordForm {
            email: "kader@example.com".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn reset_password_checks_length_and_confirmation() {
        let short = ResetPasswordForm {
            token: "abc".into(),
            password: "pendek".into(),
            confirm_password: "pendek".into(),
        };
        assert!(matches!(short.check(), Err(FormError::Validation(_))));

        let mismatch = ResetPasswordForm {
            token: "abc".into(),
            password: "katasandi-baru".into(),
            confirm_password: "katasandi-lain".into(),
        };
        assert!(matches!(mismatch.check(), Err(FormError::PasswordMismatch)));

        let ok = ResetPasswordForm {
            token: "abc".into(),
            password: "katasandi-baru".into(),
            confirm_password: "katasandi-baru".into(),
        };
        assert!(ok.check().is_ok());
    }
}
