use serde::Deserialize;
use validator::Validate;

use crate::forms::FormError;

#[derive(Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Validated sign-in input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn into_credentials(self) -> Result<Credentials, FormError> {
        let form = Self {
            email: self.email.trim().to_lowercase(),
            password: self.password,
        };
        form.validate()?;
        Ok(Credentials {
            email: form.email,
            password: form.password,
        })
    }
}
