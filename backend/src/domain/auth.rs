//! Sign-in and sign-up input, validated before any port is touched.
//!
//! Handlers turn request bodies into [`LoginCredentials`] or
//! [`RegistrationDraft`]; every rejection carries a field name and a stable
//! code that ends up in the error `details`.

use serde_json::json;
use zeroize::Zeroizing;

use super::{Email, Error, UserValidationError, Username};

/// Why a login body was rejected before authentication was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
        }
    }
}

impl From<LoginValidationError> for Error {
    fn from(value: LoginValidationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

/// A username and password ready for [`crate::domain::ports::LoginService`].
///
/// The username is trimmed; the password is kept byte for byte and wiped on
/// drop.
///
/// # Examples
/// ```
/// use yelpcamp::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" a ", "pw").expect("valid login");
/// assert_eq!(creds.username(), "a");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Reject blank usernames and empty passwords.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = match username.trim() {
            "" => return Err(LoginValidationError::EmptyUsername),
            trimmed => trimmed.to_owned(),
        };
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Raw registration input as received from a client.
#[derive(Debug, Clone)]
pub struct RegistrationDraft {
    pub email: String,
    pub username: String,
    pub password: Zeroizing<String>,
}

/// Registration input that passed [`validate_registration`].
#[derive(Debug, Clone)]
pub struct Registration {
    email: Email,
    username: Username,
    password: Zeroizing<String>,
}

impl Registration {
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a registration draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("{0}")]
    Email(UserValidationError),
    #[error("{0}")]
    Username(UserValidationError),
    #[error("password must not be empty")]
    EmptyPassword,
    /// Another account already uses this email.
    #[error("A user with the given email is already registered")]
    EmailTaken,
    /// Another account already uses this username.
    #[error("A user with the given username is already registered")]
    UsernameTaken,
}

impl RegistrationValidationError {
    /// Request field the failure relates to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) | Self::EmailTaken => "email",
            Self::Username(_) | Self::UsernameTaken => "username",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Email(UserValidationError::EmptyEmail)
            | Self::Username(UserValidationError::EmptyUsername)
            | Self::EmptyPassword => "required",
            Self::EmailTaken | Self::UsernameTaken => "taken",
            Self::Email(_) | Self::Username(_) => "invalid",
        }
    }
}

impl From<RegistrationValidationError> for Error {
    fn from(value: RegistrationValidationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

/// Validate a registration draft.
///
/// # Examples
/// ```
/// use yelpcamp::domain::{RegistrationDraft, validate_registration};
/// use zeroize::Zeroizing;
///
/// let draft = RegistrationDraft {
///     email: "a@x.com".into(),
///     username: "a".into(),
///     password: Zeroizing::new("pw".into()),
/// };
/// let registration = validate_registration(draft).expect("valid draft");
/// assert_eq!(registration.username().as_ref(), "a");
/// ```
pub fn validate_registration(
    draft: RegistrationDraft,
) -> Result<Registration, RegistrationValidationError> {
    let RegistrationDraft {
        email,
        username,
        password,
    } = draft;
    let email = Email::new(email).map_err(RegistrationValidationError::Email)?;
    let username = Username::new(username).map_err(RegistrationValidationError::Username)?;
    if password.is_empty() {
        return Err(RegistrationValidationError::EmptyPassword);
    }
    Ok(Registration {
        email,
        username,
        password,
    })
}
