use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::user::errors::EmailError;
use crate::user::errors::FieldTooLongError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a staff account. The role is fixed at registration and the
/// password hash never leaves the service; outward views go through
/// [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Apply a profile update.
    ///
    /// Presence-based: a provided field overwrites, even when empty.
    pub fn apply_profile(&mut self, update: UpdateProfileCommand, now: DateTime<Utc>) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        self.updated_at = now;
    }
}

/// User unique identifier type, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            Ok(id) => Err(UserIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(UserIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Staff role.
///
/// Two flat, mutually exclusive roles. There is no hierarchy: a doctor is not
/// a superset of a receptionist or the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Receptionist,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Receptionist => "receptionist",
            Role::Doctor => "doctor",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receptionist" => Ok(Role::Receptionist),
            "doctor" => Ok(Role::Doctor),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width of the name columns, in characters.
pub const NAME_MAX_LENGTH: usize = 100;
/// Width of the phone columns, in characters.
pub const PHONE_MAX_LENGTH: usize = 32;

/// Reject a free-text value wider than its column.
pub fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), FieldTooLongError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(FieldTooLongError { field, max, actual });
    }
    Ok(())
}

/// Username value type
///
/// Ensures username is 3-64 characters without whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 64 characters
    /// * `ContainsWhitespace` - Username contains whitespace
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if username.chars().any(char::is_whitespace) {
            return Err(UsernameError::ContainsWhitespace);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 254;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `TooLong` - Email longer than 254 characters
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password that satisfies the registration policy.
///
/// Only lives for the duration of a registration request; `Debug` never
/// prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Password shorter than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// User record ready to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Redacted view of a user, safe to hand to other aggregates and to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl RegisterUserCommand {
    pub fn check_lengths(&self) -> Result<(), FieldTooLongError> {
        check_length("first_name", &self.first_name, NAME_MAX_LENGTH)?;
        check_length("last_name", &self.last_name, NAME_MAX_LENGTH)?;
        check_length("phone", &self.phone, PHONE_MAX_LENGTH)
    }
}

/// Command to update the caller's own profile.
///
/// Only display fields are reachable; role, password and active flag are not.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<EmailAddress>,
}

impl UpdateProfileCommand {
    pub fn check_lengths(&self) -> Result<(), FieldTooLongError> {
        let bounded = [
            ("first_name", &self.first_name, NAME_MAX_LENGTH),
            ("last_name", &self.last_name, NAME_MAX_LENGTH),
            ("phone", &self.phone, PHONE_MAX_LENGTH),
        ];
        for (field, value, max) in bounded {
            if let Some(value) = value {
                check_length(field, value, max)?;
            }
        }
        Ok(())
    }
}
