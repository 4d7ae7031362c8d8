//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the patient service:
//! - Password hashing (Argon2id, salted, cost-configurable)
//! - Stateless JWT access tokens binding a subject to a role
//! - An `Authenticator` holding the signing secret and token lifetime
//!
//! Roles are chosen by the consuming service; this crate only requires them to
//! be serializable, so a closed enum there rejects unknown roles at decode time.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtError, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.issue(42, "doctor").unwrap();
//!
//! let claims: Claims<String> = handler.decode(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! assert_eq!(claims.role, "doctor");
//!
//! let other = JwtHandler::new(b"another_secret_key_at_least_32_bytes");
//! assert_eq!(other.decode::<String>(&token), Err(JwtError::BadSignature));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify, then issue a token
//! assert!(auth.verify_password("password123", &hash).unwrap());
//! let issued = auth.issue_token(7, "receptionist").unwrap();
//!
//! // Request: validate the token
//! let claims: Claims<String> = auth.validate_token(&issued.access_token).unwrap();
//! assert_eq!(claims.role, "receptionist");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
