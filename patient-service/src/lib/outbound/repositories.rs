pub mod patient;
pub mod user;

pub use patient::PostgresPatientRepository;
pub use user::PostgresUserRepository;
