pub mod access;
pub mod patient;
pub mod user;
