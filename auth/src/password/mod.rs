pub mod argon2;
pub mod errors;
pub mod worker;

pub use argon2::CredentialHasher;
pub use errors::PasswordError;
pub use worker::HashingWorker;
