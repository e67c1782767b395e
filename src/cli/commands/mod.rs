pub mod auth;
pub mod expense;
pub mod income;
pub mod init;
pub mod profile;
pub mod savings;
pub mod summary;
