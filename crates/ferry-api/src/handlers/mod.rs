pub mod download;
pub mod health;
pub mod help;
pub mod token;
pub mod upload;
