pub mod client;
pub mod config;
pub mod demo;
pub mod error;

pub use client::{Backend, Client, InputOptions};
pub use error::ClientError;
