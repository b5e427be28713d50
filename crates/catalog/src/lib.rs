mod client;
mod env;
mod error;
mod types;

pub use client::{CatalogApi, CatalogClient, CatalogClientBuilder};
pub use env::Env;
pub use error::Error;
pub use reqwest::StatusCode;
pub use types::*;
