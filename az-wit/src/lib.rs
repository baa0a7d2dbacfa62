mod ado_url;
mod models;
mod wit_client;

pub(crate) use ado_url::*;

pub use models::*;
pub use wit_client::{WitClient, WitClientError};
