pub mod retailer_client;

pub use retailer_client::*;
