pub mod retailer_client;
pub mod session_repository;
