#![allow(dead_code)]
pub mod stub_upstream;
pub mod test_app;

pub use stub_upstream::*;
pub use test_app::*;
