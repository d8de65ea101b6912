// wares-api: Async Rust client for DummyJSON-style product catalog APIs.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ProductClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{CATEGORY_ALL, ListQuery, NewProduct, Product, ProductPage, ProductUpdate};
