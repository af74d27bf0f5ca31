//! S&S Activewear API client library for Rust.
//!
//! A typed, blocking client for the
//! [S&S Activewear API](https://api.ssactivewear.com/v2/): catalog download
//! and order submission. Payloads are checked against a closed schema in both
//! directions, and HTTP 400 answers come back as a structured
//! [`ErrorResponse`].
//!
//! # Quick Start
//!
//! ```no_run
//! use ssactivewear_client::{OrderLine, OrderRequest, ShippingAddress, SsActivewearClient};
//!
//! let client =
//!     SsActivewearClient::new("123456", "4d7a3c4e-5d0b-4f4e-9a8e-0e6f1b2c3d4e").unwrap();
//!
//! let order = OrderRequest {
//!     test_order: Some(true),
//!     ..OrderRequest::new(
//!         ShippingAddress::new("Acme", "Jane Doe", "123 Main St", "Springfield", "IL", "62701"),
//!         vec![OrderLine::new("B00760004", 12)],
//!     )
//! };
//!
//! match client.submit_order(&order) {
//!     Ok(result) => println!("{} order(s) placed", result.orders.len()),
//!     Err(e) => match e.error_response() {
//!         Some(detail) => {
//!             for field in &detail.errors {
//!                 eprintln!("{}: {}", field.field, field.message);
//!             }
//!         }
//!         None => eprintln!("{e}"),
//!     },
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod schema;

// Re-export the main public types at the crate root for convenience.
pub use client::{ClientBuilder, SsActivewearClient, DEFAULT_BASE_URL};
pub use error::SsActivewearError;
pub use models::{
    AutoselectPreference, ErrorDetail, ErrorResponse, OrderLine, OrderRequest, OrderResponse,
    OrderResponseContainer, OrderResponseLine, OrderResponseShape, OrderResponseShippingAddress,
    PaymentProfile, Product, ShippingAddress, ShippingMethod, Warehouse,
};
pub use schema::{FieldIssue, ValidationError, WireModel};
