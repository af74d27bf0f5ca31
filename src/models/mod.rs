//! Typed payloads of the S&S API.
//!
//! Every model rejects unknown keys and uses the vendor's wire names at the
//! JSON boundary. Decode through [`WireModel`](crate::WireModel) to get
//! field-by-field diagnostics.

mod error_response;
mod orders;
mod products;

pub use error_response::{ErrorDetail, ErrorResponse};
pub use orders::{
    AutoselectPreference, OrderLine, OrderRequest, OrderResponse, OrderResponseContainer,
    OrderResponseLine, OrderResponseShape, OrderResponseShippingAddress, PaymentProfile,
    ShippingAddress, ShippingMethod,
};
pub use products::{Product, Warehouse};
