//! Razorpay payments.
//!
//! - `order`: request validation and rupee to paise conversion
//! - `razorpay`: `PaymentGateway` trait and the Orders API client
//! - `signature`: HMAC-SHA256 payment signature verification
//! - `handlers`: `POST /order` and `POST /verify`

pub mod error;
pub mod handlers;
pub mod order;
pub mod razorpay;
pub mod signature;

pub use error::PaymentError;
pub use order::{NewOrder, OrderRequest, to_minor_units};
pub use razorpay::{PaymentGateway, RazorpayClient};
pub use signature::{
    OrderVerifier, SignedOrderAssertion, Verdict, VerifyRequest, VerifyResponse, constant_time_eq,
};
