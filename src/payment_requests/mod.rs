pub(crate) mod payment_requests_model;
pub(crate) mod payment_requests_service;
pub(crate) mod payment_requests_traits;

pub use payment_requests_model::{NewPaymentRequest, PaymentRequest};
pub use payment_requests_service::PaymentRequestService;
pub use payment_requests_traits::PaymentRequestServiceTrait;
