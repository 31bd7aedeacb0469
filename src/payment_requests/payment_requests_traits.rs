use async_trait::async_trait;

use crate::errors::Result;
use crate::payment_requests::payment_requests_model::{NewPaymentRequest, PaymentRequest};
use crate::store::UserId;

#[async_trait]
pub trait PaymentRequestServiceTrait: Send + Sync {
    /// Requests with their linked transactions and current filled state.
    fn get_requests(&self, user: UserId) -> Result<Vec<PaymentRequest>>;
    async fn create_request(
        &self,
        user: UserId,
        new_request: NewPaymentRequest,
    ) -> Result<PaymentRequest>;
}
