use async_trait::async_trait;

use crate::errors::Result;
use crate::messages::messages_model::{MessageRule, NewMessageRule, UserMessage};
use crate::store::UserId;

#[async_trait]
pub trait MessageServiceTrait: Send + Sync {
    fn get_unread_messages(&self, user: UserId) -> Result<Vec<UserMessage>>;
    fn get_all_messages(&self, user: UserId) -> Result<Vec<UserMessage>>;
    async fn mark_read(&self, user: UserId, message_id: i64) -> Result<()>;
    async fn create_message_rule(
        &self,
        user: UserId,
        new_rule: NewMessageRule,
    ) -> Result<MessageRule>;
}
