pub(crate) mod messages_model;
pub(crate) mod messages_service;
pub(crate) mod messages_traits;


pub use messages_model::{MessageKind, MessageRule, NewMessageRule, UserMessage};
pub use messages_service::{MessageEmitter, MessageService};
pub use messages_traits::MessageServiceTrait;
