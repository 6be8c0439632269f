//! Chat domain module.
//!
//! Contains the conversation and message domain models shared by the
//! conversation/message registry and the backend seam.

mod conversation;
mod message;

pub use conversation::{Conversation, ConversationId, NewConversation};
pub use message::{Message, MessageId, MessageRole, SendMessageRequest};
