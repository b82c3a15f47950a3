//! Review conversation log.
//!
//! [`JsonlConversationLogger`] appends workflow events to a JSONL file and
//! implements the [`ConversationLogger`](review_reply_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
