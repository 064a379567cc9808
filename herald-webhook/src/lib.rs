//! herald-webhook: chat-webhook wire format and delivery

pub mod dispatcher;
pub mod error;
pub mod payload;

pub use dispatcher::{DeliveryTarget, Dispatcher, StatusPolicy};
pub use error::{DispatchError, Result};
pub use payload::{encode, Embed, EmbedField, WebhookPayload};
