pub mod board;
pub mod form;
pub mod history;

pub use crate::domain::model::{HistoryEntry, Message, MessageForm, MessageLog, StoredMessage};
pub use crate::domain::ports::{MessageRelay, MessageStore};
pub use crate::utils::error::Result;
