//! Inbox: conversations with their latest message and unread count, and
//! sending messages.

use serde::Serialize;
use tracing::{error, info};

use crate::db::{RepositoryError, SwapRepository};
use crate::forms::{FieldPath, FieldValue, FormError, FormFields, FormStore, ValidationErrors};
use crate::models::{Conversation, Message, NewMessage};

pub const EMPTY_MESSAGE: &str = "Message cannot be empty";

/// One inbox row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationPreview {
    pub conversation: Conversation,
    pub last_message: Option<Message>,
    pub unread: usize,
}

/// Messages in `messages` that `user_id` has not read: unread and sent by
/// someone else.
pub fn unread_count(
    messages: &[Message],
    user_id: &str,
) -> usize {
    messages.iter().filter(|m| !m.is_read && !m.is_from(user_id)).count()
}

/// Conversations of `user_id`, newest first, each with its latest message.
pub async fn list_inbox(
    repo: &dyn SwapRepository,
    user_id: &str,
) -> Result<Vec<ConversationPreview>, RepositoryError> {
    let conversations = repo.list_conversations(user_id).await?;
    let mut inbox = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let messages = repo.list_messages(&conversation.id).await?;
        inbox.push(ConversationPreview {
            unread: unread_count(&messages, user_id),
            last_message: messages.last().cloned(),
            conversation,
        });
    }
    Ok(inbox)
}

pub fn total_unread(inbox: &[ConversationPreview]) -> usize {
    inbox.iter().map(|c| c.unread).sum()
}

/// Messages of a conversation, oldest first, marking them read for `reader_id`.
pub async fn open_conversation(
    repo: &dyn SwapRepository,
    conversation_id: &str,
    reader_id: &str,
) -> Result<Vec<Message>, RepositoryError> {
    let marked = repo.mark_conversation_read(conversation_id, reader_id).await?;
    if marked > 0 {
        info!(conversation_id, marked, "messages marked read");
    }
    repo.list_messages(conversation_id).await
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    pub text: String,
}

impl FormFields for MessageDraft {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match path.as_str() {
            "text" => self.text = value.into_text(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }
}

pub fn validate_message(draft: &MessageDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if draft.text.trim().is_empty() {
        errors.insert("text", EMPTY_MESSAGE);
    }
    errors
}

/// Sends the draft and clears it on success.
pub async fn send_message(
    store: &mut FormStore<MessageDraft>,
    repo: &dyn SwapRepository,
    conversation_id: &str,
    sender_id: &str,
) -> Option<Message> {
    let sent = store
        .submit(validate_message, |draft| {
            let message = NewMessage {
                conversation_id: conversation_id.to_string(),
                sender_id: sender_id.to_string(),
                text: draft.text.trim().to_string(),
            };
            async move {
                repo.send_message(message).await.map_err(|e| {
                    error!(error = %e, conversation_id, "failed to send message");
                    ValidationErrors::general("Failed to send message. Please try again.")
                })
            }
        })
        .await
        .completed()?;
    store.data_mut().text.clear();
    Some(sent)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::MemoryRepository;
    use crate::forms::GENERAL_FIELD;
    use crate::models::NewConversation;

    async fn conversation(repo: &MemoryRepository) -> Conversation {
        repo.create_conversation(NewConversation {
            user_id: "alex".to_string(),
            participant_id: Some("carlos".to_string()),
            participant_name: "Carlos Gomez".to_string(),
            participant_location: Some("Barcelona, Spain".to_string()),
        })
        .await
        .unwrap()
    }

    async fn say(
        repo: &MemoryRepository,
        conversation_id: &str,
        sender: &str,
        text: &str,
    ) {
        repo.send_message(NewMessage {
            conversation_id: conversation_id.to_string(),
            sender_id: sender.to_string(),
            text: text.to_string(),
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn inbox_counts_unread_from_others() {
        let repo = MemoryRepository::new();
        let conv = conversation(&repo).await;
        say(&repo, &conv.id, "carlos", "Hola!").await;
        say(&repo, &conv.id, "carlos", "Is June still free?").await;
        say(&repo, &conv.id, "alex", "Yes it is").await;

        let inbox = list_inbox(&repo, "alex").await.unwrap();

        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].unread, 2);
        assert_eq!(inbox[0].last_message.as_ref().map(|m| m.text.as_str()), Some("Yes it is"));
        assert_eq!(total_unread(&inbox), 2);
    }

    #[tokio::test]
    async fn opening_marks_read_and_keeps_order() {
        let repo = MemoryRepository::new();
        let conv = conversation(&repo).await;
        say(&repo, &conv.id, "carlos", "first").await;
        say(&repo, &conv.id, "carlos", "second").await;

        let messages = open_conversation(&repo, &conv.id, "alex").await.unwrap();

        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(unread_count(&messages, "alex"), 0);
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let repo = MemoryRepository::new();
        let conv = conversation(&repo).await;
        let mut store = FormStore::new(MessageDraft::default());
        store.update("text", "   ").unwrap();

        assert_eq!(send_message(&mut store, &repo, &conv.id, "alex").await, None);
        assert_eq!(store.error("text"), Some(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn sending_clears_the_draft() {
        let repo = MemoryRepository::new();
        let conv = conversation(&repo).await;
        let mut store = FormStore::new(MessageDraft::default());
        store.update("text", " See you in June ").unwrap();

        let sent = send_message(&mut store, &repo, &conv.id, "alex").await.unwrap();

        assert_eq!(sent.text, "See you in June");
        assert_eq!(store.data().text, "");
    }

    #[tokio::test]
    async fn unknown_conversation_reports_general_error() {
        let repo = MemoryRepository::new();
        let mut store = FormStore::new(MessageDraft::default());
        store.update("text", "hello").unwrap();

        assert_eq!(send_message(&mut store, &repo, "missing", "alex").await, None);
        assert!(store.error(GENERAL_FIELD).is_some());
    }
}
