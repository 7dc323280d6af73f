use std::io::Write;

use anyhow::{Context, Result, bail};
use swap_core::messaging::{MessageDraft, list_inbox, open_conversation, send_message, total_unread};
use swap_core::{FormStore, SwapRepository};

use crate::app::App;
use crate::cli::MessagesArgs;
use crate::state::AppState;

const PREVIEW_CHARS: usize = 48;

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", cut.trim_end())
}

pub async fn show_inbox(
    repo: &dyn SwapRepository,
    user_id: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let inbox = list_inbox(repo, user_id).await.context("Failed to load inbox")?;
    writeln!(out, "{} conversations, {} unread", inbox.len(), total_unread(&inbox))?;
    for row in &inbox {
        let c = &row.conversation;
        let location = c.participant_location.as_deref().unwrap_or("");
        let unread = if row.unread > 0 { format!(" ({} new)", row.unread) } else { String::new() };
        writeln!(out, "\n[{}] {} {location}{unread}", c.id, c.participant_name)?;
        if let Some(last) = &row.last_message {
            writeln!(out, "  {}", preview(&last.text))?;
        }
    }
    Ok(())
}

/// Sends `send` if given, then prints the whole conversation and marks it
/// read for `user_id`.
pub async fn show_conversation(
    repo: &dyn SwapRepository,
    user_id: &str,
    conversation_id: &str,
    send: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let conversations = repo.list_conversations(user_id).await.context("Failed to load inbox")?;
    let Some(conversation) = conversations.iter().find(|c| c.id == conversation_id) else {
        bail!("No conversation '{conversation_id}' for user '{user_id}'");
    };

    if let Some(text) = send {
        let mut store = FormStore::new(MessageDraft { text: text.to_string() });
        if send_message(&mut store, repo, conversation_id, user_id).await.is_none() {
            for (_, message) in store.errors().iter() {
                writeln!(out, "  {message}")?;
            }
            bail!("Message not sent");
        }
    }

    let messages = open_conversation(repo, conversation_id, user_id)
        .await
        .context("Failed to open conversation")?;
    writeln!(out, "Conversation with {}", conversation.participant_name)?;
    for m in &messages {
        let who = if m.is_from(user_id) { "You" } else { conversation.participant_name.as_str() };
        writeln!(out, "  {} {who}: {}", m.created_at.format("%d/%m %H:%M"), m.text)?;
    }
    Ok(())
}

pub async fn run(
    app: &App,
    state: &AppState,
    args: &MessagesArgs,
    out: &mut dyn Write,
) -> Result<()> {
    match &args.conversation {
        Some(id) => show_conversation(&*app.repo, &state.user_id, id, args.send.as_deref(), out).await,
        None => show_inbox(&*app.repo, &state.user_id, out).await,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use swap_core::db::MemoryRepository;
    use swap_core::{NewConversation, NewMessage};

    use super::*;

    async fn repo_with_conversation() -> (MemoryRepository, String) {
        let repo = MemoryRepository::new();
        let conversation = repo
            .create_conversation(NewConversation {
                user_id: "me".to_string(),
                participant_id: Some("carlos".to_string()),
                participant_name: "Carlos Gomez".to_string(),
                participant_location: Some("Barcelona, Spain".to_string()),
            })
            .await
            .unwrap();
        repo.send_message(NewMessage {
            conversation_id: conversation.id.clone(),
            sender_id: "carlos".to_string(),
            text: "Hola! Is your flat still available in June?".to_string(),
        })
        .await
        .unwrap();
        (repo, conversation.id)
    }

    #[tokio::test]
    async fn inbox_shows_unread_counts() {
        let (repo, id) = repo_with_conversation().await;
        let mut out = Vec::new();

        show_inbox(&repo, "me", &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("1 conversations, 1 unread"));
        assert!(text.contains(&format!("[{id}] Carlos Gomez Barcelona, Spain (1 new)")));
    }

    #[tokio::test]
    async fn opening_sends_and_marks_read() {
        let (repo, id) = repo_with_conversation().await;
        let mut out = Vec::new();

        show_conversation(&repo, "me", &id, Some("  Yes, it is!  "), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Carlos Gomez: Hola!"));
        assert!(text.contains("You: Yes, it is!"));
        let messages = repo.list_messages(&id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.is_read || m.is_from("me")));
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let (repo, id) = repo_with_conversation().await;
        let mut out = Vec::new();

        assert!(show_conversation(&repo, "me", &id, Some("   "), &mut out).await.is_err());

        assert!(String::from_utf8(out).unwrap().contains("Message cannot be empty"));
        assert_eq!(repo.list_messages(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_conversation_is_an_error() {
        let (repo, _) = repo_with_conversation().await;

        assert!(show_conversation(&repo, "me", "nope", None, &mut Vec::new()).await.is_err());
    }

    #[test]
    fn long_previews_are_cut() {
        let long = "a".repeat(60);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 1);
        assert_eq!(preview("short"), "short");
    }
}
