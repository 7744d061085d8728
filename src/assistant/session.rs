//! The assistant conversation, and the exclusive-access service around it.
//!
//! One exchange at a time: the UI disables its send control while a request
//! is in flight, and the service enforces the same rule here — a second
//! send returns [`ChatError::Busy`] instead of queueing. Backend failure
//! never escapes as an error; it becomes the fallback bubble in the
//! conversation, which is what the citizen sees.

use std::sync::{Arc, Mutex, RwLock, TryLockError};

use uuid::Uuid;

use crate::language::Language;
use crate::models::chat::ChatMessage;

use super::backend::{ChatBackend, ChatError};
use super::persona::{find_avatar, DEFAULT_AVATAR};

/// Conversation state behind the service.
#[derive(Debug, Clone)]
pub struct AssistantSession {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub avatar: String,
    pub language: Language,
}

impl AssistantSession {
    fn new(language: Language, avatar: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![ChatMessage::model(language.assistant_greeting())],
            avatar: avatar.to_string(),
            language,
        }
    }
}

pub struct AssistantService {
    backend: Arc<dyn ChatBackend>,
    session: RwLock<AssistantSession>,
    /// Held for the whole backend round trip. `try_lock` = the send control.
    in_flight: Mutex<()>,
}

impl AssistantService {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_persona(backend, Language::default(), DEFAULT_AVATAR)
    }

    pub fn with_persona(backend: Arc<dyn ChatBackend>, language: Language, avatar: &str) -> Self {
        let avatar = if find_avatar(avatar).is_some() {
            avatar
        } else {
            DEFAULT_AVATAR
        };
        Self {
            backend,
            session: RwLock::new(AssistantSession::new(language, avatar)),
            in_flight: Mutex::new(()),
        }
    }

    /// Send one user utterance and return the assistant's bubble.
    ///
    /// Appends the user message, performs the backend round trip, then
    /// appends either the reply or the language pack's fallback bubble.
    /// Only [`ChatError::Busy`] and [`ChatError::EmptyInput`] surface.
    pub fn send(&self, input: &str) -> Result<ChatMessage, ChatError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(ChatError::Busy),
            Err(TryLockError::Poisoned(_)) => {
                return Err(ChatError::Unavailable("lock poisoned".into()))
            }
        };

        // History snapshot is taken before the new user message, matching
        // the backend contract (history + latest utterance).
        let (history, language) = {
            let session = self
                .session
                .read()
                .map_err(|_| ChatError::Unavailable("lock poisoned".into()))?;
            (session.messages.clone(), session.language)
        };

        let reply = match self.backend.send(&history, input) {
            Ok(text) => ChatMessage::model(text),
            Err(e) => {
                tracing::warn!(error = %e, "Assistant backend failed, showing fallback");
                ChatMessage::model(language.assistant_fallback())
            }
        };

        let mut session = self
            .session
            .write()
            .map_err(|_| ChatError::Unavailable("lock poisoned".into()))?;
        session.messages.push(ChatMessage::user(input));
        session.messages.push(reply.clone());
        Ok(reply)
    }

    /// Is a backend round trip currently running?
    pub fn is_busy(&self) -> bool {
        matches!(
            self.in_flight.try_lock(),
            Err(TryLockError::WouldBlock)
        )
    }

    pub fn snapshot(&self) -> AssistantSession {
        self.session
            .read()
            .map(|session| session.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Change avatar and/or language. The greeting is re-issued only when
    /// the conversation is still untouched, so switching language mid-chat
    /// does not rewrite history.
    pub fn set_persona(&self, avatar: Option<&str>, language: Option<Language>) -> Result<(), ChatError> {
        let mut session = self
            .session
            .write()
            .map_err(|_| ChatError::Unavailable("lock poisoned".into()))?;
        if let Some(avatar) = avatar {
            if find_avatar(avatar).is_none() {
                return Err(ChatError::Unavailable(format!("unknown avatar: {avatar}")));
            }
            session.avatar = avatar.to_string();
        }
        if let Some(language) = language {
            session.language = language;
            if session.messages.len() == 1 {
                session.messages[0] = ChatMessage::model(language.assistant_greeting());
            }
        }
        Ok(())
    }
}
