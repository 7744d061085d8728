//! The AI assistant: hosted-model bridge, persona, and conversation state.

pub mod backend;
pub mod persona;
pub mod session;

pub use backend::{ChatBackend, ChatError, GeminiClient, ScriptedBackend};
pub use persona::{find_avatar, AvatarOption, AVATAR_OPTIONS, DEFAULT_AVATAR};
pub use session::{AssistantService, AssistantSession};
