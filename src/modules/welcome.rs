use async_trait::async_trait;

use crate::activity::Response;
use crate::message::{ConversationEvent, MessageContext};
use crate::module::Module;

/// Greets every member added to a conversation, except the bot itself.
/// Runs on every members-added event; the welcomed flag is not consulted.
pub struct WelcomeModule {
    message: String,
}

impl WelcomeModule {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[async_trait]
impl Module for WelcomeModule {
    fn name(&self) -> &str {
        "welcome"
    }

    fn description(&self) -> &str {
        "New member greeting"
    }

    fn commands(&self) -> &[&str] {
        &[]
    }

    async fn handle_command(
        &self,
        _command: &str,
        _ctx: &MessageContext,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(None)
    }

    async fn handle_event(
        &self,
        event: &ConversationEvent,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        match event {
            ConversationEvent::MembersAdded {
                members,
                recipient_id,
            } => {
                let responses: Vec<Response> = members
                    .iter()
                    .filter(|m| &m.id != recipient_id)
                    .map(|m| {
                        log::info!("Greeting new member {}", m.id);
                        Response::text(self.message.clone())
                    })
                    .collect();

                if responses.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(responses))
                }
            }
        }
    }
}
