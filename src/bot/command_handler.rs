use crate::activity::Response;
use crate::config::DEFAULT_GREETING;
use crate::message::MessageContext;
use crate::util::{normalize_command, user_storage_key};

use super::*;

/// Sent for anything no module answers to.
pub(super) const DEFAULT_REPLY: &str = DEFAULT_GREETING;

impl Bot {
    pub(super) async fn on_message(
        &self,
        ctx: &mut TurnContext<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let activity = ctx.activity();
        let storage_key = user_storage_key(&activity.channel_id, &activity.from.id);
        let welcomed = self.db.is_welcomed(&storage_key)?;
        let msg_ctx = MessageContext::from_activity(activity, welcomed);

        if !msg_ctx.welcomed {
            log::info!(
                "First contact from {} ({}) on {}",
                msg_ctx.user_name,
                msg_ctx.user_id,
                msg_ctx.channel_id
            );
        }

        let command = normalize_command(activity.command_text().unwrap_or_default());
        let responses = self.dispatch_command(&command, &msg_ctx).await?;
        for response in &responses {
            ctx.send(response).await?;
        }

        self.db.set_welcomed(&storage_key, true)?;
        Ok(())
    }

    /// Resolve a normalized command to the responses to send. Always yields
    /// at least one response.
    pub(super) async fn dispatch_command(
        &self,
        command: &str,
        ctx: &MessageContext,
    ) -> Result<Vec<Response>, Box<dyn std::error::Error + Send + Sync>> {
        let module = match self.registry.find_by_command(command) {
            Some(m) => m,
            None => {
                log::debug!(
                    "Unrecognized command from {} in {}: {:?}",
                    ctx.user_id,
                    ctx.conversation_id,
                    command
                );
                return Ok(vec![Response::text(DEFAULT_REPLY)]);
            }
        };

        match module.handle_command(command, ctx).await? {
            Some(responses) if !responses.is_empty() => Ok(responses),
            _ => Ok(vec![Response::text(DEFAULT_REPLY)]),
        }
    }
}
