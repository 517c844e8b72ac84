use crate::message::ConversationEvent;

use super::*;

impl Bot {
    /// Hand a members-added update to every module, sending whatever they
    /// return in registration order.
    pub(super) async fn on_members_added(
        &self,
        ctx: &mut TurnContext<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let activity = ctx.activity();
        let event = ConversationEvent::MembersAdded {
            members: activity.members_added.clone(),
            recipient_id: activity.recipient.id.clone(),
        };

        log::debug!(
            "{} member(s) added to {}",
            activity.members_added.len(),
            activity.conversation.id
        );

        for module in self.registry.all() {
            if let Some(responses) = module.handle_event(&event).await? {
                for response in &responses {
                    ctx.send(response).await?;
                }
            }
        }
        Ok(())
    }
}
