use crate::activity::{Activity, ChannelAccount};

/// What a module sees of the inbound message.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub conversation_id: String,
    /// Value of the welcomed flag before this turn.
    pub welcomed: bool,
}

impl MessageContext {
    pub fn from_activity(activity: &Activity, welcomed: bool) -> Self {
        Self {
            user_id: activity.from.id.clone(),
            user_name: activity.from.name.clone().unwrap_or_default(),
            channel_id: activity.channel_id.clone(),
            conversation_id: activity.conversation.id.clone(),
            welcomed,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConversationEvent {
    MembersAdded {
        members: Vec<ChannelAccount>,
        /// Id the bot is addressed by in this conversation.
        recipient_id: String,
    },
}
