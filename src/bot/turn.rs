use std::sync::Mutex;

use async_trait::async_trait;

use crate::activity::{Activity, Response};
use crate::util::new_activity_id;

/// Where outbound activities go: the channel connector in production, a
/// buffer for `expectReplies` requests and tests.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn send_activity(
        &self,
        activity: &Activity,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Collects outbound activities in memory.
#[derive(Default)]
pub struct BufferedSink {
    activities: Mutex<Vec<Activity>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Activity> {
        match self.activities.lock() {
            Ok(mut activities) => std::mem::take(&mut *activities),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

#[async_trait]
impl ActivitySink for BufferedSink {
    async fn send_activity(
        &self,
        activity: &Activity,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut activity = activity.clone();
        if activity.id.is_none() {
            activity.id = Some(new_activity_id());
        }
        self.activities
            .lock()
            .map_err(|e| format!("reply buffer poisoned: {}", e))?
            .push(activity);
        Ok(())
    }
}

/// State of one turn: the inbound activity and what has been sent so far.
pub struct TurnContext<'a> {
    activity: &'a Activity,
    sink: &'a dyn ActivitySink,
    sent: Vec<Activity>,
}

impl<'a> TurnContext<'a> {
    pub fn new(activity: &'a Activity, sink: &'a dyn ActivitySink) -> Self {
        Self {
            activity,
            sink,
            sent: Vec::new(),
        }
    }

    pub fn activity(&self) -> &'a Activity {
        self.activity
    }

    pub fn sent(&self) -> &[Activity] {
        &self.sent
    }

    /// Send a response as a reply to the inbound activity.
    pub async fn send(
        &mut self,
        response: &Response,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let reply = self.activity.create_reply(response);
        self.sink.send_activity(&reply).await?;
        self.sent.push(reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ChannelAccount;

    #[tokio::test]
    async fn test_send_records_and_forwards() {
        let activity = Activity {
            id: Some("in-1".to_string()),
            from: ChannelAccount {
                id: "user".to_string(),
                name: None,
            },
            ..Default::default()
        };
        let sink = BufferedSink::new();
        let mut ctx = TurnContext::new(&activity, &sink);

        ctx.send(&Response::text("one")).await.unwrap();
        ctx.send(&Response::text("two")).await.unwrap();
        assert_eq!(ctx.sent().len(), 2);

        let delivered = sink.take();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].text.as_deref(), Some("one"));
        assert_eq!(delivered[0].recipient.id, "user");
        assert_eq!(delivered[0].reply_to_id.as_deref(), Some("in-1"));
        assert!(delivered[0].id.is_some());
        assert!(sink.take().is_empty());
    }
}
