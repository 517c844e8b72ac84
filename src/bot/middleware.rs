use std::sync::Arc;

use async_trait::async_trait;

use crate::db::Db;

use super::turn::TurnContext;

/// Runs around the activity handler: `before` in registration order,
/// `after` in reverse once the handler finished.
#[async_trait]
pub trait Middleware: Send + Sync {
    fn name(&self) -> &str;

    async fn before(
        &self,
        _ctx: &TurnContext<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    async fn after(
        &self,
        _ctx: &TurnContext<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// Records inbound and outbound activities per conversation.
pub struct TranscriptLogger {
    db: Arc<Db>,
}

impl TranscriptLogger {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Middleware for TranscriptLogger {
    fn name(&self) -> &str {
        "transcript"
    }

    async fn before(
        &self,
        ctx: &TurnContext<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let activity = ctx.activity();
        self.db.log_activity(
            &activity.conversation.id,
            "in",
            activity.activity_type.as_str(),
            activity.command_text().unwrap_or(""),
        )
    }

    async fn after(
        &self,
        ctx: &TurnContext<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for activity in ctx.sent() {
            self.db.log_activity(
                &activity.conversation.id,
                "out",
                activity.activity_type.as_str(),
                activity.text.as_deref().unwrap_or(""),
            )?;
        }
        Ok(())
    }
}
