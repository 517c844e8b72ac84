use std::sync::Arc;

use crate::activity::{Activity, ActivityType};
use crate::config::Config;
use crate::db::Db;
use crate::module::ModuleRegistry;

mod command_handler;
mod events;
mod middleware;
mod turn;


pub use middleware::{Middleware, TranscriptLogger};
pub use turn::{ActivitySink, BufferedSink, TurnContext};

pub struct Bot {
    config: Arc<Config>,
    db: Arc<Db>,
    registry: Arc<ModuleRegistry>,
    middleware: Vec<Box<dyn Middleware>>,
}

impl Bot {
    pub fn new(config: Arc<Config>, db: Arc<Db>, registry: ModuleRegistry) -> Self {
        Self {
            config,
            db,
            registry: Arc::new(registry),
            middleware: Vec::new(),
        }
    }

    pub fn with_middleware(mut self, middleware: Box<dyn Middleware>) -> Self {
        log::info!("Registered middleware: {}", middleware.name());
        self.middleware.push(middleware);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.bot.name
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Process one inbound activity to completion. Errors from sending or
    /// from the state store end the turn and are returned to the caller.
    pub async fn on_turn(
        &self,
        activity: &Activity,
        sink: &dyn ActivitySink,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut ctx = TurnContext::new(activity, sink);

        for mw in &self.middleware {
            mw.before(&ctx).await?;
        }

        match activity.activity_type {
            ActivityType::Message => self.on_message(&mut ctx).await?,
            ActivityType::ConversationUpdate if !activity.members_added.is_empty() => {
                self.on_members_added(&mut ctx).await?
            }
            _ => log::debug!(
                "Ignoring {} activity in {}",
                activity.activity_type.as_str(),
                activity.conversation.id
            ),
        }

        for mw in self.middleware.iter().rev() {
            mw.after(&ctx).await?;
        }
        Ok(())
    }
}
