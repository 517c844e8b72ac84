use async_trait::async_trait;

use crate::activity::Response;
use crate::message::{ConversationEvent, MessageContext};

#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Normalized tokens this module answers to, matched exactly.
    fn commands(&self) -> &[&str];

    async fn handle_command(
        &self,
        command: &str,
        ctx: &MessageContext,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>>;

    async fn handle_event(
        &self,
        _event: &ConversationEvent,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(None)
    }
}

pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    pub fn register(&mut self, module: Box<dyn Module>) {
        log::info!("Registered module: {}", module.name());
        for command in module.commands() {
            if let Some(existing) = self.find_by_command(command) {
                log::warn!(
                    "Command {:?} of {} is shadowed by {}",
                    command,
                    module.name(),
                    existing.name()
                );
            }
        }
        self.modules.push(module);
    }

    pub fn find_by_command(&self, command: &str) -> Option<&dyn Module> {
        self.modules
            .iter()
            .find(|m| m.commands().contains(&command))
            .map(|m| m.as_ref())
    }

    pub fn all(&self) -> &[Box<dyn Module>] {
        &self.modules
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, &'static [&'static str]);

    #[async_trait]
    impl Module for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "fixed"
        }

        fn commands(&self) -> &[&str] {
            self.1
        }

        async fn handle_command(
            &self,
            _command: &str,
            _ctx: &MessageContext,
        ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Some(vec![Response::text(self.0)]))
        }
    }

    #[test]
    fn test_find_by_command_exact() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Fixed("a", &["alpha", "a"])));
        registry.register(Box::new(Fixed("b", &["beta"])));

        assert_eq!(registry.find_by_command("a").unwrap().name(), "a");
        assert_eq!(registry.find_by_command("alpha").unwrap().name(), "a");
        assert_eq!(registry.find_by_command("beta").unwrap().name(), "b");
        assert!(registry.find_by_command("alp").is_none());
        assert!(registry.find_by_command("beta ").is_none());
        assert_eq!(registry.all().len(), 2);
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Fixed("first", &["x"])));
        registry.register(Box::new(Fixed("second", &["x"])));
        assert_eq!(registry.find_by_command("x").unwrap().name(), "first");
    }
}
