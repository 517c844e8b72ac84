use async_trait::async_trait;

use crate::activity::Response;
use crate::cards::{adaptive_card, SubmitAction};
use crate::message::MessageContext;
use crate::module::Module;

use super::HELP_COMMANDS;

const TITLE: &str = "مرحباً! انا اتحدث القليل من اللغة العربية";
const SUBTITLE: &str = "اختر من احدى الأوامر العربية المتاحة بالأسفل";
const SPEAK: &str = "<s>مرحبا! إختر من إحدى النشاطاط بالأسفل</s>";

/// Answers the help token with the intro card listing the other commands.
pub struct HelpModule {
    actions: Vec<SubmitAction>,
}

impl HelpModule {
    pub fn new(actions: Vec<SubmitAction>) -> Self {
        Self { actions }
    }
}

#[async_trait]
impl Module for HelpModule {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Intro card with the command menu"
    }

    fn commands(&self) -> &[&str] {
        HELP_COMMANDS
    }

    async fn handle_command(
        &self,
        _command: &str,
        _ctx: &MessageContext,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let card = adaptive_card(TITLE, SUBTITLE, SPEAK, &self.actions);
        Ok(Some(vec![Response::attachment(card)]))
    }
}
