use async_trait::async_trait;

use crate::activity::Response;
use crate::message::MessageContext;
use crate::module::Module;

use super::READER_COMMAND;

pub const READER_TEXT: &str = "أهلاً وسهلاً بك عزيزي القارئ! يسعدنا انضمامك إلينا.";

pub struct ReaderModule;

#[async_trait]
impl Module for ReaderModule {
    fn name(&self) -> &str {
        "reader"
    }

    fn description(&self) -> &str {
        "Welcome the reader"
    }

    fn commands(&self) -> &[&str] {
        &[READER_COMMAND]
    }

    async fn handle_command(
        &self,
        _command: &str,
        _ctx: &MessageContext,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Some(vec![Response::text(READER_TEXT)]))
    }
}
