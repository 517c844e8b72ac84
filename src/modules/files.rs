use async_trait::async_trait;

use crate::activity::Response;
use crate::cards::file_attachment;
use crate::message::MessageContext;
use crate::module::Module;
use crate::util::asset_url;

use super::FILES_COMMAND;

pub const RECEIPT_TEXT: &str = "إليك الملفات المطلوبة:";

/// `(name, relative path)` of the files offered for download. They are
/// linked as-is; nothing checks that the host serves them.
pub const FILES: [(&str, &str); 2] = [
    ("sample.txt", "/src/assets/sample.txt"),
    ("sample.docx", "/src/assets/sample.docx"),
];

pub struct FilesModule {
    host: String,
}

impl FilesModule {
    pub fn new(host: String) -> Self {
        Self { host }
    }
}

#[async_trait]
impl Module for FilesModule {
    fn name(&self) -> &str {
        "files"
    }

    fn description(&self) -> &str {
        "File download links"
    }

    fn commands(&self) -> &[&str] {
        &[FILES_COMMAND]
    }

    async fn handle_command(
        &self,
        _command: &str,
        _ctx: &MessageContext,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let attachments = FILES
            .iter()
            .map(|(name, path)| file_attachment(name, &asset_url(&self.host, path)))
            .collect();
        Ok(Some(vec![Response {
            text: Some(RECEIPT_TEXT.to_string()),
            attachments,
            layout: None,
        }]))
    }
}
