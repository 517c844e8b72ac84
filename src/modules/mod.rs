mod carousel;
mod files;
mod help;
mod reader;
mod welcome;

use crate::cards::SubmitAction;
use crate::config::Config;
use crate::module::ModuleRegistry;

pub const HELP_COMMANDS: &[&str] = &["مساعدة", "المساعدة"];
pub const READER_COMMAND: &str = "رحب بالقارئ";
pub const CAROUSEL_COMMAND: &str = "يشترى";
pub const FILES_COMMAND: &str = "تحميل";

pub fn build_registry(config: &Config) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    let host = config.server.host_url.as_str();

    // The intro card only offers what is actually wired.
    let mut menu = Vec::new();

    if config.is_module_enabled("reader") {
        registry.register(Box::new(reader::ReaderModule));
        menu.push(SubmitAction {
            title: READER_COMMAND.to_string(),
            data: READER_COMMAND.to_string(),
        });
    }
    if config.is_module_enabled("carousel") {
        registry.register(Box::new(carousel::CarouselModule::new(host.to_string())));
        menu.push(SubmitAction {
            title: "carousel إظهر مكتبة دوارة".to_string(),
            data: CAROUSEL_COMMAND.to_string(),
        });
    }
    if config.is_module_enabled("files") {
        registry.register(Box::new(files::FilesModule::new(host.to_string())));
        menu.push(SubmitAction {
            title: "اظهر خاصية تحميل المرفقات".to_string(),
            data: FILES_COMMAND.to_string(),
        });
    }
    if config.is_module_enabled("help") {
        registry.register(Box::new(help::HelpModule::new(menu)));
    }
    if config.is_module_enabled("welcome") {
        registry.register(Box::new(welcome::WelcomeModule::new(
            config.welcome.message.clone(),
        )));
    }

    registry
}
