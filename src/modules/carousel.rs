use async_trait::async_trait;

use crate::activity::{AttachmentLayout, Response};
use crate::cards::{hero_card, HeroCard};
use crate::message::MessageContext;
use crate::module::Module;
use crate::util::asset_url;

use super::CAROUSEL_COMMAND;

pub const ITEM_COUNT: usize = 4;
pub const WHERE_TO_BUY: &str = "مكان الشراء";
pub const RELATED_PRODUCTS: &str = "المنتجات ذات الصلة";

/// Sends a carousel of product cards. The card buttons send back tokens that
/// no module answers to, so they end at the default reply.
pub struct CarouselModule {
    host: String,
}

impl CarouselModule {
    pub fn new(host: String) -> Self {
        Self { host }
    }

    fn item(&self, index: usize) -> HeroCard {
        HeroCard {
            title: format!("عنصر {}", index),
            subtitle: format!("السعر: {}٠٠ ريال", index),
            text: "وصف قصير للمنتج يظهر هنا.".to_string(),
            image_url: asset_url(&self.host, &format!("/assets/{}.jpg", index)),
            buttons: vec![
                (WHERE_TO_BUY.to_string(), WHERE_TO_BUY.to_string()),
                (RELATED_PRODUCTS.to_string(), RELATED_PRODUCTS.to_string()),
            ],
        }
    }
}

#[async_trait]
impl Module for CarouselModule {
    fn name(&self) -> &str {
        "carousel"
    }

    fn description(&self) -> &str {
        "Product carousel"
    }

    fn commands(&self) -> &[&str] {
        &[CAROUSEL_COMMAND]
    }

    async fn handle_command(
        &self,
        _command: &str,
        _ctx: &MessageContext,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let attachments = (1..=ITEM_COUNT).map(|i| hero_card(&self.item(i))).collect();
        Ok(Some(vec![Response {
            text: None,
            attachments,
            layout: Some(AttachmentLayout::Carousel),
        }]))
    }
}
