//! Attachment builders for the card payloads the bot sends.

use serde_json::{json, Value};

use crate::activity::Attachment;

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
pub const HERO_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.hero";
pub const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// A submit action on an adaptive card. Selecting it re-sends `data` as the
/// next message.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAction {
    pub title: String,
    pub data: String,
}

pub fn adaptive_card(
    title: &str,
    subtitle: &str,
    speak: &str,
    actions: &[SubmitAction],
) -> Attachment {
    let actions: Vec<Value> = actions
        .iter()
        .map(|a| {
            json!({
                "type": "Action.Submit",
                "title": a.title,
                "data": a.data,
            })
        })
        .collect();

    let card = json!({
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "type": "AdaptiveCard",
        "version": "1.0",
        "speak": speak,
        "body": [
            {
                "type": "TextBlock",
                "text": title,
                "size": "Large",
                "weight": "Bolder"
            },
            {
                "type": "TextBlock",
                "text": subtitle,
                "isSubtle": true
            }
        ],
        "actions": actions,
    });

    Attachment {
        content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
        content_url: None,
        content: Some(card),
        name: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroCard {
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub image_url: String,
    /// `(title, value)` pairs sent back verbatim with `imBack`.
    pub buttons: Vec<(String, String)>,
}

pub fn hero_card(card: &HeroCard) -> Attachment {
    let buttons: Vec<Value> = card
        .buttons
        .iter()
        .map(|(title, value)| {
            json!({
                "type": "imBack",
                "title": title,
                "value": value,
            })
        })
        .collect();

    Attachment {
        content_type: HERO_CARD_CONTENT_TYPE.to_string(),
        content_url: None,
        content: Some(json!({
            "title": card.title,
            "subtitle": card.subtitle,
            "text": card.text,
            "images": [{ "url": card.image_url }],
            "buttons": buttons,
        })),
        name: None,
    }
}

pub fn file_attachment(name: &str, url: &str) -> Attachment {
    Attachment {
        content_type: FILE_CONTENT_TYPE.to_string(),
        content_url: Some(url.to_string()),
        content: None,
        name: Some(name.to_string()),
    }
}
