use serde::Serialize;
use serde_json::{Number, Value as JsonValue};

use crate::model::{
    Button, ButtonFace, ButtonKind, ButtonWidget, OptionalField,
};

pub const DEFAULT_FILL_COLOR: &str = "#000000";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

/// One button as the Reddit API expects it when a button widget's list is
/// replaced.
///
/// Fields read as `null` are written as `null`. Fields that were absent are
/// left out, except the two colors, which fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonRecord {
    pub kind: ButtonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: OptionalField<String>,
    pub text: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_state: Option<JsonValue>,
    pub fill_color: Option<String>,
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: OptionalField<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: OptionalField<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: OptionalField<String>,
}

fn color_or(color: Option<&Option<String>>, default: &str) -> Option<String> {
    color.cloned().unwrap_or_else(|| Some(default.to_string()))
}

impl ButtonRecord {
    fn from_face(kind: ButtonKind, face: &ButtonFace) -> Self {
        Self {
            kind,
            color: face.color.clone(),
            text: face.text.clone(),
            url: face.url.clone(),
            hover_state: face.hover_state.clone(),
            fill_color: color_or(face.fill_color.as_ref(), DEFAULT_FILL_COLOR),
            text_color: color_or(face.text_color.as_ref(), DEFAULT_TEXT_COLOR),
            height: None,
            width: None,
            link_url: None,
        }
    }
}

impl From<&Button> for ButtonRecord {
    fn from(button: &Button) -> Self {
        match button {
            Button::Text(text) => Self::from_face(ButtonKind::Text, &text.face),
            Button::Image(image) => Self {
                height: image.height.clone(),
                width: image.width.clone(),
                link_url: image.link_url.clone(),
                ..Self::from_face(ButtonKind::Image, &image.face)
            },
        }
    }
}

/// Convert every button of the widget into the records needed to recreate
/// the widget's button list, in the widget's order.
pub fn serialize(widget: &ButtonWidget) -> Vec<ButtonRecord> {
    widget.buttons.iter().map(ButtonRecord::from).collect()
}
