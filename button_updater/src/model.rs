use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value as JsonValue};

/// A field that is either absent (`None`), explicitly `null` (`Some(None)`)
/// or set. Both absent and `null` fields are sent back the way they were read.
#[allow(clippy::option_option)]
pub type OptionalField<T> = Option<Option<T>>;

/// Deserialize a field that is present in the document, `null` included.
/// Paired with `#[serde(default)]` so an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Every widget of one subreddit, keyed by widget id, in the order Reddit
/// listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetCollection {
    pub subreddit: String,
    pub items: IndexMap<String, Widget>,
}

impl WidgetCollection {
    pub fn new(
        subreddit: impl Into<String>,
        items: IndexMap<String, Widget>,
    ) -> Self {
        Self {
            subreddit: subreddit.into(),
            items,
        }
    }

    /// The button widgets of the collection; all other kinds are skipped.
    pub fn button_widgets(&self) -> impl Iterator<Item = &ListedButtonWidget> {
        self.items.values().filter_map(|widget| match widget {
            Widget::Button(button_widget) => Some(button_widget),
            Widget::Other => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind")]
pub enum Widget {
    #[serde(rename = "button")]
    Button(ListedButtonWidget),
    /// Text areas, calendars, rules, menus and so on.
    #[serde(other)]
    Other,
}

/// A sidebar widget holding a list of buttons.
///
/// `description` and `styles` are kept so they can be sent back untouched
/// when the button list is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "B: Deserialize<'de>")
)]
pub struct ButtonWidget<B = Button> {
    pub id: String,
    pub short_name: String,
    pub description: Option<String>,
    pub styles: Option<JsonValue>,
    #[serde(default)]
    pub buttons: Vec<B>,
}

/// A button widget straight from a listing. Its buttons stay raw JSON until
/// the widget is picked, so a button Reddit lists in a shape this crate does
/// not read only matters when its own widget is updated.
pub type ListedButtonWidget = ButtonWidget<JsonValue>;

impl ListedButtonWidget {
    /// Read the widget's buttons.
    ///
    /// # Errors
    /// The first button that is not a text or image button with a `text`
    /// and a `url`.
    pub fn parse_buttons(&self) -> Result<ButtonWidget, serde_json::Error> {
        let buttons = self
            .buttons
            .iter()
            .map(Button::deserialize)
            .collect::<Result<_, _>>()?;

        Ok(ButtonWidget {
            id: self.id.clone(),
            short_name: self.short_name.clone(),
            description: self.description.clone(),
            styles: self.styles.clone(),
            buttons,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Button {
    Text(TextButton),
    Image(ImageButton),
}

impl Button {
    pub const fn kind(&self) -> ButtonKind {
        match self {
            Self::Text(_) => ButtonKind::Text,
            Self::Image(_) => ButtonKind::Image,
        }
    }

    pub const fn face(&self) -> &ButtonFace {
        match self {
            Self::Text(button) => &button.face,
            Self::Image(button) => &button.face,
        }
    }

    /// The display label, which doubles as the button's identity within
    /// its widget.
    pub fn text(&self) -> &str {
        &self.face().text
    }

    pub fn url(&self) -> &str {
        &self.face().url
    }
}

/// Fields shared by every kind of button.
///
/// Reddit lists image buttons without a `color`, so it is optional here even
/// though text buttons always carry one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonFace {
    #[serde(default, deserialize_with = "present")]
    pub color: OptionalField<String>,
    pub text: String,
    pub url: String,
    /// `Some(JsonValue::Null)` when the field was an explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub hover_state: Option<JsonValue>,
    #[serde(default, deserialize_with = "present")]
    pub fill_color: OptionalField<String>,
    #[serde(default, deserialize_with = "present")]
    pub text_color: OptionalField<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextButton {
    #[serde(flatten)]
    pub face: ButtonFace,
}

/// Sizes are kept as JSON numbers so `40` and `40.0` go back as they came.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageButton {
    #[serde(flatten)]
    pub face: ButtonFace,
    #[serde(default, deserialize_with = "present")]
    pub height: OptionalField<Number>,
    #[serde(default, deserialize_with = "present")]
    pub width: OptionalField<Number>,
    #[serde(default, deserialize_with = "present")]
    pub link_url: OptionalField<String>,
}
