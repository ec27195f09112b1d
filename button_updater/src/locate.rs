use tracing::debug;

use crate::error::NotFoundError;
use crate::model::{
    Button, ButtonWidget, ListedButtonWidget, WidgetCollection,
};

/// Compare a stored name with a searched one. Case-insensitive comparison
/// uses full Unicode case folding, so "STRASSE" matches "straße".
fn names_match(stored: &str, searched: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        stored == searched
    } else {
        caseless::default_caseless_match_str(stored, searched)
    }
}

/// Return the first button widget in the collection whose short name is
/// `name`. Its buttons are still raw; see `ListedButtonWidget::parse_buttons`.
///
/// # Errors
/// `NotFoundError` naming the widget and the subreddit if no button widget
/// matches.
pub fn find_button_widget<'a>(
    collection: &'a WidgetCollection,
    name: &str,
    case_sensitive: bool,
) -> Result<&'a ListedButtonWidget, NotFoundError> {
    let widget = collection
        .button_widgets()
        .find(|widget| names_match(&widget.short_name, name, case_sensitive))
        .ok_or_else(|| NotFoundError::widget(name, &collection.subreddit))?;

    debug!(widget_id = %widget.id, "found button widget {}", widget.short_name);

    Ok(widget)
}

/// Return the first button in the widget whose text is `name`.
///
/// # Errors
/// `NotFoundError` naming the button and the widget if no button matches.
pub fn find_button<'a>(
    widget: &'a ButtonWidget,
    name: &str,
    case_sensitive: bool,
) -> Result<&'a Button, NotFoundError> {
    widget
        .buttons
        .iter()
        .find(|button| names_match(button.text(), name, case_sensitive))
        .ok_or_else(|| NotFoundError::button(name, &widget.short_name))
}
