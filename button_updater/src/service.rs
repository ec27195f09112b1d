use crate::error::ServiceError;
use crate::model::{ButtonWidget, WidgetCollection};
use crate::records::ButtonRecord;

/// The remote side of a button update.
///
/// Implementations own transport, authentication and rate limiting; errors
/// are handed back to the caller as they are.
pub trait WidgetService {
    /// Fetch every widget of the subreddit.
    fn list_widgets(
        &self,
        subreddit: &str,
    ) -> impl Future<Output = Result<WidgetCollection, ServiceError>> + Send;

    /// Replace the whole button list of `widget` with `buttons`.
    fn replace_buttons(
        &self,
        subreddit: &str,
        widget: &ButtonWidget,
        buttons: &[ButtonRecord],
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
