//! Search a subreddit's sidebar for a single button inside a button widget
//! and update the button's text and link.
//!
//! Reddit only accepts a complete button list when a button widget is
//! modified, so an update re-sends every button of the widget with one of
//! them retargeted.

pub mod error;
pub mod locate;
pub mod model;
pub mod reddit;
pub mod records;
pub mod service;
pub mod update;

pub use error::{LookupKind, NotFoundError, ServiceError, UpdateError};
pub use locate::{find_button, find_button_widget};
pub use model::{
    Button, ButtonFace, ButtonKind, ButtonWidget, ImageButton,
    ListedButtonWidget, OptionalField, TextButton, Widget, WidgetCollection,
};
pub use reddit::{RedditClient, RedditCredentials, RedditSettings};
pub use records::{ButtonRecord, serialize};
pub use service::WidgetService;
pub use update::{ButtonUpdate, update_button};
