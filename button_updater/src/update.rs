use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::UpdateError;
use crate::locate::{find_button, find_button_widget};
use crate::records::{ButtonRecord, serialize};
use crate::service::WidgetService;

/// A request to retarget one button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonUpdate {
    pub subreddit: String,
    /// Short name of the button widget to search for.
    pub widget_name: String,
    /// Text of the button within the widget to search for.
    pub button_name: String,
    pub new_text: String,
    pub new_url: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Search the subreddit for the button and give it a new text and link.
///
/// Both lookups finish before anything is written. The write re-sends every
/// button of the widget, with only the matched button's `text` and `url`
/// changed.
///
/// # Errors
/// - `UpdateError::NotFound` if the widget or the button does not exist.
/// - `UpdateError::InvalidButtons` if the widget lists a button that cannot
///   be read. Buttons of other widgets are never read.
/// - `UpdateError::Service` for anything the service reports, including
///   `ServiceError::Forbidden` when the account cannot moderate the
///   subreddit or the subreddit is private.
#[instrument(skip_all, fields(
    subreddit = %update.subreddit,
    widget = %update.widget_name,
    button = %update.button_name
))]
pub async fn update_button<S: WidgetService>(
    service: &S,
    update: &ButtonUpdate,
) -> Result<(), UpdateError> {
    let collection = service.list_widgets(&update.subreddit).await?;

    let listed = find_button_widget(
        &collection,
        &update.widget_name,
        update.case_sensitive,
    )?;
    let widget = listed.parse_buttons().map_err(|source| {
        UpdateError::InvalidButtons {
            widget: listed.short_name.clone(),
            source,
        }
    })?;
    let button =
        find_button(&widget, &update.button_name, update.case_sensitive)?;

    let mut records = serialize(&widget);

    // the search may have folded case, but the record must be the button
    // that was found, so compare exactly here
    if !retarget(&mut records, button.text(), &update.new_text, &update.new_url)
    {
        return Err(UpdateError::MissingRecord {
            widget: widget.short_name.clone(),
            text: button.text().to_string(),
        });
    }

    info!(
        widget_id = %widget.id,
        "replacing {} buttons, {:?} becomes {:?}",
        records.len(),
        button.text(),
        update.new_text
    );

    service
        .replace_buttons(&update.subreddit, &widget, &records)
        .await?;

    Ok(())
}

/// Overwrite text and url of the first record whose text is exactly
/// `original_text`. Returns false if there is no such record.
fn retarget(
    records: &mut [ButtonRecord],
    original_text: &str,
    new_text: &str,
    new_url: &str,
) -> bool {
    records
        .iter_mut()
        .find(|record| record.text == original_text)
        .map(|record| {
            record.text = new_text.to_string();
            record.url = new_url.to_string();
        })
        .is_some()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::{LookupKind, ServiceError};
    use crate::model::{ButtonKind, ButtonWidget, Widget, WidgetCollection};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct FakeService {
        items: IndexMap<String, Widget>,
        forbid_writes: bool,
        writes: Mutex<Vec<(String, String, Vec<ButtonRecord>)>>,
    }

    impl FakeService {
        fn new(listing: &str) -> Self {
            Self {
                items: serde_json::from_str(listing).unwrap(),
                forbid_writes: false,
                writes: Mutex::new(Vec::new()),
            }
        }

        fn writes(&self) -> Vec<(String, String, Vec<ButtonRecord>)> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl WidgetService for FakeService {
        async fn list_widgets(
            &self,
            subreddit: &str,
        ) -> Result<WidgetCollection, ServiceError> {
            Ok(WidgetCollection::new(subreddit, self.items.clone()))
        }

        async fn replace_buttons(
            &self,
            subreddit: &str,
            widget: &ButtonWidget,
            buttons: &[ButtonRecord],
        ) -> Result<(), ServiceError> {
            self.writes.lock().unwrap().push((
                subreddit.to_string(),
                widget.id.clone(),
                buttons.to_vec(),
            ));

            if self.forbid_writes {
                return Err(ServiceError::Forbidden {
                    url: format!("/r/{subreddit}/api/widget/{}", widget.id),
                });
            }
            Ok(())
        }
    }

    const LINKS: &str = r##"{
        "widget_rules": {"kind": "subreddit-rules", "id": "widget_rules", "shortName": "Links"},
        "widget_links": {"kind": "button", "id": "widget_links", "shortName": "Links", "buttons": [
            {"kind": "text", "text": "Home", "url": "a.com", "color": "#fff"},
            {"kind": "text", "text": "Docs", "url": "b.com", "color": "#fff", "hoverState": {"kind": "text", "text": "Read", "color": "#eee"}}
        ]}
    }"##;

    fn request(widget_name: &str, button_name: &str) -> ButtonUpdate {
        ButtonUpdate {
            subreddit: "rust".to_string(),
            widget_name: widget_name.to_string(),
            button_name: button_name.to_string(),
            new_text: "Documentation".to_string(),
            new_url: "c.com".to_string(),
            case_sensitive: false,
        }
    }

    #[tokio::test]
    async fn test_update_button_replaces_whole_list() {
        let service = FakeService::new(LINKS);

        update_button(&service, &request("links", "docs"))
            .await
            .unwrap();

        let writes = service.writes();
        assert_eq!(writes.len(), 1);
        let (subreddit, widget_id, records) = &writes[0];
        assert_eq!(subreddit, "rust");
        assert_eq!(widget_id, "widget_links");
        assert_eq!(
            serde_json::to_value(records).unwrap(),
            json!([
                {
                    "kind": "text",
                    "color": "#fff",
                    "text": "Home",
                    "url": "a.com",
                    "fillColor": "#000000",
                    "textColor": "#FFFFFF"
                },
                {
                    "kind": "text",
                    "color": "#fff",
                    "text": "Documentation",
                    "url": "c.com",
                    "hoverState": {"kind": "text", "text": "Read", "color": "#eee"},
                    "fillColor": "#000000",
                    "textColor": "#FFFFFF"
                }
            ])
        );
    }

    #[tokio::test]
    async fn test_update_button_missing_widget_writes_nothing() {
        let service = FakeService::new(LINKS);

        let err = update_button(&service, &request("Nope", "Docs"))
            .await
            .unwrap_err();

        let not_found = match err {
            UpdateError::NotFound(not_found) => not_found,
            other => panic!("expected a not found error, got {other:?}"),
        };
        assert_eq!(not_found.kind, LookupKind::Widget);
        assert_eq!(not_found.searched_name, "Nope");
        assert_eq!(not_found.scope, "rust");
        assert!(service.writes().is_empty());
    }

    #[tokio::test]
    async fn test_update_button_missing_button_writes_nothing() {
        let service = FakeService::new(LINKS);

        let err = update_button(&service, &request("Links", "Wiki"))
            .await
            .unwrap_err();

        let not_found = match err {
            UpdateError::NotFound(not_found) => not_found,
            other => panic!("expected a not found error, got {other:?}"),
        };
        assert_eq!(not_found.kind, LookupKind::Button);
        assert_eq!(not_found.scope, "Links");
        assert!(service.writes().is_empty());
    }

    #[tokio::test]
    async fn test_update_button_case_sensitive_search() {
        let service = FakeService::new(LINKS);
        let mut update = request("links", "Docs");
        update.case_sensitive = true;

        let err = update_button(&service, &update).await.unwrap_err();

        assert!(matches!(err, UpdateError::NotFound(_)));
        assert!(service.writes().is_empty());
    }

    #[tokio::test]
    async fn test_update_button_forbidden_is_not_retried() {
        let mut service = FakeService::new(LINKS);
        service.forbid_writes = true;

        let err = update_button(&service, &request("Links", "Home"))
            .await
            .unwrap_err();

        assert!(err.is_forbidden());
        assert_eq!(service.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_update_button_only_first_duplicate_changes() {
        let service = FakeService::new(
            r##"{"widget_1": {"kind": "button", "id": "widget_1", "shortName": "Links", "buttons": [
                {"kind": "text", "text": "Docs", "url": "1.com", "color": "#fff"},
                {"kind": "image", "text": "Docs", "url": "2.com", "color": "#fff", "width": 20}
            ]}}"##,
        );

        update_button(&service, &request("Links", "Docs"))
            .await
            .unwrap();

        let records = &service.writes()[0].2;
        assert_eq!(records[0].text, "Documentation");
        assert_eq!(records[0].url, "c.com");
        assert_eq!(records[1].text, "Docs");
        assert_eq!(records[1].url, "2.com");
        assert_eq!(records[1].kind, ButtonKind::Image);
        assert_eq!(
            records[1].width,
            Some(Some(serde_json::Number::from(20)))
        );
    }

    #[tokio::test]
    async fn test_update_button_ignores_buttons_of_other_widgets() {
        let service = FakeService::new(
            r##"{
                "widget_gallery": {"kind": "button", "id": "widget_gallery", "shortName": "Gallery", "buttons": [
                    {"kind": "image", "text": "Logo", "url": "https://i.redd.it/logo.png", "linkUrl": "https://example.com", "height": 40, "width": 40}
                ]},
                "widget_links": {"kind": "button", "id": "widget_links", "shortName": "Links", "buttons": [
                    {"kind": "text", "text": "Docs", "url": "b.com", "color": "#fff"}
                ]},
                "widget_odd": {"kind": "button", "id": "widget_odd", "shortName": "Odd", "buttons": [
                    {"kind": "video", "text": "Clip"}
                ]}
            }"##,
        );

        update_button(&service, &request("Links", "Docs"))
            .await
            .unwrap();

        let writes = service.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1, "widget_links");
        assert_eq!(writes[0].2[0].text, "Documentation");
    }

    #[tokio::test]
    async fn test_update_button_image_button_without_color() {
        let service = FakeService::new(
            r##"{"widget_gallery": {"kind": "button", "id": "widget_gallery", "shortName": "Gallery", "buttons": [
                {"kind": "image", "text": "Logo", "url": "https://i.redd.it/logo.png", "linkUrl": "https://example.com", "height": 40.0, "width": 40}
            ]}}"##,
        );

        update_button(&service, &request("gallery", "logo"))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&service.writes()[0].2).unwrap(),
            json!([{
                "kind": "image",
                "text": "Documentation",
                "url": "c.com",
                "fillColor": "#000000",
                "textColor": "#FFFFFF",
                "height": 40.0,
                "width": 40,
                "linkUrl": "https://example.com"
            }])
        );
    }

    #[tokio::test]
    async fn test_update_button_unreadable_target_writes_nothing() {
        let service = FakeService::new(
            r##"{"widget_links": {"kind": "button", "id": "widget_links", "shortName": "Links", "buttons": [
                {"kind": "text", "text": "Docs", "url": "b.com", "color": "#fff"},
                {"kind": "video", "text": "Clip"}
            ]}}"##,
        );

        let err = update_button(&service, &request("Links", "Docs"))
            .await
            .unwrap_err();

        match err {
            UpdateError::InvalidButtons { widget, .. } => {
                assert_eq!(widget, "Links");
            }
            other => panic!("expected unreadable buttons, got {other:?}"),
        }
        assert!(service.writes().is_empty());
    }

    #[test]
    fn test_retarget_matches_exact_text_only() {
        let widget: ButtonWidget = serde_json::from_value(json!({
            "id": "widget_1",
            "shortName": "Links",
            "buttons": [{"kind": "text", "text": "Docs", "url": "b.com", "color": "#fff"}]
        }))
        .unwrap();
        let mut records = serialize(&widget);

        assert!(!retarget(&mut records, "docs", "x", "y"));
        assert_eq!(records[0].text, "Docs");

        assert!(retarget(&mut records, "Docs", "x", "y"));
        assert_eq!(records[0].text, "x");
        assert_eq!(records[0].url, "y");
    }

    #[test]
    fn test_button_update_payload_defaults() {
        let update: ButtonUpdate = serde_json::from_value(json!({
            "subreddit": "rust",
            "widget_name": "Links",
            "button_name": "Docs",
            "new_text": "Documentation",
            "new_url": "c.com"
        }))
        .unwrap();

        assert!(!update.case_sensitive);
    }
}
