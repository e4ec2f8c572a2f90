use super::*;

use async_trait::async_trait;
use shared::domain::SettingsPatch;

use crate::notification::NotificationKind;

struct FakeSettingsApi {
    stored: Result<Option<SettingsPatch>, ErrorKind>,
    update_result: Result<(), ErrorKind>,
    updates: Mutex<Vec<SettingsDocument>>,
}

impl FakeSettingsApi {
    fn storing(stored: Option<SettingsPatch>) -> Self {
        Self {
            stored: Ok(stored),
            update_result: Ok(()),
            updates: Mutex::new(Vec::new()),
        }
    }

    fn failing_update(mut self, err: ErrorKind) -> Self {
        self.update_result = Err(err);
        self
    }
}

#[async_trait]
impl SettingsApi for FakeSettingsApi {
    async fn fetch(&self) -> Result<Option<SettingsPatch>, ErrorKind> {
        self.stored.clone()
    }

    async fn update(&self, settings: &SettingsDocument) -> Result<(), ErrorKind> {
        self.updates.lock().await.push(settings.clone());
        self.update_result.clone()
    }
}

fn controller(api: FakeSettingsApi) -> (SettingsController, Arc<FakeSettingsApi>) {
    let api = Arc::new(api);
    (
        SettingsController::new(Arc::clone(&api) as Arc<dyn SettingsApi>),
        api,
    )
}

#[tokio::test]
async fn missing_document_keeps_seeded_defaults() {
    let (settings, _api) = controller(FakeSettingsApi::storing(None));

    assert_eq!(settings.load().await, Outcome::Applied);
    assert_eq!(
        settings.document().await,
        SettingsDocument {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ],
            start_hour: 9,
            end_hour: 17,
            lunch_start_hour: 12,
        }
    );
    assert!(!settings.has_existing().await);
    assert!(!settings.is_loading());
}

#[tokio::test]
async fn stored_fields_overlay_defaults() {
    let (settings, _api) = controller(FakeSettingsApi::storing(Some(SettingsPatch {
        days: Some(vec![Weekday::Sat, Weekday::Mon]),
        start_hour: Some(8),
        end_hour: None,
        lunch_start_hour: Some(13),
    })));

    settings.load().await;
    let document = settings.document().await;
    assert_eq!(document.days, vec![Weekday::Sat, Weekday::Mon]);
    assert_eq!(document.start_hour, 8);
    assert_eq!(document.end_hour, 17);
    assert_eq!(document.lunch_start_hour, 13);
    assert!(settings.has_existing().await);
}

#[tokio::test]
async fn failed_load_reports_error() {
    let api = FakeSettingsApi {
        stored: Err(ErrorKind::transport("Network Error")),
        update_result: Ok(()),
        updates: Mutex::new(Vec::new()),
    };
    let (settings, _api) = controller(api);

    assert_eq!(settings.load().await, Outcome::Failed);
    assert_eq!(settings.document().await, SettingsDocument::default());
    assert_eq!(settings.notification().await.text, "Network Error");
}

#[tokio::test]
async fn inverted_hours_are_rejected_locally() {
    let (settings, api) = controller(FakeSettingsApi::storing(None));
    settings.set_start_hour(18).await;
    settings.set_end_hour(9).await;

    assert_eq!(settings.save().await, Outcome::Rejected);
    assert!(api.updates.lock().await.is_empty());

    let notification = settings.notification().await;
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.text, "Start hour should be less than end hour");
}

#[tokio::test]
async fn empty_day_set_is_rejected_locally() {
    let (settings, api) = controller(FakeSettingsApi::storing(None));
    settings.edit(|document| document.days.clear()).await;

    assert_eq!(settings.save().await, Outcome::Rejected);
    assert!(api.updates.lock().await.is_empty());
    assert_eq!(
        settings.notification().await.text,
        "Select at least one day"
    );
}

#[tokio::test]
async fn out_of_range_hours_are_rejected_locally() {
    let (settings, api) = controller(FakeSettingsApi::storing(None));
    settings.set_lunch_start_hour(24).await;

    assert_eq!(settings.save().await, Outcome::Rejected);
    assert!(api.updates.lock().await.is_empty());
}

#[tokio::test]
async fn save_sends_sorted_days_and_adopts_payload() {
    let (settings, api) = controller(FakeSettingsApi::storing(None));
    settings.toggle_day(Weekday::Mon).await;
    settings.toggle_day(Weekday::Sat).await;
    settings.toggle_day(Weekday::Mon).await;

    assert_eq!(settings.save().await, Outcome::Applied);

    let sent = api.updates.lock().await.clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].days,
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat
        ]
    );
    assert_eq!(settings.document().await, sent[0]);
    assert!(settings.has_existing().await);
    assert_eq!(settings.notification().await.text, "Settings updated");
}

#[tokio::test]
async fn failed_save_keeps_local_draft() {
    let (settings, _api) = controller(
        FakeSettingsApi::storing(None).failing_update(ErrorKind::server(500, None)),
    );
    settings.toggle_day(Weekday::Sat).await;
    let draft = settings.document().await;

    assert_eq!(settings.save().await, Outcome::Failed);
    assert_eq!(settings.document().await, draft);
    assert!(!settings.has_existing().await);
    assert_eq!(
        settings.notification().await.text,
        "Error updating settings"
    );
    assert!(!settings.is_loading());
}

#[tokio::test]
async fn toggling_off_a_repeated_stored_day_clears_it() {
    let (settings, _api) = controller(FakeSettingsApi::storing(Some(SettingsPatch {
        days: Some(vec![Weekday::Mon, Weekday::Mon, Weekday::Tue]),
        ..SettingsPatch::default()
    })));
    settings.load().await;
    assert_eq!(settings.document().await.days, vec![Weekday::Mon, Weekday::Tue]);

    assert!(settings.toggle_day(Weekday::Mon).await);
    assert_eq!(settings.document().await.days, vec![Weekday::Tue]);
}

#[tokio::test]
async fn sunday_cannot_be_toggled_on() {
    let (settings, _api) = controller(FakeSettingsApi::storing(None));

    assert!(!settings.toggle_day(Weekday::Sun).await);
    assert_eq!(settings.document().await, SettingsDocument::default());
}

#[test]
fn validation_accepts_seeded_defaults() {
    let document = SettingsDocument::default();
    assert_eq!(validate_settings(&document), Ok(document));
}
