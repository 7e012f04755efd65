use formation_client::EntityApi;
use formation_console::{
    ConsoleError, ControllerState, CrudController, EntityStore, NotificationAction,
    NotificationLevel,
};
use formation_core::{
    EntityId, FilterError, FilterValue, FormMode, Role, SortDirection, Trainer, TrainerDraft,
    TrainerStyle, Training, TrainingDraft, User, UserDraft,
};
use formation_test_utils::assertions::assert_logins;
use formation_test_utils::{fixtures, ApiCall, MockEntityApi};
use std::sync::Arc;

async fn user_screen() -> (Arc<MockEntityApi<User>>, CrudController<User, MockEntityApi<User>>) {
    let api = Arc::new(MockEntityApi::with_records(fixtures::bob_and_ann()));
    let mut controller: CrudController<User, _> = CrudController::new(api.clone());
    controller.load().await.unwrap();
    (api, controller)
}

async fn training_screen() -> (
    Arc<MockEntityApi<Training>>,
    CrudController<Training, MockEntityApi<Training>>,
) {
    let api = Arc::new(MockEntityApi::with_records(fixtures::trainings()));
    let mut controller: CrudController<Training, _> = CrudController::new(api.clone());
    controller.load().await.unwrap();
    (api, controller)
}

fn training_draft(title: &str) -> TrainingDraft {
    TrainingDraft {
        title: title.to_string(),
        field: "IT".to_string(),
        budget: Some(2_000),
        ..TrainingDraft::default()
    }
}

#[tokio::test]
async fn users_sort_by_login_ascending() {
    let (_, controller) = user_screen().await;
    assert_eq!(controller.state(), ControllerState::Ready);
    assert_eq!(controller.sort().key, "login");
    assert_logins(&controller.visible_rows(), &["ann", "bob"]);
}

#[tokio::test]
async fn role_filter_shows_only_admins() {
    let (_, mut controller) = user_screen().await;
    controller
        .set_filter("role", FilterValue::text("admin"))
        .unwrap();
    controller.set_search("");
    assert_logins(&controller.visible_rows(), &["ann"]);
    assert_eq!(controller.visible_count(), 1);
    assert_eq!(controller.total_count(), 2);
    assert!(controller.has_active_filters());
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found_without_api_call() {
    let api = Arc::new(MockEntityApi::with_records(fixtures::trainings()));
    let mut store: EntityStore<Training, _> = EntityStore::new(api.clone());
    store.load().await.unwrap();
    let before = store.all().to_vec();

    let err = store
        .update(&EntityId::Int(5), &training_draft("Ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::NotFound { .. }));
    assert_eq!(store.all(), before.as_slice());
    assert_eq!(api.calls(), vec![ApiCall::List]);
}

#[tokio::test]
async fn store_rejects_invalid_draft_before_network() {
    let api = Arc::new(MockEntityApi::with_records(fixtures::trainings()));
    let mut store: EntityStore<Training, _> = EntityStore::new(api.clone());
    store.load().await.unwrap();

    let err = store.create(&training_draft("   ")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    assert_eq!(store.len(), 4);
    assert_eq!(api.calls(), vec![ApiCall::List]);
}

#[tokio::test]
async fn editing_unknown_id_is_not_found() {
    let (_, mut controller) = training_screen().await;
    let err = controller.start_edit(&EntityId::Int(5)).unwrap_err();
    assert!(matches!(err, ConsoleError::NotFound { .. }));
    assert!(controller.form().is_none());
}

#[tokio::test]
async fn server_side_404_maps_to_not_found() {
    let (api, mut controller) = training_screen().await;
    controller.start_edit(&EntityId::Int(2)).unwrap();
    api.delete(&EntityId::Int(2)).await.unwrap();

    let draft = controller.form().unwrap().draft.clone();
    let err = controller.submit(draft).await.unwrap_err();
    assert!(matches!(err, ConsoleError::NotFound { .. }));
    assert!(controller.form().unwrap().error.is_some());
    assert_eq!(controller.total_count(), 4);
}

#[tokio::test]
async fn created_record_appears_once_with_server_id() {
    let (_, mut controller) = training_screen().await;
    controller.start_create();
    assert_eq!(controller.form().unwrap().mode, FormMode::Create);
    assert!(controller.can_submit());

    let id = controller.submit(training_draft("Tokio")).await.unwrap();
    assert_eq!(id, EntityId::Int(5));
    assert!(controller.form().is_none());

    let matching: Vec<_> = controller
        .store()
        .all()
        .iter()
        .filter(|t| t.title == "Tokio")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, id);
    assert_eq!(controller.total_count(), 5);
    assert_eq!(
        controller.notifications().latest().unwrap().level,
        NotificationLevel::Success
    );
}

#[tokio::test]
async fn edit_replaces_record_in_place() {
    let (api, mut controller) = training_screen().await;
    controller.start_edit(&EntityId::Int(3)).unwrap();
    let mut draft = controller.form().unwrap().draft.clone();
    assert_eq!(draft.title, "anglais");
    draft.title = "Anglais des affaires".to_string();

    controller.submit(draft).await.unwrap();
    assert_eq!(controller.total_count(), 4);
    assert_eq!(
        controller.store().get(&EntityId::Int(3)).unwrap().title,
        "Anglais des affaires"
    );
    assert_eq!(
        api.calls(),
        vec![ApiCall::List, ApiCall::Update(EntityId::Int(3))]
    );
}

#[tokio::test]
async fn invalid_draft_keeps_form_open_without_calling_api() {
    let (api, mut controller) = training_screen().await;
    controller.start_create();
    let mut draft = training_draft("Long");
    draft.duration = Some(400);

    let err = controller.submit(draft).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    let form = controller.form().unwrap();
    assert!(form.error.as_deref().unwrap().contains("duration"));
    assert_eq!(api.calls(), vec![ApiCall::List]);
}

#[tokio::test]
async fn user_edit_may_leave_password_blank() {
    let (_, mut controller) = user_screen().await;
    controller.start_edit(&EntityId::Int(1)).unwrap();
    let draft = controller.form().unwrap().draft.clone();
    assert!(draft.password.is_empty());
    controller.submit(draft).await.unwrap();

    controller.start_create();
    let err = controller
        .submit(UserDraft {
            login: "carl".to_string(),
            password: String::new(),
            role: Some(Role::User),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
}

#[tokio::test]
async fn server_failure_on_submit_surfaces_message() {
    let (api, mut controller) = training_screen().await;
    controller.start_create();
    api.fail_with(500, "database unavailable");

    let err = controller.submit(training_draft("Tokio")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Network(_)));
    assert_eq!(controller.state(), ControllerState::Ready);
    let form = controller.form().unwrap();
    assert!(form
        .error
        .as_deref()
        .unwrap()
        .contains("database unavailable"));
    assert_eq!(
        controller.notifications().latest().unwrap().action,
        Some(NotificationAction::Dismiss)
    );
    assert_eq!(controller.total_count(), 4);
}

#[tokio::test]
async fn submit_without_form_is_rejected() {
    let (_, mut controller) = training_screen().await;
    let err = controller.submit(training_draft("x")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::NoOpenForm));
    assert!(!controller.can_submit());
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let (api, mut controller) = training_screen().await;
    assert!(!controller.confirm_delete().await.unwrap());

    controller.request_delete(EntityId::Int(2));
    controller.cancel_delete();
    assert!(!controller.confirm_delete().await.unwrap());
    assert_eq!(controller.total_count(), 4);

    controller.request_delete(EntityId::Int(2));
    assert_eq!(controller.pending_delete(), Some(&EntityId::Int(2)));
    assert!(controller.confirm_delete().await.unwrap());
    assert!(controller.pending_delete().is_none());
    assert_eq!(controller.total_count(), 3);
    assert!(controller.store().get(&EntityId::Int(2)).is_none());
    assert_eq!(
        api.calls(),
        vec![ApiCall::List, ApiCall::Delete(EntityId::Int(2))]
    );
}

#[tokio::test]
async fn deleting_absent_id_still_calls_api() {
    let (api, mut controller) = training_screen().await;
    controller.request_delete(EntityId::Int(42));
    assert!(controller.confirm_delete().await.unwrap());
    assert_eq!(controller.total_count(), 4);
    assert!(api.calls().contains(&ApiCall::Delete(EntityId::Int(42))));
}

#[tokio::test]
async fn failed_delete_keeps_row() {
    let (api, mut controller) = training_screen().await;
    api.fail_with(500, "locked");
    controller.request_delete(EntityId::Int(1));
    assert!(controller.confirm_delete().await.is_err());
    assert_eq!(controller.total_count(), 4);
    let notification = controller.notifications().latest().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.action, Some(NotificationAction::Dismiss));
}

#[tokio::test]
async fn failed_load_leaves_empty_usable_screen() {
    let api: Arc<MockEntityApi<Training>> =
        Arc::new(MockEntityApi::with_records(fixtures::trainings()));
    api.fail_with(503, "maintenance");
    let mut controller: CrudController<Training, _> = CrudController::new(api.clone());

    assert!(controller.load().await.is_err());
    assert_eq!(controller.state(), ControllerState::Ready);
    assert_eq!(controller.total_count(), 0);
    let notification = controller.notifications().latest().unwrap();
    assert_eq!(notification.action, Some(NotificationAction::Retry));

    api.recover();
    assert_eq!(controller.load().await.unwrap(), 4);
}

#[tokio::test]
async fn late_response_after_unmount_is_ignored() {
    let api: Arc<MockEntityApi<Training>> =
        Arc::new(MockEntityApi::with_records(fixtures::trainings()));
    let mut controller: CrudController<Training, _> = CrudController::new(api.clone());
    controller.load().await.unwrap();

    let liveness = controller.liveness();
    api.on_call(move |call| {
        if *call == ApiCall::Create {
            liveness.unmount();
        }
    });

    controller.start_create();
    let err = controller.submit(training_draft("Late")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Unmounted));
    // The server created it, but the unmounted screen never applied it.
    assert_eq!(api.records().len(), 5);
    assert_eq!(controller.total_count(), 4);
    assert!(!controller.can_submit());
}

#[tokio::test]
async fn clear_filters_is_idempotent() {
    let (_, mut controller) = training_screen().await;
    controller
        .set_filter("year", FilterValue::text("2024"))
        .unwrap();
    controller.set_search("rust");
    assert_eq!(controller.visible_count(), 1);

    controller.clear_filters();
    let once: Vec<EntityId> = controller
        .visible_rows()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    controller.clear_filters();
    let twice: Vec<EntityId> = controller
        .visible_rows()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(once, twice);
    assert_eq!(once.len(), 4);
    assert!(!controller.has_active_filters());
}

#[tokio::test]
async fn filter_names_are_checked_against_schema() {
    let (_, mut controller) = training_screen().await;
    assert_eq!(
        controller.set_filter("colour", FilterValue::text("red")),
        Err(FilterError::UnknownField("colour".to_string()))
    );
    assert_eq!(
        controller.set_filter("title", FilterValue::range(Some(1), None)),
        Err(FilterError::RangeOnNonNumeric("title".to_string()))
    );
    controller
        .set_filter("budget", FilterValue::range(Some(4_000), Some(10_000)))
        .unwrap();
    let titles: Vec<&str> = controller
        .visible_rows()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Comptabilité", "Écriture managériale"]);

    let chips = controller.active_filters();
    assert_eq!(chips, vec![("budget".to_string(), "4000..=10000".to_string())]);
    controller.clear_filter("budget");
    assert!(!controller.has_active_filters());
}

#[tokio::test]
async fn duration_takes_exact_value_and_range_together() {
    let (_, mut controller) = training_screen().await;
    controller
        .set_filter("duration", FilterValue::range(Some(1), Some(5)))
        .unwrap();
    controller
        .set_filter("duration", FilterValue::text("3"))
        .unwrap();
    assert_eq!(controller.visible_count(), 4);
    assert_eq!(
        controller.active_filters(),
        vec![
            ("duration".to_string(), "3".to_string()),
            ("duration".to_string(), "1..=5".to_string()),
        ]
    );

    controller
        .set_filter("duration", FilterValue::range(Some(4), None))
        .unwrap();
    assert_eq!(controller.visible_count(), 0);

    controller.clear_filter("duration");
    assert!(!controller.has_active_filters());
    assert_eq!(controller.visible_count(), 4);
}

#[tokio::test]
async fn sort_toggle_flips_direction_and_collates_accents() {
    let (_, mut controller) = training_screen().await;
    let titles = |c: &CrudController<Training, MockEntityApi<Training>>| -> Vec<String> {
        c.visible_rows().iter().map(|t| t.title.clone()).collect()
    };
    assert_eq!(
        titles(&controller),
        vec!["anglais", "Comptabilité", "Écriture managériale", "Rust avancé"]
    );

    controller.set_sort("title").unwrap();
    assert_eq!(controller.sort().direction, SortDirection::Desc);
    assert_eq!(
        titles(&controller),
        vec!["Rust avancé", "Écriture managériale", "Comptabilité", "anglais"]
    );

    controller.set_sort("budget").unwrap();
    assert_eq!(controller.sort().direction, SortDirection::Asc);
    assert_eq!(titles(&controller)[0], "anglais");
    assert!(controller.set_sort("nope").is_err());
}

#[tokio::test]
async fn facets_list_distinct_values() {
    let (_, controller) = training_screen().await;
    assert_eq!(
        controller.facet("year", SortDirection::Desc),
        vec!["2025", "2024", "2023"]
    );
    assert_eq!(
        controller.facet("field", SortDirection::Asc),
        vec!["Finance", "IT", "Langues", "Management"]
    );
}

#[tokio::test]
async fn trainer_form_defaults_to_internal_style() {
    let api: Arc<MockEntityApi<Trainer>> = Arc::new(MockEntityApi::new());
    let mut controller: CrudController<Trainer, _> = CrudController::new(api);
    controller.load().await.unwrap();
    controller.start_create();
    assert_eq!(controller.form().unwrap().draft.style, TrainerStyle::Interne);

    let draft = TrainerDraft {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.org".to_string(),
        tel: "0600".to_string(),
        style: TrainerStyle::Externe,
    };
    let id = controller.submit(draft).await.unwrap();
    let trainer = controller.store().get(&id).unwrap();
    assert_eq!(trainer.style, Some(TrainerStyle::Externe));

    controller
        .set_filter("style", FilterValue::text("interne"))
        .unwrap();
    assert_eq!(controller.visible_count(), 0);
}
