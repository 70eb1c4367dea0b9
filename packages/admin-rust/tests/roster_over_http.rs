//! End-to-end tests: `RosterViewModel` driving `HttpRosterApi` against the
//! in-memory roster server on an OS-assigned port.

use std::sync::Arc;
use std::time::Duration;

use comlab_admin::roster::{DeleteOutcome, EditSurface, RosterError, RosterViewModel};
use comlab_admin::server::{spawn, RosterStore, RunningServer, StoreCall, TestServerConfig};
use comlab_admin::{ApiConfig, HttpRosterApi};
use comlab_core::{
    ApiError, Column, DraftField, EditDraft, NewTeacherDraft, NoticeLevel, RosterApi, Teacher,
    UnknownTeacher,
};

fn teacher(id: &str, last: &str, first: &str) -> Teacher {
    Teacher {
        teacher_id: id.to_string(),
        lastname: last.to_string(),
        firstname: first.to_string(),
        teacher_email: format!("{}@comlab.edu", first.to_lowercase()),
        courses: vec!["BSIS".to_string()],
        sections: vec!["4A".to_string()],
        subjects: vec!["Programming".to_string()],
        password: None,
    }
}

fn roster() -> Vec<Teacher> {
    vec![
        teacher("2021-00004", "Torres", "Bea"),
        teacher("2021-00001", "Santos", "Maria"),
        teacher("2021-00003", "Cruz", "Ana"),
        teacher("2021-00002", "Reyes", "Jose"),
    ]
}

async fn start(teachers: Vec<Teacher>) -> (RunningServer, RosterViewModel<HttpRosterApi>) {
    let store = Arc::new(RosterStore::with_teachers(teachers));
    let server = spawn(TestServerConfig::default(), store)
        .await
        .expect("test server should start");
    let api = HttpRosterApi::new(&ApiConfig {
        base_url: server.base_url(),
        request_timeout: Some(Duration::from_secs(5)),
    })
    .expect("client should build");
    (server, RosterViewModel::new(api))
}

#[tokio::test]
async fn load_populates_cache_in_server_order() {
    let (server, mut vm) = start(roster()).await;

    assert_eq!(vm.load().await.unwrap(), 4);
    let ids: Vec<_> = vm.roster().iter().map(|t| t.teacher_id.as_str()).collect();
    assert_eq!(ids, vec!["2021-00004", "2021-00001", "2021-00003", "2021-00002"]);

    let view = vm.view().unwrap();
    let sorted: Vec<_> = view.rows.iter().map(|r| r.teacher.lastname.as_str()).collect();
    assert_eq!(sorted, vec!["Cruz", "Reyes", "Santos", "Torres"]);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn failed_load_is_noticed_and_keeps_cache() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();
    server.store.fail_list(true);

    let err = vm.load().await.unwrap_err();
    assert_eq!(
        err,
        RosterError::Api(ApiError::Status {
            endpoint: "/teacher/getTeachers".to_string(),
            status: 500,
        })
    );
    assert_eq!(vm.roster().len(), 4);
    assert_eq!(vm.take_notices()[0].level, NoticeLevel::Error);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn edit_round_trip_updates_server_and_cache() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();

    let mut draft = vm.begin_edit("2021-00003").unwrap();
    draft.teacher_email = "ana.cruz@comlab.edu".to_string();
    draft.sections = vec!["4B".to_string(), "4C".to_string()];
    vm.submit_edit(draft).await.unwrap();

    let stored = server.store.get("2021-00003").unwrap();
    assert_eq!(stored.teacher_email, "ana.cruz@comlab.edu");
    assert_eq!(stored.sections, vec!["4B", "4C"]);
    assert_eq!(vm.edit_surface(), &EditSurface::Closed);
    let cached = vm
        .roster()
        .iter()
        .find(|t| t.teacher_id == "2021-00003")
        .unwrap();
    assert_eq!(cached.teacher_email, "ana.cruz@comlab.edu");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn nine_character_id_never_reaches_the_server() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();
    let calls_before = server.store.call_count();

    let mut draft = vm.begin_edit("2021-00001").unwrap();
    draft.teacher_id = "2021-0001".to_string();
    let err = vm.submit_edit(draft).await.unwrap_err();

    match err {
        RosterError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.field == DraftField::TeacherId));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(server.store.call_count(), calls_before);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn begin_edit_on_absent_id_is_not_found() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();

    assert_eq!(
        vm.begin_edit("2030-00000"),
        Err(RosterError::NotFound(UnknownTeacher("2030-00000".to_string())))
    );
    assert!(!vm.edit_surface().is_open());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn edit_of_unknown_server_record_reopens_with_error() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();
    let draft = vm.begin_edit("2021-00002").unwrap();
    server.store.delete("2021-00002").unwrap();

    let err = vm.submit_edit(draft).await.unwrap_err();
    assert!(matches!(
        err,
        RosterError::Api(ApiError::Status { status: 404, .. })
    ));
    assert!(matches!(
        vm.edit_surface(),
        EditSurface::Open { error: Some(_), .. }
    ));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn partial_bulk_delete_reports_each_outcome() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();
    server.store.fail_id("2021-00002");

    vm.select("2021-00001").unwrap();
    vm.select("2021-00002").unwrap();
    let report = vm.delete_selected().await;

    assert_eq!(report.outcomes["2021-00001"], DeleteOutcome::Deleted);
    assert!(matches!(
        &report.outcomes["2021-00002"],
        DeleteOutcome::Failed(ApiError::Status { status: 500, .. })
    ));
    assert!(server.store.get("2021-00001").is_none());
    assert!(server.store.get("2021-00002").is_some());
    assert_eq!(vm.roster().len(), 3);
    assert!(vm.selection().is_empty());

    let deletes: Vec<_> = server
        .store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::Delete(_)))
        .collect();
    assert_eq!(
        deletes,
        vec![
            StoreCall::Delete("2021-00001".to_string()),
            StoreCall::Delete("2021-00002".to_string()),
        ]
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn reload_clears_selection_even_when_ids_reappear() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();
    vm.select("2021-00004").unwrap();
    vm.toggle_sort(Column::Firstname);

    vm.load().await.unwrap();

    assert!(vm.roster().iter().any(|t| t.teacher_id == "2021-00004"));
    assert!(vm.selection().is_empty());
    assert_eq!(vm.view().unwrap().selected_count, 0);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn create_round_trip_sends_password_once() {
    let (server, mut vm) = start(roster()).await;
    vm.load().await.unwrap();

    let draft = NewTeacherDraft {
        fields: EditDraft {
            teacher_id: "2021-00005".to_string(),
            teacher_email: "liza@comlab.edu".to_string(),
            lastname: "Garcia".to_string(),
            firstname: "Liza".to_string(),
            courses: vec!["BSOM".to_string()],
            sections: vec!["4D".to_string()],
            subjects: vec!["Web Development".to_string()],
        },
        password: Some("changeme".to_string()),
    };
    vm.create_teacher(draft).await.unwrap();

    assert_eq!(vm.roster().len(), 5);
    assert_eq!(
        server.store.get("2021-00005").and_then(|t| t.password).as_deref(),
        Some("changeme")
    );
    assert_eq!(vm.take_notices()[0].message, "Teacher added successfully");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn identifiers_are_percent_encoded_in_delete_path() {
    let (server, _vm) = start(vec![teacher("2021/00099", "Slash", "Sam")]).await;
    let api = HttpRosterApi::new(&ApiConfig {
        base_url: server.base_url(),
        request_timeout: None,
    })
    .unwrap();

    api.delete_teacher("2021/00099").await.unwrap();
    assert!(server.store.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let (server, _vm) = start(Vec::new()).await;
    let base_url = server.base_url();
    server.stop().await.unwrap();

    let mut vm = RosterViewModel::new(
        HttpRosterApi::new(&ApiConfig {
            base_url,
            request_timeout: Some(Duration::from_secs(2)),
        })
        .unwrap(),
    );
    let err = vm.load().await.unwrap_err();
    assert!(matches!(err, RosterError::Api(ApiError::Transport { .. })));
    assert!(!vm.is_loaded());
}
