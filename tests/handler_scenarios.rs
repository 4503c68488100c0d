//! End-to-end action scenarios against an in-memory backend: legality,
//! validation before any call, refresh from the backend and the busy guard.

mod common;

use common::{session, solicitud, FakeBackend};
use mesa_ayuda::api::{ApiError, NewSolicitud, RequestFormat};
use mesa_ayuda::handlers::{
    ActionHandlers, ActionKind, Frame, HandlerError, RecordingScreen, Refreshed,
};
use mesa_ayuda::session::MemorySessionStore;
use mesa_ayuda::views::ViewKind;
use mesa_ayuda::workflows::{
    legal_actions, Action, Intent, Role, Status, ValidationError, WorkflowError,
};
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Notify;

/// Applies status updates and ratings the way the backend does
fn follow_updates(path: &str, body: &Value, request: &mut Value) {
    if path.starts_with("/Solicitudes/update-status/") {
        request["estado"] = body["estado"].clone();
    } else if path.starts_with("/Solicitudes/rate/") {
        request["calificacionServicio"] = body["calificacionServicio"].clone();
        request["comentariosCalificacion"] = body["comentariosCalificacion"].clone();
    } else if path.starts_with("/Solicitudes/approve/") {
        request["estado"] = json!("Aprobada");
    }
}

fn detail(refreshed: Refreshed) -> mesa_ayuda::api::Solicitud {
    match refreshed {
        Refreshed::Detail(request) => request,
        other => panic!("expected a detail refresh, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_shows_status_from_refetch() {
    let backend = FakeBackend::serving(solicitud("7", "EnProceso", "u-1", Some("c-1"), None))
        .on_mutation(follow_updates);
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let collaborator = session("c-1", &[Role::ColaboradorCpm]);

    let refreshed = handlers
        .perform(&collaborator, ViewKind::Detail, "7", Intent::MarkResolved)
        .await
        .unwrap();

    assert_eq!(detail(refreshed).status, Status::Resolved);
    let mutations = backend.mutations();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].method, Method::PUT);
    assert_eq!(mutations[0].path, "/Solicitudes/update-status/7");
    assert_eq!(mutations[0].body, Some(json!({ "estado": "Resuelta" })));
    assert!(mutations[0].authenticated);
}

#[tokio::test]
async fn test_resolve_keeps_backend_status_when_it_did_not_change() {
    // Backend accepts the call but still reports the old status
    let backend = FakeBackend::serving(solicitud("7", "EnProceso", "u-1", Some("c-1"), None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let collaborator = session("c-1", &[Role::ColaboradorCpm]);

    let refreshed = handlers
        .perform(&collaborator, ViewKind::Detail, "7", Intent::MarkResolved)
        .await
        .unwrap();

    assert_eq!(detail(refreshed).status, Status::InProcess);
    assert!(screen.errors().is_empty());
}

#[tokio::test]
async fn test_rating_leaves_only_reopen() {
    let backend = FakeBackend::serving(solicitud("9", "Resuelta", "u-1", Some("c-1"), None))
        .on_mutation(follow_updates);
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let requester = session("u-1", &[Role::Solicitante]);
    let viewer = requester.viewer();

    let before = detail(handlers.open_detail(&requester, "9").await.unwrap());
    assert_eq!(
        legal_actions(&before.subject(), &viewer),
        BTreeSet::from([Action::Reopen, Action::Rate])
    );

    let intent = Intent::Rate { score: "4".into(), comment: "great".into() };
    let after = detail(handlers.perform(&requester, ViewKind::Detail, "9", intent).await.unwrap());

    assert_eq!(after.rating, Some(4));
    assert_eq!(legal_actions(&after.subject(), &viewer), BTreeSet::from([Action::Reopen]));
    assert_eq!(
        backend.mutations()[0].body,
        Some(json!({ "calificacionServicio": 4, "comentariosCalificacion": "great" }))
    );
}

#[tokio::test]
async fn test_assigned_request_admin_cannot_start_but_collaborator_can() {
    let backend = FakeBackend::serving(solicitud("3", "Asignada", "u-1", Some("c-1"), None))
        .on_mutation(follow_updates);
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);

    let admin = session("a-1", &[Role::AdministradorCpm]);
    let request = detail(handlers.open_detail(&admin, "3").await.unwrap());
    assert!(legal_actions(&request.subject(), &admin.viewer()).is_empty());

    let err = handlers
        .perform(&admin, ViewKind::Detail, "3", Intent::MarkInProcess)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HandlerError::Workflow(WorkflowError::NotPermitted { action: Action::MarkInProcess, .. })
    ));
    assert!(backend.mutations().is_empty());

    let collaborator = session("c-1", &[Role::ColaboradorCpm]);
    assert_eq!(
        legal_actions(&request.subject(), &collaborator.viewer()),
        BTreeSet::from([Action::MarkInProcess])
    );
    let started = detail(
        handlers
            .perform(&collaborator, ViewKind::Detail, "3", Intent::MarkInProcess)
            .await
            .unwrap(),
    );
    assert_eq!(started.status, Status::InProcess);
}

#[tokio::test]
async fn test_blank_input_fails_without_any_call() {
    let backend = FakeBackend::serving(solicitud("5", "Resuelta", "u-1", Some("c-1"), None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let admin = session("a-1", &[Role::AdministradorCpm]);
    let requester = session("u-1", &[Role::Solicitante]);

    let cases = [
        (&admin, Intent::Assign { collaborator_id: "  ".into() }),
        (&admin, Intent::Approve { comment: String::new() }),
        (&admin, Intent::Reject { comment: " \t".into() }),
        (&admin, Intent::ReturnForCorrection { comment: "".into() }),
        (&requester, Intent::Reopen { reason: "   ".into() }),
    ];
    for (who, intent) in cases {
        let err = handlers.perform(who, ViewKind::Detail, "5", intent).await.unwrap_err();
        assert!(matches!(err, HandlerError::Validation(_)), "unexpected {err:?}");
    }

    for score in ["0", "6", "abc", ""] {
        let intent = Intent::Rate { score: score.into(), comment: String::new() };
        let err = handlers.perform(&requester, ViewKind::Detail, "5", intent).await.unwrap_err();
        assert!(matches!(err, HandlerError::Validation(ValidationError::InvalidScore { .. })));
    }

    assert!(backend.calls().is_empty());
    assert_eq!(screen.errors().len(), 9);
}

#[tokio::test]
async fn test_unrouted_action_is_refused_before_any_call() {
    let backend = FakeBackend::serving(solicitud("5", "Recibida", "u-1", None, None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let admin = session("a-1", &[Role::AdministradorCpm]);

    let err = handlers
        .perform(&admin, ViewKind::MyRequests, "5", Intent::Assign { collaborator_id: "c-1".into() })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HandlerError::Unrouted { view: ViewKind::MyRequests, action: ActionKind::Workflow(Action::Assign) }
    ));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_dashboard_action_returns_to_the_dashboard() {
    let backend = FakeBackend::serving(solicitud("4", "Asignada", "u-1", Some("c-1"), None))
        .on_mutation(follow_updates);
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let collaborator = session("c-1", &[Role::ColaboradorCpm]);

    let refreshed = handlers
        .perform(&collaborator, ViewKind::CollaboratorDashboard, "4", Intent::MarkInProcess)
        .await
        .unwrap();

    match refreshed {
        Refreshed::List(view, requests) => {
            assert_eq!(view, ViewKind::CollaboratorDashboard);
            assert_eq!(requests[0].status, Status::InProcess);
        }
        other => panic!("expected the dashboard, got {other:?}"),
    }
    let view = screen.current_view().unwrap();
    assert!(view.contains("My assignments"));
}

#[tokio::test]
async fn test_backend_failure_leaves_view_untouched() {
    let backend = FakeBackend::serving(solicitud("8", "Resuelta", "u-1", Some("c-1"), None))
        .failing_mutations(ApiError::Status {
            status: 409,
            message: "La solicitud ya fue revisada".into(),
        });
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let admin = session("a-1", &[Role::AdministradorCpm]);

    handlers.open_detail(&admin, "8").await.unwrap();
    let view_before = screen.current_view();

    let err = handlers
        .perform(&admin, ViewKind::Detail, "8", Intent::Approve { comment: "ok".into() })
        .await
        .unwrap_err();

    assert!(matches!(err, HandlerError::Api(ApiError::Status { status: 409, .. })));
    assert_eq!(screen.errors(), vec!["La solicitud ya fue revisada".to_string()]);
    assert_eq!(screen.current_view(), view_before);
    assert!(!handlers.in_flight().is_busy("8", ActionKind::Workflow(Action::Approve)));
}

#[tokio::test]
async fn test_second_trigger_while_in_flight_is_refused() {
    let gate = Arc::new(Notify::new());
    let backend = FakeBackend::serving(solicitud("7", "EnProceso", "u-1", Some("c-1"), None))
        .on_mutation(follow_updates)
        .gated(Arc::clone(&gate));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let collaborator = session("c-1", &[Role::ColaboradorCpm]);

    let (first, second, _) = tokio::join!(
        handlers.perform(&collaborator, ViewKind::Detail, "7", Intent::MarkResolved),
        handlers.perform(&collaborator, ViewKind::Detail, "7", Intent::MarkResolved),
        async { gate.notify_one() },
    );

    assert_eq!(detail(first.unwrap()).status, Status::Resolved);
    assert!(matches!(second, Err(HandlerError::Busy { .. })));
    assert_eq!(backend.mutations().len(), 1);
    assert!(!handlers.in_flight().is_busy("7", ActionKind::Workflow(Action::MarkResolved)));
}

#[tokio::test]
async fn test_comment_rules() {
    let backend = FakeBackend::serving(solicitud("2", "Aprobada", "u-1", Some("c-1"), Some(5)));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);

    let requester = session("u-1", &[Role::Solicitante]);
    let err = handlers.comment(&requester, ViewKind::Detail, "2", "   ").await.unwrap_err();
    assert!(matches!(err, HandlerError::Validation(ValidationError::EmptyComment)));
    assert!(backend.calls().is_empty());

    let outsider = session("x-9", &[Role::Solicitante]);
    let err = handlers.comment(&outsider, ViewKind::Detail, "2", "hola").await.unwrap_err();
    assert!(matches!(err, HandlerError::Workflow(WorkflowError::NotParticipant)));
    assert!(backend.mutations().is_empty());

    handlers
        .comment(&requester, ViewKind::Detail, "2", "  Gracias por el video  ")
        .await
        .unwrap();
    let mutations = backend.mutations();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].method, Method::POST);
    assert_eq!(mutations[0].path, "/Solicitudes/comment/2");
    assert_eq!(mutations[0].body, Some(json!({ "contenido": "Gracias por el video" })));
}

#[tokio::test]
async fn test_action_without_session_is_not_logged_in() {
    let backend = FakeBackend::serving(solicitud("1", "Recibida", "u-1", None, None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);

    let err = handlers.current_session().await.unwrap_err();
    assert!(matches!(err, HandlerError::NotLoggedIn));
    assert!(backend.calls().is_empty());
}

fn new_request() -> NewSolicitud {
    NewSolicitud {
        title: "Fotos del foro".into(),
        description: "Cobertura del foro de egresados".into(),
        format: RequestFormat::Photography,
        event_date: None,
        event_time: None,
        event_place: Some("Auditorio".into()),
        department: "Ingeniería".into(),
    }
}

#[tokio::test]
async fn test_submit_returns_to_my_requests_from_the_backend() {
    let backend = FakeBackend::serving(solicitud("9", "Recibida", "u-1", None, None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let requester = session("u-1", &[Role::Solicitante]);

    let refreshed = handlers
        .submit(&requester, ViewKind::NewRequest, &new_request())
        .await
        .unwrap();

    match refreshed {
        Refreshed::List(view, requests) => {
            assert_eq!(view, ViewKind::MyRequests);
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].id, "9");
        }
        other => panic!("expected the requester's list, got {other:?}"),
    }

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "/Solicitudes");
    let body = calls[0].body.clone().unwrap();
    assert_eq!(body["titulo"], "Fotos del foro");
    assert_eq!(body["formatoRequerido"], "Fotografia");
    assert_eq!(body["facultadOrigen"], "Ingeniería");
    assert!(body.get("fechaEvento").is_none());
    assert_eq!((calls[1].method.clone(), calls[1].path.as_str()), (Method::GET, "/Solicitudes"));

    // An empty create response still counts as submitted
    assert!(screen.frames().contains(&Frame::Notice("✅ Request submitted".to_string())));
    assert!(screen.current_view().unwrap().contains("My requests"));
}

#[tokio::test]
async fn test_submit_with_blank_fields_makes_no_call() {
    let backend = FakeBackend::serving(solicitud("9", "Recibida", "u-1", None, None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let requester = session("u-1", &[Role::Solicitante]);

    let blank_title = NewSolicitud { title: "  ".into(), ..new_request() };
    let blank_description = NewSolicitud { description: String::new(), ..new_request() };
    let blank_department = NewSolicitud { department: "\t".into(), ..new_request() };

    for (new, field) in [
        (blank_title, "title"),
        (blank_description, "description"),
        (blank_department, "department"),
    ] {
        let err = handlers.submit(&requester, ViewKind::NewRequest, &new).await.unwrap_err();
        assert!(
            matches!(err, HandlerError::Validation(ValidationError::MissingField { field: f }) if f == field),
            "unexpected {err:?}"
        );
    }

    assert!(backend.calls().is_empty());
    assert_eq!(screen.errors().len(), 3);
    assert!(screen.current_view().is_none());
}

#[tokio::test]
async fn test_submit_only_from_the_new_request_view() {
    let backend = FakeBackend::serving(solicitud("9", "Recibida", "u-1", None, None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let requester = session("u-1", &[Role::Solicitante]);

    let err = handlers
        .submit(&requester, ViewKind::Detail, &new_request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HandlerError::Unrouted { view: ViewKind::Detail, action: ActionKind::Submit }
    ));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_request_ids_are_confined_to_one_path_segment() {
    let backend = FakeBackend::serving(solicitud("a/b", "EnProceso", "u-1", Some("c-1"), None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let collaborator = session("c-1", &[Role::ColaboradorCpm]);

    for id in ["..", " . ", ""] {
        let err = handlers
            .perform(&collaborator, ViewKind::Detail, id, Intent::MarkResolved)
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Validation(ValidationError::InvalidId { .. })));
    }
    let err = handlers.open_detail(&collaborator, "..").await.unwrap_err();
    assert!(matches!(err, HandlerError::Validation(ValidationError::InvalidId { .. })));
    assert!(backend.calls().is_empty());

    handlers
        .perform(&collaborator, ViewKind::Detail, "a/b", Intent::MarkResolved)
        .await
        .unwrap();
    let paths: Vec<String> = backend.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(
        paths,
        vec![
            "/Solicitudes/a%2Fb".to_string(),
            "/Solicitudes/update-status/a%2Fb".to_string(),
            "/Solicitudes/a%2Fb".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_legality_check_fetches_and_refuses_without_mutating() {
    let backend = FakeBackend::serving(solicitud("3", "Resuelta", "u-1", Some("c-1"), None));
    let store = MemorySessionStore::new();
    let screen = RecordingScreen::new();
    let handlers = ActionHandlers::new(&backend, &store, &screen);
    let collaborator = session("c-1", &[Role::ColaboradorCpm]);

    let err = handlers
        .check_legal(&collaborator, "3", Action::MarkResolved)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HandlerError::Workflow(WorkflowError::NotPermitted { action: Action::MarkResolved, status: Status::Resolved })
    ));
    assert_eq!(screen.errors().len(), 1);

    let requester = session("u-1", &[Role::Solicitante]);
    let current = handlers.check_legal(&requester, "3", Action::Reopen).await.unwrap();
    assert_eq!(current.status, Status::Resolved);

    assert_eq!(backend.calls().len(), 2);
    assert!(backend.mutations().is_empty());
}
