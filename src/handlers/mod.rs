// Action handlers: turn a user action into a backend call, then confirm the
// result by re-fetching from the backend before anything is redrawn.

pub mod busy;
pub mod dispatch;
pub mod screen;

pub use busy::{BusyToken, InFlight};
pub use dispatch::{lookup, ActionKind, Refresh, Route, ROUTES};
pub use screen::{Frame, RecordingScreen, Screen, TerminalScreen};

use thiserror::Error;
use tracing::{info, warn, Instrument};

use crate::api::{
    ApiError, ApiGateway, AuthApi, Collaborator, LoginRequest, NewSolicitud, RegisterRequest,
    Solicitud, SolicitudesApi,
};
use crate::session::{PersistenceError, Session, SessionPersistence};
use crate::telemetry::{create_action_span, generate_correlation_id};
use crate::views::{self, ViewKind};
use crate::workflows::{
    authorize, is_legal, validate_comment, validate_id, validate_intent, Action, Intent,
    Transition, ValidationError, WorkflowError,
};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not update the saved session: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("'{action}' is already in progress for request {target}")]
    Busy { target: String, action: ActionKind },

    #[error("You are not logged in")]
    NotLoggedIn,

    #[error("'{action}' cannot be triggered from the {view} view")]
    Unrouted { view: ViewKind, action: ActionKind },
}

impl HandlerError {
    /// Local failures never reached the backend
    pub fn is_local(&self) -> bool {
        !matches!(self, HandlerError::Api(_))
    }
}

/// What was redrawn after a confirmed action
#[derive(Debug, Clone, PartialEq)]
pub enum Refreshed {
    Detail(Solicitud),
    List(ViewKind, Vec<Solicitud>),
}

/// Entry points for every user action
pub struct ActionHandlers<'a> {
    gateway: &'a dyn ApiGateway,
    store: &'a dyn SessionPersistence,
    screen: &'a dyn Screen,
    in_flight: InFlight,
}

impl<'a> ActionHandlers<'a> {
    pub fn new(
        gateway: &'a dyn ApiGateway,
        store: &'a dyn SessionPersistence,
        screen: &'a dyn Screen,
    ) -> Self {
        Self {
            gateway,
            store,
            screen,
            in_flight: InFlight::new(),
        }
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Show the failure and hand it back; the current view is left alone
    fn surface(&self, error: HandlerError) -> HandlerError {
        if error.is_local() {
            info!(error = %error, "Action refused locally");
        } else {
            warn!(error = %error, "Action failed at the backend");
        }
        self.screen.error(&error.to_string());
        error
    }

    /// Saved session, or `NotLoggedIn`
    pub async fn current_session(&self) -> Result<Session, HandlerError> {
        match self.store.load().await {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(self.surface(HandlerError::NotLoggedIn)),
            Err(e) => Err(self.surface(e.into())),
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        default_department: Option<String>,
    ) -> Result<Session, HandlerError> {
        let result = async {
            let credentials = LoginRequest::new(email, password)?;
            let response = AuthApi::new(self.gateway).login(&credentials).await?;
            let session = Session::from_login(response, default_department);
            self.store.save(&session).await?;
            Ok::<_, HandlerError>(session)
        }
        .await;

        let session = result.map_err(|e| self.surface(e))?;
        info!(user_id = %session.user_id, roles = ?session.roles, "Logged in");
        self.screen.notify("✅ Logged in successfully");
        // The session is saved by now; a failed landing fetch is already on screen
        if let Err(e) = self.home(&session).await {
            warn!(error = %e, "Logged in but the home view could not be loaded");
        }
        Ok(session)
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<(), HandlerError> {
        let result = async {
            registration.validate()?;
            AuthApi::new(self.gateway).register(registration).await?;
            Ok::<_, HandlerError>(())
        }
        .await;

        result.map_err(|e| self.surface(e))?;
        self.screen.notify("✅ Registration successful. Please log in.");
        self.screen.show(&views::render_login());
        Ok(())
    }

    /// Drop the session entirely
    pub async fn logout(&self) -> Result<(), HandlerError> {
        self.store.clear().await.map_err(|e| self.surface(e.into()))?;
        info!("Logged out");
        self.screen.notify("👋 Session closed");
        self.screen.show(&format!("{}\n\n{}", views::render_nav(None), views::render_login()));
        Ok(())
    }

    /// Landing view for the session's roles
    pub async fn home(&self, session: &Session) -> Result<Refreshed, HandlerError> {
        self.open_list(session, views::home_view(Some(session))).await
    }

    /// Fetch and draw one of the list views
    pub async fn open_list(&self, session: &Session, view: ViewKind) -> Result<Refreshed, HandlerError> {
        let requests = SolicitudesApi::new(self.gateway, session)
            .list()
            .await
            .map_err(|e| self.surface(e.into()))?;
        self.draw_list(session, view, &requests);
        Ok(Refreshed::List(view, requests))
    }

    /// Fetch and draw a request's detail
    pub async fn open_detail(&self, session: &Session, id: &str) -> Result<Refreshed, HandlerError> {
        let result = async {
            let id = validate_id(id)?;
            Ok::<_, HandlerError>(SolicitudesApi::new(self.gateway, session).get(id).await?)
        }
        .await;
        let request = result.map_err(|e| self.surface(e))?;
        self.draw_detail(session, &request);
        Ok(Refreshed::Detail(request))
    }

    /// Fetch request `id` and refuse `action` up front when it is not on
    /// offer, so nothing is asked of the user for an action that cannot run.
    pub async fn check_legal(
        &self,
        session: &Session,
        id: &str,
        action: Action,
    ) -> Result<Solicitud, HandlerError> {
        let result = async {
            let id = validate_id(id)?;
            let current = SolicitudesApi::new(self.gateway, session).get(id).await?;
            if !is_legal(&current.subject(), &session.viewer(), action) {
                return Err(HandlerError::Workflow(WorkflowError::NotPermitted {
                    action,
                    status: current.status,
                }));
            }
            Ok::<_, HandlerError>(current)
        }
        .await;
        result.map_err(|e| self.surface(e))
    }

    pub async fn list_collaborators(&self, session: &Session) -> Result<Vec<Collaborator>, HandlerError> {
        let collaborators = SolicitudesApi::new(self.gateway, session)
            .collaborators()
            .await
            .map_err(|e| self.surface(e.into()))?;
        self.screen.show(&views::render_collaborators(&collaborators));
        Ok(collaborators)
    }

    /// Submit a new request, then return to "My requests"
    pub async fn submit(
        &self,
        session: &Session,
        from: ViewKind,
        new: &NewSolicitud,
    ) -> Result<Refreshed, HandlerError> {
        let route = self.route(from, ActionKind::Submit)?;
        let _busy = self.mark_busy("new", ActionKind::Submit)?;

        let result = async {
            new.validate()?;
            Ok::<_, HandlerError>(SolicitudesApi::new(self.gateway, session).create(new).await?)
        }
        .await;
        let created = result.map_err(|e| self.surface(e))?;

        self.screen.notify(&views::render_created(created.as_ref()));
        self.refresh(session, route.refresh, None).await
    }

    /// Run a workflow action against request `id`.
    ///
    /// Input is checked before anything is sent. The request is then fetched
    /// so legality is judged on the current backend state; the status shown
    /// afterwards is whatever the re-fetch returns.
    pub async fn perform(
        &self,
        session: &Session,
        from: ViewKind,
        id: &str,
        intent: Intent,
    ) -> Result<Refreshed, HandlerError> {
        let action = intent.action();
        let kind = ActionKind::Workflow(action);
        let correlation_id = generate_correlation_id();
        let span = create_action_span(action.command_name(), Some(id), &correlation_id);

        async {
            let route = self.route(from, kind)?;
            let id = validate_id(id).map_err(|e| self.surface(e.into()))?;
            let _busy = self.mark_busy(id, kind)?;
            let api = SolicitudesApi::new(self.gateway, session);

            let result = async {
                validate_intent(intent.clone())?;
                let current = api.get(id).await?;
                let transition = authorize(&current.subject(), &session.viewer(), intent)?;
                api.apply(id, &transition).await?;
                Ok::<_, HandlerError>((current.status, transition))
            }
            .await;
            let (previous, transition) = result.map_err(|e| self.surface(e))?;

            info!(
                previous = %previous,
                expected = ?transition.expected_status(),
                "Backend accepted {}",
                action
            );
            self.screen.notify(&success_message(&transition));
            self.refresh(session, route.refresh, Some(id)).await
        }
        .instrument(span)
        .await
    }

    /// Add a comment; allowed in any status for participants
    pub async fn comment(
        &self,
        session: &Session,
        from: ViewKind,
        id: &str,
        content: &str,
    ) -> Result<Refreshed, HandlerError> {
        let route = self.route(from, ActionKind::Comment)?;
        let id = validate_id(id).map_err(|e| self.surface(e.into()))?;
        let _busy = self.mark_busy(id, ActionKind::Comment)?;
        let api = SolicitudesApi::new(self.gateway, session);

        let result = async {
            if content.trim().is_empty() {
                return Err(HandlerError::Validation(ValidationError::EmptyComment));
            }
            let current = api.get(id).await?;
            let content = validate_comment(&current.subject(), &session.viewer(), content)?;
            api.comment(id, &content).await?;
            Ok::<_, HandlerError>(())
        }
        .await;
        result.map_err(|e| self.surface(e))?;

        self.screen.notify("💬 Comment added");
        self.refresh(session, route.refresh, Some(id)).await
    }

    fn route(&self, view: ViewKind, action: ActionKind) -> Result<&'static Route, HandlerError> {
        lookup(view, action).ok_or_else(|| self.surface(HandlerError::Unrouted { view, action }))
    }

    fn mark_busy(&self, target: &str, action: ActionKind) -> Result<BusyToken, HandlerError> {
        self.in_flight.begin(target, action).ok_or_else(|| {
            self.surface(HandlerError::Busy {
                target: target.to_string(),
                action,
            })
        })
    }

    async fn refresh(
        &self,
        session: &Session,
        refresh: Refresh,
        id: Option<&str>,
    ) -> Result<Refreshed, HandlerError> {
        match (refresh, id) {
            (Refresh::DetailInPlace, Some(id)) => self.open_detail(session, id).await,
            (Refresh::List(view), _) => self.open_list(session, view).await,
            (Refresh::DetailInPlace, None) => self.home(session).await,
        }
    }

    fn draw_list(&self, session: &Session, view: ViewKind, requests: &[Solicitud]) {
        let body = views::render_list(view, requests, &session.viewer());
        self.screen.show(&format!("{}\n\n{}", views::render_nav(Some(session)), body));
    }

    fn draw_detail(&self, session: &Session, request: &Solicitud) {
        let body = views::render_detail(request, &session.viewer());
        self.screen.show(&format!("{}\n\n{}", views::render_nav(Some(session)), body));
    }
}

fn success_message(transition: &Transition) -> String {
    match transition {
        Transition::Assign { .. } => "✅ Request assigned".to_string(),
        Transition::Approve { .. } => "✅ Request approved".to_string(),
        Transition::Reject { .. } => "✅ Request rejected".to_string(),
        Transition::ReturnForCorrection { .. } => "↩️  Request returned for correction".to_string(),
        Transition::MarkInProcess => "🛠️  Request marked in process".to_string(),
        Transition::MarkResolved => "✅ Request marked resolved".to_string(),
        Transition::Reopen { .. } => "🔄 Request reopened".to_string(),
        Transition::Rate { score, .. } => format!("⭐ Service rated {score}/5"),
    }
}
