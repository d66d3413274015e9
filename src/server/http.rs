//! HTTP server implementation
//!
//! hyper http1 with TokioIo; one task per connection, WebSocket upgrades
//! handled on the same listener.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::analytics::VisitorStore;
use crate::chatbot::{ConversationStore, KnowledgeBase};
use crate::config::Args;
use crate::content::{IntakeStore, NotificationStore, ProjectStore};
use crate::db::schemas::SITE_COLLECTION;
use crate::db::MongoClient;
use crate::fanout::{self, FanoutHub};
use crate::routes::{self, respond};
use crate::site::sections::Section;
use crate::site::SiteStore;
use crate::types::RoostError;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub mongo: Option<MongoClient>,
    pub site: SiteStore,
    pub projects: ProjectStore,
    pub intake: IntakeStore,
    pub visitors: VisitorStore,
    pub conversations: ConversationStore,
    pub notifications: NotificationStore,
    pub hub: Arc<FanoutHub>,
    pub knowledge: Arc<KnowledgeBase>,
    pub started_at: Instant,
}

impl AppState {
    /// In-memory state for dev mode and tests
    pub fn memory_only(args: Args, knowledge: KnowledgeBase) -> Self {
        let hub = Arc::new(FanoutHub::new(args.fanout_buffer));
        Self {
            args,
            mongo: None,
            site: SiteStore::memory_only(),
            projects: ProjectStore::memory_only(),
            intake: IntakeStore::memory_only(),
            visitors: VisitorStore::memory_only(),
            conversations: ConversationStore::memory_only(),
            notifications: NotificationStore::memory_only(),
            hub,
            knowledge: Arc::new(knowledge),
            started_at: Instant::now(),
        }
    }

    /// MongoDB-backed state
    pub async fn with_mongo(
        args: Args,
        mongo: MongoClient,
        knowledge: KnowledgeBase,
    ) -> Result<Self, RoostError> {
        let hub = Arc::new(FanoutHub::new(args.fanout_buffer));
        let site = SiteStore::with_mongo(mongo.collection(SITE_COLLECTION).await?);
        let projects = ProjectStore::with_mongo(&mongo).await?;
        let intake = IntakeStore::with_mongo(&mongo).await?;
        let visitors = VisitorStore::with_mongo(&mongo).await?;
        let conversations = ConversationStore::with_mongo(&mongo).await?;
        let notifications = NotificationStore::with_mongo(&mongo).await?;

        Ok(Self {
            args,
            mongo: Some(mongo),
            site,
            projects,
            intake,
            visitors,
            conversations,
            notifications,
            hub,
            knowledge: Arc::new(knowledge),
            started_at: Instant::now(),
        })
    }

    /// Seed the site document and starter projects when empty
    pub async fn bootstrap(&self) -> Result<(), RoostError> {
        if self.site.bootstrap().await? {
            info!("Seeded default site content");
        }
        if self.projects.bootstrap().await? {
            info!("Seeded starter projects");
        }
        Ok(())
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), RoostError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Roost listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - in-memory fallback active");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .with_upgrades()
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    debug!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        // CORS preflight
        (Method::OPTIONS, _) => routes::cors_preflight(),

        // Service endpoints
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health::liveness(state).await
        }
        (Method::GET, "/ready") | (Method::GET, "/readyz") => {
            routes::health::readiness(state).await
        }
        (Method::GET, "/version") => routes::health::version(),

        // Fanout subscription
        (Method::GET, "/ws") => {
            if hyper_tungstenite::is_upgrade_request(&req) {
                return Ok(to_boxed(
                    fanout::handle_ws_upgrade(Arc::clone(&state.hub), addr, req).await,
                ));
            }
            respond(Err(RoostError::BadRequest(
                "WebSocket upgrade required for /ws".to_string(),
            )))
        }

        // Aggregate snapshot
        (Method::GET, "/api/data") => respond(routes::data::aggregate(state).await),

        // Blog item CRUD
        (Method::GET, "/api/blog") => respond(routes::blog::list(state).await),
        (Method::POST, "/api/blog") => respond(routes::blog::create(state, req).await),
        (Method::GET, p) if p.starts_with("/api/blog/") => {
            let id = p.strip_prefix("/api/blog/").unwrap_or("");
            respond(routes::blog::get(state, id).await)
        }
        (Method::PUT, p) if p.starts_with("/api/blog/") => {
            let id = path.strip_prefix("/api/blog/").unwrap_or("").to_string();
            respond(routes::blog::update(state, &id, req).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/blog/") => {
            let id = p.strip_prefix("/api/blog/").unwrap_or("");
            respond(routes::blog::delete(state, id).await)
        }

        // Chatbot
        (Method::GET, "/api/chatbot/settings") => {
            respond(routes::sections::get_chatbot_settings(state).await)
        }
        (Method::POST, "/api/chatbot/message") => {
            respond(routes::chatbot::message(state, addr, req).await)
        }
        (Method::GET, "/api/chatbot/conversations") => {
            respond(routes::chatbot::list_conversations(state, &req).await)
        }
        (Method::GET, "/api/chatbot/conversations/stats") => {
            respond(routes::chatbot::conversation_stats(state).await)
        }
        (Method::GET, "/api/chatbot/conversations/search") => {
            respond(routes::chatbot::search_conversations(state, &req).await)
        }
        (Method::GET, "/api/chatbot/conversations/export") => {
            respond(routes::chatbot::export_conversations(state).await)
        }
        (Method::PUT, p) if p.starts_with("/api/chatbot/conversations/") => {
            let id = path
                .strip_prefix("/api/chatbot/conversations/")
                .unwrap_or("")
                .to_string();
            respond(routes::chatbot::update_conversation(state, &id, req).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/chatbot/conversations/") => {
            let id = p.strip_prefix("/api/chatbot/conversations/").unwrap_or("");
            respond(routes::chatbot::delete_conversation(state, id).await)
        }

        // Projects and ratings
        (Method::GET, "/api/projects") => respond(routes::projects::list(state).await),
        (Method::POST, "/api/projects") => respond(routes::projects::create(state, req).await),
        (Method::POST, p) if p.starts_with("/api/projects/") && p.ends_with("/rate") => {
            let id = path
                .strip_prefix("/api/projects/")
                .and_then(|s| s.strip_suffix("/rate"))
                .unwrap_or("")
                .to_string();
            respond(routes::projects::rate(state, &id, addr, req).await)
        }
        (Method::GET, p) if p.starts_with("/api/projects/") && p.ends_with("/ratings") => {
            let id = p
                .strip_prefix("/api/projects/")
                .and_then(|s| s.strip_suffix("/ratings"))
                .unwrap_or("");
            respond(routes::projects::ratings(state, id).await)
        }
        (Method::PUT, p) if p.starts_with("/api/projects/") => {
            let id = path
                .strip_prefix("/api/projects/")
                .unwrap_or("")
                .to_string();
            respond(routes::projects::update(state, &id, req).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/projects/") => {
            let id = p.strip_prefix("/api/projects/").unwrap_or("");
            respond(routes::projects::delete(state, id).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/ratings/") => {
            let id = p.strip_prefix("/api/ratings/").unwrap_or("");
            respond(routes::projects::delete_rating(state, id).await)
        }

        // Contact messages
        (Method::POST, "/api/contact/messages") => {
            respond(routes::intake::submit_message(state, req).await)
        }
        (Method::GET, "/api/contact/messages") => {
            respond(routes::intake::list_messages(state).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/contact/messages/") => {
            let id = p.strip_prefix("/api/contact/messages/").unwrap_or("");
            respond(routes::intake::delete_message(state, id).await)
        }

        // Job applications
        (Method::POST, "/api/join/applications") => {
            respond(routes::intake::submit_application(state, req).await)
        }
        (Method::GET, "/api/join/applications") => {
            respond(routes::intake::list_applications(state).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/join/applications/") => {
            let id = p.strip_prefix("/api/join/applications/").unwrap_or("");
            respond(routes::intake::delete_application(state, id).await)
        }

        // Project submissions
        (Method::POST, "/api/join/project-submissions") => {
            respond(routes::intake::submit_project(state, req).await)
        }
        (Method::GET, "/api/join/project-submissions") => {
            respond(routes::intake::list_project_submissions(state).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/join/project-submissions/") => {
            let id = p.strip_prefix("/api/join/project-submissions/").unwrap_or("");
            respond(routes::intake::delete_project_submission(state, id).await)
        }

        // Testimonial moderation
        (Method::POST, "/api/testimonials/submit") => {
            respond(routes::testimonials::submit(state, req).await)
        }
        (Method::GET, "/api/testimonials/submissions") => {
            respond(routes::testimonials::list_submissions(state).await)
        }
        (Method::PUT, p)
            if p.starts_with("/api/testimonials/submissions/") && p.ends_with("/approve") =>
        {
            let id = p
                .strip_prefix("/api/testimonials/submissions/")
                .and_then(|s| s.strip_suffix("/approve"))
                .unwrap_or("");
            respond(routes::testimonials::approve(state, id).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/testimonials/submissions/") => {
            let id = p.strip_prefix("/api/testimonials/submissions/").unwrap_or("");
            respond(routes::testimonials::delete(state, id).await)
        }

        // Visitor analytics
        (Method::POST, "/api/track-visitor") => {
            respond(routes::visitors::track(state, addr, req).await)
        }
        (Method::POST, "/api/update-session") => {
            respond(routes::visitors::update_session(state, req).await)
        }
        (Method::GET, "/api/visitors") => respond(routes::visitors::list(state, &req).await),
        (Method::GET, "/api/visitors/stats") => respond(routes::visitors::stats(state).await),
        (Method::GET, "/api/visitors/live-stats") => {
            respond(routes::visitors::live_stats(state).await)
        }
        (Method::DELETE, "/api/visitors") => respond(routes::visitors::clear(state).await),
        (Method::DELETE, p) if p.starts_with("/api/visitors/") => {
            let id = p.strip_prefix("/api/visitors/").unwrap_or("");
            respond(routes::visitors::delete(state, id).await)
        }

        // Notifications
        (Method::GET, "/api/notifications") => respond(routes::notifications::list(state).await),
        (Method::GET, "/api/notifications/active") => {
            respond(routes::notifications::active(state).await)
        }
        (Method::POST, "/api/notifications") => {
            respond(routes::notifications::create(state, req).await)
        }
        (Method::PUT, p) if p.starts_with("/api/notifications/") => {
            let id = path
                .strip_prefix("/api/notifications/")
                .unwrap_or("")
                .to_string();
            respond(routes::notifications::update(state, &id, req).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/notifications/") => {
            let id = p.strip_prefix("/api/notifications/").unwrap_or("");
            respond(routes::notifications::delete(state, id).await)
        }

        // SEO pages, then the fixed section route table
        (Method::PUT, p) if p.starts_with("/api/seo/") => {
            let page = path.strip_prefix("/api/seo/").unwrap_or("").to_string();
            respond(routes::sections::put_seo(state, &page, req).await)
        }
        (Method::PUT, p) if Section::from_put_path(p).is_some() => {
            // Guard guarantees the lookup succeeds
            let section = Section::from_put_path(&path).unwrap();
            respond(routes::sections::put_section(state, section, req).await)
        }

        // Not found
        _ => routes::not_found(&path),
    };

    Ok(to_boxed(response))
}

/// Convert a Full<Bytes> body to BoxBody
fn to_boxed(response: Response<Full<Bytes>>) -> Response<BoxBody> {
    response.map(|body| body.map_err(|never| match never {}).boxed())
}
