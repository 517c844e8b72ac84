use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::activity::Activity;
use crate::bot::{ActivitySink, Bot, BufferedSink};
use crate::config::Config;
use crate::db::Db;

#[derive(Clone)]
struct AppState {
    bot: Arc<Bot>,
    db: Arc<Db>,
    connector: Arc<dyn ActivitySink>,
}

#[derive(Serialize)]
struct ModuleInfo<'a> {
    name: &'a str,
    description: &'a str,
    commands: &'a [&'a str],
}

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: &'a str,
    bot: &'a str,
    modules: Vec<ModuleInfo<'a>>,
}

#[derive(Serialize)]
struct ExpectedReplies {
    activities: Vec<Activity>,
}

pub struct Server {
    config: Arc<Config>,
    db: Arc<Db>,
    bot: Arc<Bot>,
    connector: Arc<dyn ActivitySink>,
}

impl Server {
    pub fn new(
        config: Arc<Config>,
        db: Arc<Db>,
        bot: Arc<Bot>,
        connector: Arc<dyn ActivitySink>,
    ) -> Self {
        Self {
            config,
            db,
            bot,
            connector,
        }
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            bot: self.bot.clone(),
            db: self.db.clone(),
            connector: self.connector.clone(),
        };

        Router::new()
            .route("/api/messages", post(handle_messages))
            .route("/api/health", get(handle_health))
            .route(
                "/api/conversations/{id}/transcript",
                get(handle_transcript),
            )
            .nest_service("/assets", ServeDir::new(&self.config.server.assets_dir))
            .nest_service(
                "/src/assets",
                ServeDir::new(&self.config.server.file_assets_dir),
            )
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bind = &self.config.server.bind_address;
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(bind).await?;
        log::info!("Bot endpoint listening on {}/api/messages", bind);
        log::info!("Asset links use base URL {}", self.config.server.host_url);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

async fn handle_messages(
    State(state): State<AppState>,
    Json(activity): Json<Activity>,
) -> Result<Response, StatusCode> {
    if activity.expects_replies() {
        let sink = BufferedSink::new();
        run_turn(&state.bot, &activity, &sink).await?;
        return Ok(Json(ExpectedReplies {
            activities: sink.take(),
        })
        .into_response());
    }

    run_turn(&state.bot, &activity, state.connector.as_ref()).await?;
    Ok(StatusCode::OK.into_response())
}

async fn run_turn(bot: &Bot, activity: &Activity, sink: &dyn ActivitySink) -> Result<(), StatusCode> {
    bot.on_turn(activity, sink).await.map_err(|e| {
        log::error!(
            "Turn failed for {} activity in {}: {}",
            activity.activity_type.as_str(),
            activity.conversation.id,
            e
        );
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        bot: state.bot.name(),
        modules: state
            .bot
            .registry()
            .all()
            .iter()
            .map(|m| ModuleInfo {
                name: m.name(),
                description: m.description(),
                commands: m.commands(),
            })
            .collect(),
    })
    .into_response()
}

async fn handle_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let records = state.db.get_transcript(&id).map_err(|e| {
        log::error!("Transcript query error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    serde_json::to_value(records).map(Json).map_err(|e| {
        log::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::TranscriptLogger;
    use crate::config::DEFAULT_GREETING;
    use crate::modules::build_registry;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct RejectingSink;

    #[async_trait::async_trait]
    impl ActivitySink for RejectingSink {
        async fn send_activity(
            &self,
            _activity: &Activity,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("no connector in tests".into())
        }
    }

    fn test_server(connector: Arc<dyn ActivitySink>) -> (Server, Arc<Db>) {
        let text = r#"
            [bot]
            name = "TestBot"

            [server]
            host_url = "https://bot.example.com"

            [modules.help]
            enabled = true

            [modules.files]
            enabled = true

            [modules.welcome]
            enabled = true
        "#;
        let config = Arc::new(Config::parse(text, None).unwrap());
        let db = Arc::new(Db::open(std::path::Path::new(":memory:")).unwrap());
        let bot = Bot::new(config.clone(), db.clone(), build_registry(&config))
            .with_middleware(Box::new(TranscriptLogger::new(db.clone())));
        (Server::new(config, db.clone(), Arc::new(bot), connector), db)
    }

    fn post_activity(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn activity_json(text: &str, delivery_mode: &str) -> Value {
        json!({
            "type": "message",
            "id": "in-1",
            "channelId": "test",
            "serviceUrl": "http://localhost:50000",
            "deliveryMode": delivery_mode,
            "from": { "id": "user-1" },
            "recipient": { "id": "bot-1" },
            "conversation": { "id": "conv-1" },
            "text": text
        })
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_expect_replies_returns_activities() {
        let (server, db) = test_server(Arc::new(RejectingSink));
        let resp = server
            .router()
            .oneshot(post_activity(activity_json("تحميل", "expectReplies")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        let activities = body["activities"].as_array().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0]["attachments"].as_array().unwrap().len(), 2);
        assert_eq!(
            activities[0]["attachments"][0]["contentType"],
            "application/octet-stream"
        );
        assert_eq!(activities[0]["replyToId"], "in-1");
        assert!(db.is_welcomed("test/users/user-1").unwrap());
    }

    #[tokio::test]
    async fn test_members_added_expect_replies() {
        let (server, _db) = test_server(Arc::new(RejectingSink));
        let body = json!({
            "type": "conversationUpdate",
            "channelId": "test",
            "deliveryMode": "expectReplies",
            "recipient": { "id": "bot-1" },
            "conversation": { "id": "conv-1" },
            "membersAdded": [{ "id": "bot-1" }, { "id": "user-1" }]
        });
        let resp = server.router().oneshot(post_activity(body)).await.unwrap();
        let body = body_json(resp).await;
        let activities = body["activities"].as_array().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0]["text"], DEFAULT_GREETING);
    }

    #[tokio::test]
    async fn test_connector_failure_is_500() {
        let (server, _db) = test_server(Arc::new(RejectingSink));
        let resp = server
            .router()
            .oneshot(post_activity(activity_json("hello", "normal")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_normal_delivery_uses_connector() {
        let sink = Arc::new(BufferedSink::new());
        let (server, _db) = test_server(sink.clone());
        let resp = server
            .router()
            .oneshot(post_activity(activity_json("مساعدة", "normal")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let sent = sink.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].attachments[0].content_type,
            "application/vnd.microsoft.card.adaptive"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let (server, _db) = test_server(Arc::new(RejectingSink));
        let req = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health() {
        let (server, _db) = test_server(Arc::new(RejectingSink));
        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["bot"], "TestBot");
        let modules = body["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 3);
        assert_eq!(modules[0]["name"], "files");
        assert_eq!(modules[0]["description"], "File download links");
        assert_eq!(modules[0]["commands"][0], "تحميل");
        assert_eq!(modules[1]["name"], "help");
        assert_eq!(modules[1]["description"], "Intro card with the command menu");
        assert_eq!(modules[2]["name"], "welcome");
        assert_eq!(modules[2]["description"], "New member greeting");
        assert!(modules[2]["commands"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_links_resolve() {
        let (server, _db) = test_server(Arc::new(RejectingSink));
        let req = Request::builder()
            .uri("/src/assets/sample.txt")
            .body(Body::empty())
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("sample text file"));
    }

    #[tokio::test]
    async fn test_missing_asset_is_404() {
        let (server, _db) = test_server(Arc::new(RejectingSink));
        let req = Request::builder()
            .uri("/assets/does-not-exist.jpg")
            .body(Body::empty())
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transcript_endpoint() {
        let (server, _db) = test_server(Arc::new(RejectingSink));
        let router = server.router();
        router
            .clone()
            .oneshot(post_activity(activity_json("مساعدة", "expectReplies")))
            .await
            .unwrap();

        let req = Request::builder()
            .uri("/api/conversations/conv-1/transcript")
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["direction"], "in");
        assert_eq!(records[0]["text"], "مساعدة");
        assert_eq!(records[1]["direction"], "out");
    }
}
