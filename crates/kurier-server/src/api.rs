//! HTTP command API.
//!
//! Every command is a GET request with query-string parameters and answers
//! with HTTP 200; success or failure is signaled only by the `Success`
//! field inside the JSON envelope.  Unknown paths get a structured failure
//! envelope rather than a transport error.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, Method, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use kurier_store::constants::MISSING_DEVICE_TEXT;
use kurier_store::{Device, DeviceStore, Message, MessageStore, User, UserStore};

use crate::config::ServerConfig;
use crate::pages;
use crate::params::parse_number;

#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub messages: MessageStore,
    pub devices: DeviceStore,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-auth-token"),
        ]);

    Router::new()
        .route("/", get(index_page))
        .route("/favicon.ico", get(favicon))
        .route("/getAllUsers", get(get_all_users))
        .route("/getMessages", get(get_messages))
        .route("/addUser", get(add_user))
        .route("/sendMessage", get(send_message))
        .route("/deviceGetAll", get(device_get_all))
        .route("/deviceSendCommand", get(device_send_command))
        .route("/deviceGetValue", get(device_get_value))
        .route("/deviceGetText", get(device_get_text))
        .route("/deviceGet", get(device_get))
        .fallback(unknown_command)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Raw query parameters shared by every command.  Each command reads the
/// subset it cares about; everything else stays empty and is ignored.
#[derive(Debug, Default, Deserialize)]
struct CommandQuery {
    #[serde(default)]
    id: String,
    #[serde(default)]
    touserid: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    messagetext: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    text: String,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------
// One struct per response shape the clients expect.  Fields that do not
// apply to a given command stay zero-valued rather than being omitted.

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    #[serde(rename = "Success")]
    success: bool,
    #[serde(rename = "Content")]
    content: String,
}

#[derive(Debug, Serialize)]
struct UsersEnvelope {
    #[serde(rename = "Success")]
    success: bool,
    #[serde(rename = "Content")]
    content: Vec<User>,
}

#[derive(Debug, Serialize)]
struct MessagesEnvelope {
    #[serde(rename = "Success")]
    success: bool,
    #[serde(rename = "Content")]
    content: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct SendMessageEnvelope {
    #[serde(rename = "Success")]
    success: bool,
    #[serde(rename = "Content")]
    content: Message,
    #[serde(rename = "Value")]
    value: i64,
}

#[derive(Debug, Serialize)]
struct DeviceEnvelope {
    #[serde(rename = "Success")]
    success: bool,
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Content")]
    content: String,
    #[serde(rename = "Value")]
    value: i64,
    #[serde(rename = "Text")]
    text: String,
}

#[derive(Debug, Serialize)]
struct DevicesEnvelope {
    #[serde(rename = "Success")]
    success: bool,
    #[serde(rename = "Content")]
    content: Vec<Device>,
}

/// Serialize an envelope into a 200 response, degrading to the literal body
/// `"err"` when the value cannot be encoded.
fn encode<T: Serialize>(envelope: &T) -> Response {
    match serde_json::to_string(envelope) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            warn!(error = %err, "Failed to encode response envelope");
            "err".into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_all_users(
    State(state): State<AppState>,
    Query(query): Query<CommandQuery>,
) -> Response {
    let caller_id = parse_number(&query.id);
    let users = state.users.list_others(caller_id).await;
    debug!(caller_id, count = users.len(), "Listing users");
    encode(&UsersEnvelope {
        success: true,
        content: users,
    })
}

async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<CommandQuery>,
) -> Response {
    let user_id = parse_number(&query.id);
    let to_user_id = parse_number(&query.touserid);
    let messages = state.messages.get_messages(user_id, to_user_id).await;
    debug!(user_id, to_user_id, count = messages.len(), "Fetched conversation");
    encode(&MessagesEnvelope {
        success: true,
        content: messages,
    })
}

async fn add_user(State(state): State<AppState>, Query(query): Query<CommandQuery>) -> Response {
    let user = state.users.get_or_create(&query.username).await;
    encode(&UsersEnvelope {
        success: true,
        content: vec![user],
    })
}

async fn send_message(
    State(state): State<AppState>,
    Query(query): Query<CommandQuery>,
) -> Response {
    let user_id = parse_number(&query.id);
    let to_user_id = parse_number(&query.touserid);
    let message = state
        .messages
        .send(user_id, to_user_id, &query.messagetext)
        .await;
    encode(&SendMessageEnvelope {
        success: true,
        content: message,
        value: 0,
    })
}

async fn device_get_all(State(state): State<AppState>) -> Response {
    let devices = state.devices.list().await;
    debug!(count = devices.len(), "Listing devices");
    encode(&DevicesEnvelope {
        success: true,
        content: devices,
    })
}

async fn device_send_command(
    State(state): State<AppState>,
    Query(query): Query<CommandQuery>,
) -> Response {
    let id = parse_number(&query.id);
    let value = parse_number(&query.value);
    let found = state.devices.set_command(id, value, &query.text).await;
    let content = if found { "Device found" } else { "no device" };
    encode(&DeviceEnvelope {
        success: true,
        id,
        content: content.to_string(),
        value,
        text: query.text,
    })
}

async fn device_get_value(
    State(state): State<AppState>,
    Query(query): Query<CommandQuery>,
) -> Response {
    let id = parse_number(&query.id);
    let (found, device) = state.devices.get_or_insert_on_miss(id).await;
    let content = if found { "OK" } else { "missing" };
    encode(&DeviceEnvelope {
        success: true,
        id,
        content: content.to_string(),
        value: device.value,
        text: String::new(),
    })
}

async fn device_get_text(
    State(state): State<AppState>,
    Query(query): Query<CommandQuery>,
) -> Response {
    let id = parse_number(&query.id);
    let (found, device) = state.devices.get_or_insert_on_miss(id).await;
    let content = if found { "OK" } else { "missing" };
    let text = if found {
        device.text
    } else {
        MISSING_DEVICE_TEXT.to_string()
    };
    encode(&DeviceEnvelope {
        success: true,
        id,
        content: content.to_string(),
        value: 0,
        text,
    })
}

async fn device_get(State(state): State<AppState>, Query(query): Query<CommandQuery>) -> Response {
    let id = parse_number(&query.id);
    let (found, device) = state.devices.get_or_insert_on_miss(id).await;
    let content = if found { "OK" } else { "missing" };
    let text = if found {
        device.text
    } else {
        MISSING_DEVICE_TEXT.to_string()
    };
    encode(&DeviceEnvelope {
        success: true,
        id,
        content: content.to_string(),
        value: device.value,
        text,
    })
}

async fn index_page(State(state): State<AppState>) -> Html<String> {
    match pages::load_index_page(&state.config.index_page_path).await {
        Ok(html) => Html(html),
        Err(err) => {
            warn!(error = %err, "Serving error placeholder for index page");
            Html(pages::PAGE_ERROR_BODY.to_string())
        }
    }
}

// Browsers request this right after the page; answer with an empty body so
// it does not fall through to the unknown-command envelope.
async fn favicon() {}

/// Any path outside the command table: report the failure inside the
/// envelope, never as an HTTP error.
async fn unknown_command(uri: Uri) -> Response {
    let message = format!("no case for this command: {}", uri.path());
    info!(%message);
    encode(&ErrorEnvelope {
        success: false,
        content: message,
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP command server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState {
            users: UserStore::new(),
            messages: MessageStore::new(),
            devices: DeviceStore::new(),
            config: Arc::new(ServerConfig::default()),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_all_users_excludes_caller() {
        let state = test_state();
        state.users.get_or_create("alice").await;

        let response = get_all_users(
            State(state),
            Query(CommandQuery {
                id: "2".to_string(),
                ..Default::default()
            }),
        )
        .await;

        let json = body_json(response).await;
        assert_eq!(json["Success"], true);
        let content = json["Content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["Username"], "Admin");
        assert_eq!(content[0]["ID"], 1);
        assert_eq!(content[0]["IsOnline"], false);
    }

    #[tokio::test]
    async fn test_add_user_returns_single_element_list() {
        let state = test_state();

        let response = add_user(
            State(state.clone()),
            Query(CommandQuery {
                username: "alice".to_string(),
                ..Default::default()
            }),
        )
        .await;

        let json = body_json(response).await;
        assert_eq!(json["Success"], true);
        let content = json["Content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["ID"], 2);

        // Same username, same ID.
        let response = add_user(
            State(state),
            Query(CommandQuery {
                username: "alice".to_string(),
                ..Default::default()
            }),
        )
        .await;
        let json = body_json(response).await;
        assert_eq!(json["Content"][0]["ID"], 2);
    }

    #[tokio::test]
    async fn test_send_message_envelope() {
        let state = test_state();

        let response = send_message(
            State(state),
            Query(CommandQuery {
                id: "4".to_string(),
                touserid: "5".to_string(),
                messagetext: "hello".to_string(),
                ..Default::default()
            }),
        )
        .await;

        let json = body_json(response).await;
        assert_eq!(json["Success"], true);
        assert_eq!(json["Value"], 0);
        assert_eq!(json["Content"]["Text"], "hello");
        assert_eq!(json["Content"]["UserID"], 4);
        assert_eq!(json["Content"]["ToUserID"], 5);
        assert_eq!(json["Content"]["FromMe"], false);
    }

    #[tokio::test]
    async fn test_unparsable_ids_coerce_to_zero() {
        let state = test_state();
        state.users.get_or_create("alice").await;

        let response = get_all_users(
            State(state),
            Query(CommandQuery {
                id: "not-a-number".to_string(),
                ..Default::default()
            }),
        )
        .await;

        // Caller 0 excludes nobody.
        let json = body_json(response).await;
        assert_eq!(json["Content"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_device_get_value_miss_registers_the_device() {
        let state = test_state();

        let response = device_get_value(
            State(state.clone()),
            Query(CommandQuery {
                id: "99".to_string(),
                ..Default::default()
            }),
        )
        .await;

        let json = body_json(response).await;
        assert_eq!(json["Success"], true);
        assert_eq!(json["Content"], "missing");
        assert_eq!(json["ID"], 99);
        assert_eq!(json["Value"], 0);

        let response = device_get_all(State(state)).await;
        let json = body_json(response).await;
        let devices = json["Content"].as_array().unwrap();
        assert!(devices.iter().any(|d| d["ID"] == 99 && d["Value"] == 0));
    }

    #[tokio::test]
    async fn test_device_get_text_miss_placeholder() {
        let state = test_state();

        let response = device_get_text(
            State(state),
            Query(CommandQuery {
                id: "7".to_string(),
                ..Default::default()
            }),
        )
        .await;

        let json = body_json(response).await;
        assert_eq!(json["Content"], "missing");
        assert_eq!(json["Text"], "--");
        assert_eq!(json["Value"], 0);
    }

    #[tokio::test]
    async fn test_device_send_command_round_trip() {
        let state = test_state();

        let response = device_send_command(
            State(state.clone()),
            Query(CommandQuery {
                id: "0".to_string(),
                value: "5".to_string(),
                text: "hi".to_string(),
                ..Default::default()
            }),
        )
        .await;

        let json = body_json(response).await;
        assert_eq!(json["Content"], "Device found");
        assert_eq!(json["Value"], 5);
        assert_eq!(json["Text"], "hi");

        let response = device_get(
            State(state),
            Query(CommandQuery {
                id: "0".to_string(),
                ..Default::default()
            }),
        )
        .await;
        let json = body_json(response).await;
        assert_eq!(json["Content"], "OK");
        assert_eq!(json["Value"], 5);
        assert_eq!(json["Text"], "hi");
    }

    #[tokio::test]
    async fn test_device_send_command_unknown_does_not_insert() {
        let state = test_state();

        let response = device_send_command(
            State(state.clone()),
            Query(CommandQuery {
                id: "99".to_string(),
                value: "5".to_string(),
                text: "hi".to_string(),
                ..Default::default()
            }),
        )
        .await;

        let json = body_json(response).await;
        assert_eq!(json["Content"], "no device");
        assert_eq!(json["ID"], 99);
        assert_eq!(json["Value"], 5);

        let response = device_get_all(State(state)).await;
        let json = body_json(response).await;
        assert!(json["Content"]
            .as_array()
            .unwrap()
            .iter()
            .all(|d| d["ID"] != 99));
    }

    #[tokio::test]
    async fn test_unknown_command_envelope() {
        let response = unknown_command(Uri::from_static("/bogusCommand")).await;

        let json = body_json(response).await;
        assert_eq!(json["Success"], false);
        assert_eq!(json["Content"], "no case for this command: /bogusCommand");
    }

    #[tokio::test]
    async fn test_index_page_missing_file_degrades_to_error_body() {
        let config = ServerConfig {
            index_page_path: std::path::PathBuf::from("/definitely/not/here.html"),
            ..Default::default()
        };
        let state = AppState {
            config: Arc::new(config),
            ..test_state()
        };

        let Html(body) = index_page(State(state)).await;
        assert_eq!(body, "ERROR");
    }

    #[tokio::test]
    async fn test_index_page_serves_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<html>kurier</html>").unwrap();

        let config = ServerConfig {
            index_page_path: path,
            ..Default::default()
        };
        let state = AppState {
            config: Arc::new(config),
            ..test_state()
        };

        let Html(body) = index_page(State(state)).await;
        assert_eq!(body, "<html>kurier</html>");
    }
}
