use crate::engine::assets::point_registry::{PointId, PointRegistry};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::picking::PointClicked;
use crate::tools::point_selection::SelectionState;
use crate::tools::viewport_actions::{ActionSource, ViewportAction, ViewportActionEvent};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Methods of notifications still waiting to be sent.
    #[cfg(test)]
    pub fn queued_notification_methods(&self) -> Vec<&str> {
        self.outgoing_notifications
            .iter()
            .map(|notification| notification.method.as_str())
            .collect()
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

/// Raw message strings posted by the host page, shared with the JS listener.
type InboundQueue = std::sync::Arc<std::sync::Mutex<Vec<String>>>;

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    let inbound = InboundQueue::default();
    let listener_queue = inbound.clone();

    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Ok(data) = event.data().dyn_into::<js_sys::JsString>() else {
            return;
        };
        let message = String::from(data);

        // Cheap filter only; full parsing happens in handle_rpc_messages.
        if !message.contains("jsonrpc") {
            return;
        }
        if let Ok(mut queue) = listener_queue.lock() {
            queue.push(message);
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("No window to attach the RPC listener to");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // The listener lives as long as the page.
    on_message.forget();
    commands.insert_resource(MessageQueue(inbound));
}

#[derive(Resource)]
struct MessageQueue(InboundQueue);

/// One raw message from the host page, not yet parsed.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(message_queue) = message_queue else {
        return;
    };
    let Ok(mut queue) = message_queue.0.lock() else {
        return;
    };

    message_events.write_batch(
        queue
            .drain(..)
            .map(|content| IncomingRpcMessage { content }),
    );
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    progress: Res<LoadingProgress>,
    selection: Res<SelectionState>,
    registry: Res<PointRegistry>,
    mut action_events: EventWriter<ViewportActionEvent>,
    mut click_events: EventWriter<PointClicked>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Dropping malformed RPC message: {}", parse_error);
                continue;
            }
        };

        debug!("Processing RPC method: {}", request.method);

        let context = RpcContext {
            progress: &progress,
            selection: &selection,
            registry: &registry,
        };
        let mut commands = Vec::new();
        let result = dispatch_rpc_method(&request.method, &request.params, &context, &mut commands);

        // Notifications carry no id: their commands still run, but nothing is answered.
        for command in commands {
            match command {
                RpcCommand::Viewport(action) => {
                    action_events.write(ViewportActionEvent {
                        action,
                        source: ActionSource::Rpc,
                    });
                }
                RpcCommand::SelectPoint(point_id) => {
                    click_events.write(PointClicked { point_id });
                }
            }
        }

        if let Some(id) = request.id {
            rpc_interface.queue_response(create_response(id, result));
        } else if let Err(error) = result {
            warn!("RPC notification '{}' failed: {}", request.method, error.message);
        }
    }
}

/// Read-only state an RPC method may inspect.
pub struct RpcContext<'a> {
    pub progress: &'a LoadingProgress,
    pub selection: &'a SelectionState,
    pub registry: &'a PointRegistry,
}

/// Side effects requested by an RPC method, applied as events by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCommand {
    Viewport(ViewportAction),
    SelectPoint(PointId),
}

/// Map a method name onto its result, queuing any commands it triggers.
pub fn dispatch_rpc_method(
    method: &str,
    params: &serde_json::Value,
    context: &RpcContext,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    if let Some(action) = ViewportAction::from_method(method) {
        commands.push(RpcCommand::Viewport(action));
        return Ok(serde_json::json!({
            "success": true,
            "action": action,
        }));
    }

    match method {
        "select_point" => handle_select_point(params, context, commands),
        "get_loading_progress" => Ok(serde_json::json!({
            "total": context.progress.total,
            "dispatched": context.progress.dispatched,
            "succeeded": context.progress.succeeded,
            "failed": context.progress.failed,
            "points_loaded": context.progress.points_loaded,
            "fraction": context.progress.fraction(),
        })),
        "get_selection" => Ok(selection_json(context)),
        _ => {
            warn!("Unknown RPC method: {}", method);
            Err(RpcError::method_not_found(method))
        }
    }
}

/// Handle point selection with parameter validation against the registry.
fn handle_select_point(
    params: &serde_json::Value,
    context: &RpcContext,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectPointParams {
        id: usize,
    }

    let select_params = serde_json::from_value::<SelectPointParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected numeric 'id' parameter"))?;

    let point_id = PointId(select_params.id);
    let point = context
        .registry
        .get(point_id)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown point id: {}", select_params.id)))?;

    commands.push(RpcCommand::SelectPoint(point_id));
    info!("Point selection dispatched: {} '{}'", select_params.id, point.title());

    Ok(serde_json::json!({
        "success": true,
        "id": select_params.id,
    }))
}

fn selection_json(context: &RpcContext) -> serde_json::Value {
    let selected = context.selection.selected();
    serde_json::json!({
        "selected_id": selected.map(PointId::index),
        "zoomed": context.selection.is_zoomed(),
        "title": selected
            .and_then(|id| context.registry.get(id))
            .map(|point| point.title()),
    })
}

fn create_response(
    id: serde_json::Value,
    result: Result<serde_json::Value, RpcError>,
) -> RpcResponse {
    let (result, error) = match result {
        Ok(value) => (Some(value), None),
        Err(error) => (None, Some(error)),
    };
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result,
        error,
        id: Some(id),
    }
}

/// Flush notifications, then responses, to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    let WebRpcInterface {
        outgoing_notifications,
        outgoing_responses,
    } = &mut *rpc_interface;

    for notification in outgoing_notifications.drain(..) {
        post_to_parent(&notification);
    }
    for response in outgoing_responses.drain(..) {
        post_to_parent(&response);
    }
}

#[cfg(target_arch = "wasm32")]
fn post_to_parent<T: Serialize>(message: &T) {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize RPC message: {}", e);
            return;
        }
    };

    let Some(parent) = window().and_then(|window| window.parent().ok().flatten()) else {
        warn!("No parent window to post RPC message to");
        return;
    };
    if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
        error!("Failed to post RPC message: {:?}", e);
    }
}

/// Natively there is no host page; queued messages are dropped.
#[cfg(not(target_arch = "wasm32"))]
fn post_to_parent<T: Serialize>(_message: &T) {}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}
