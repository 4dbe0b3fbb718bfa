//! Designer session
//!
//! One `DesignerSession` per opened designer. It owns the graph, the view
//! state, the open node form and the frame loop, and is discarded on close;
//! nothing survives from one session to the next.

use std::sync::Arc;

use serde_json::Value;

use crate::automation::{AutomationDocument, AutomationMeta, Layout};
use crate::compiler::{from_automation, from_document, to_automation, LoadOutcome};
use crate::config::DesignerConfig;
use crate::constants::geometry::PLACEMENT_CASCADE;
use crate::error::{DesignerError, Result};
use crate::events::{DesignerEvent, EventSink, ToastLevel};
use crate::form::NodeForm;
use crate::geometry::{Point, Size};
use crate::graph::FlowGraph;
use crate::interaction::{InputEvent, Interaction, InteractionEffect};
use crate::registry::NodeTypeRegistry;
use crate::render::{FrameLoop, FrameOutcome, Renderer, Surface};
use crate::store::{AutomationStore, SaveRequest, StoreError};
use crate::types::NodeId;
use crate::validation::{validate_graph, ValidationIssue};
use crate::view::{DragState, ViewState};

/// Click-to-place cascades through this many offsets before wrapping
const CASCADE_STEPS: usize = 5;

/// An open designer
pub struct DesignerSession {
    session_id: String,
    registry: Arc<NodeTypeRegistry>,
    config: DesignerConfig,
    events: Arc<dyn EventSink>,
    graph: FlowGraph,
    view: ViewState,
    form: Option<NodeForm>,
    frame_loop: FrameLoop,
    automation_id: Option<String>,
    meta: AutomationMeta,
}

impl DesignerSession {
    /// Open an empty designer
    pub fn new(
        registry: Arc<NodeTypeRegistry>,
        config: DesignerConfig,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self::build(
            registry,
            config,
            events,
            LoadOutcome {
                id: None,
                meta: AutomationMeta::default(),
                graph: FlowGraph::new(),
                rules: Default::default(),
                warnings: Vec::new(),
            },
        )
    }

    /// Open a designer on a stored automation
    pub fn open(
        registry: Arc<NodeTypeRegistry>,
        config: DesignerConfig,
        events: Arc<dyn EventSink>,
        document: &AutomationDocument,
    ) -> Self {
        let outcome = from_document(document, &registry);
        Self::build(registry, config, events, outcome)
    }

    /// Open a designer on a raw stored payload; bad input degrades with toasts
    pub fn open_payload(
        registry: Arc<NodeTypeRegistry>,
        config: DesignerConfig,
        events: Arc<dyn EventSink>,
        payload: &Value,
    ) -> Self {
        let outcome = from_automation(payload, &registry);
        Self::build(registry, config, events, outcome)
    }

    fn build(
        registry: Arc<NodeTypeRegistry>,
        config: DesignerConfig,
        events: Arc<dyn EventSink>,
        outcome: LoadOutcome,
    ) -> Self {
        let config_problem = config.validate().err();
        let config = if config_problem.is_some() {
            DesignerConfig::default()
        } else {
            config
        };
        let session = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            registry,
            config,
            events,
            graph: outcome.graph,
            view: ViewState::default(),
            form: None,
            frame_loop: FrameLoop::new(),
            automation_id: outcome.id,
            meta: outcome.meta,
        };
        log::info!(
            "Designer session {} opened ({} nodes)",
            session.session_id,
            session.graph.node_count()
        );
        session.emit(DesignerEvent::SessionOpened {
            session_id: session.session_id.clone(),
            automation_id: session.automation_id.clone(),
        });
        if let Some(e) = config_problem {
            let message = format!("{}; using default designer settings", e);
            log::warn!("{}", message);
            session.toast(ToastLevel::Warning, message);
        }
        for warning in outcome.warnings {
            session.toast(ToastLevel::Warning, warning);
        }
        session
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn automation_id(&self) -> Option<&str> {
        self.automation_id.as_deref()
    }

    pub fn meta(&self) -> &AutomationMeta {
        &self.meta
    }

    /// Update name, description and enabled flag
    pub fn set_meta(&mut self, meta: AutomationMeta) {
        self.meta = meta;
    }

    pub fn is_open(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Host surface was resized
    pub fn resize(&mut self, size: Size) {
        self.view.surface_size = size;
        self.frame_loop.request_redraw();
    }

    /// Route one input event through the interaction engine
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<InteractionEffect> {
        if !self.is_open() {
            return Vec::new();
        }
        let (zoom, pan) = (self.view.zoom, self.view.pan);
        let effects = Interaction {
            graph: &mut self.graph,
            view: &mut self.view,
            registry: &self.registry,
            config: &self.config,
        }
        .handle(event);

        for effect in &effects {
            self.apply_effect(effect);
        }
        if self.view.zoom != zoom || self.view.pan != pan {
            self.emit_view_changed();
        }
        if !effects.is_empty() || self.view.drag != DragState::Idle {
            self.frame_loop.request_redraw();
        }
        effects
    }

    fn apply_effect(&mut self, effect: &InteractionEffect) {
        match effect {
            InteractionEffect::NodeDeleted {
                node_id,
                connections_removed,
            } => {
                if self.form.as_ref().map(NodeForm::node_id) == Some(*node_id) {
                    log::debug!("Form for {} closed with its node", node_id);
                    self.form = None;
                }
                self.emit(DesignerEvent::NodeDeleted {
                    session_id: self.session_id.clone(),
                    node_id: *node_id,
                    connections_removed: *connections_removed,
                });
            }
            InteractionEffect::ConnectionAdded(connection_id) => {
                self.emit(DesignerEvent::ConnectionAdded {
                    session_id: self.session_id.clone(),
                    connection_id: *connection_id,
                })
            }
            InteractionEffect::ConnectionDeleted(connection_id) => {
                self.emit(DesignerEvent::ConnectionDeleted {
                    session_id: self.session_id.clone(),
                    connection_id: *connection_id,
                })
            }
            InteractionEffect::ConnectionRejected(error) => {
                self.emit(DesignerEvent::ConnectionRejected {
                    session_id: self.session_id.clone(),
                    reason: error.to_string(),
                });
                self.toast(ToastLevel::Warning, error.to_string());
            }
            InteractionEffect::OpenForm(node_id) => {
                self.open_form(*node_id);
            }
            InteractionEffect::NodeMoved(_)
            | InteractionEffect::SelectionChanged
            | InteractionEffect::ViewChanged => {}
        }
    }

    /// Drop a palette entry at a screen position
    pub fn drop_palette_item(&mut self, type_id: &str, screen: Point) -> Option<NodeId> {
        let position = self.view.screen_to_graph(screen);
        self.add_node_at(type_id, position)
    }

    /// Place a node at the viewport centre, cascading so repeated clicks
    /// do not stack exactly
    pub fn place_node(&mut self, type_id: &str) -> Option<NodeId> {
        let center = self.view.screen_to_graph(self.view.viewport_center());
        let cascade = PLACEMENT_CASCADE * (self.graph.node_count() % CASCADE_STEPS) as f64;
        let position = center.offset(
            cascade - self.config.node_width / 2.0,
            cascade - self.config.node_height / 2.0,
        );
        self.add_node_at(type_id, position)
    }

    fn add_node_at(&mut self, type_id: &str, position: Point) -> Option<NodeId> {
        if !self.is_open() {
            return None;
        }
        match self.graph.add_node(&self.registry, type_id, position) {
            Ok(node_id) => {
                self.emit(DesignerEvent::NodeAdded {
                    session_id: self.session_id.clone(),
                    node_id,
                    type_id: type_id.to_string(),
                });
                self.frame_loop.request_redraw();
                Some(node_id)
            }
            Err(e) => {
                log::warn!("Node not added: {}", e);
                self.toast(ToastLevel::Warning, e.to_string());
                None
            }
        }
    }

    /// Remove every node and connection
    pub fn clear(&mut self) {
        let removed = self.graph.node_count();
        self.graph.clear();
        self.view.clear_selection();
        self.view.drag = DragState::Idle;
        self.form = None;
        log::debug!("Canvas cleared ({} nodes)", removed);
        self.frame_loop.request_redraw();
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / self.config.zoom_step);
    }

    fn zoom_by(&mut self, factor: f64) {
        let center = self.view.viewport_center();
        if self
            .view
            .zoom_at(center, factor, self.config.zoom_min, self.config.zoom_max)
        {
            self.emit_view_changed();
            self.frame_loop.request_redraw();
        }
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.emit_view_changed();
        self.frame_loop.request_redraw();
    }

    /// Open the field-editing form for a node, replacing any open form
    pub fn open_form(&mut self, node_id: NodeId) -> bool {
        match NodeForm::open(&self.graph, node_id) {
            Ok(form) => {
                self.form = Some(form);
                true
            }
            Err(e) => {
                self.toast(ToastLevel::Warning, e.to_string());
                false
            }
        }
    }

    pub fn form(&self) -> Option<&NodeForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut NodeForm> {
        self.form.as_mut()
    }

    /// Apply the open form. On an invalid edit nothing is applied, an error
    /// toast is raised and the form stays open.
    pub fn commit_form(&mut self) -> bool {
        let Some(form) = self.form.take() else {
            return false;
        };
        let node_id = form.node_id();
        match form.clone().commit(&mut self.graph) {
            Ok(_) => {
                self.emit(DesignerEvent::NodeConfigUpdated {
                    session_id: self.session_id.clone(),
                    node_id,
                });
                self.frame_loop.request_redraw();
                true
            }
            Err(e) => {
                self.toast(ToastLevel::Error, format!("Changes not applied: {}", e));
                self.form = Some(form);
                false
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Advisory issues for the current graph
    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate_graph(&self.graph, &self.registry)
    }

    /// The document a save would write
    pub fn document(&self) -> AutomationDocument {
        AutomationDocument {
            id: self.automation_id.clone(),
            meta: self.meta.clone(),
            rules: to_automation(&self.graph),
            layout: Some(Layout::capture(&self.graph)),
        }
    }

    /// Paint one frame. Returns `Stopped` once the session is closed.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameOutcome {
        if !self.frame_loop.is_running() {
            return FrameOutcome::Stopped;
        }
        self.paint(surface);
        self.frame_loop.tick()
    }

    /// Paint immediately if a mutation asked for it
    pub fn paint_if_requested<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.frame_loop.take_redraw_request() {
            self.paint(surface);
            true
        } else {
            false
        }
    }

    fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        Renderer {
            graph: &self.graph,
            registry: &self.registry,
            view: &self.view,
            config: &self.config,
        }
        .draw(surface);
    }

    /// Snapshot a save. Validation issues are shown as warnings only.
    pub fn prepare_save(&mut self) -> Result<SaveRequest> {
        if !self.is_open() {
            return Err(DesignerError::SessionClosed);
        }
        for issue in self.validate() {
            self.toast(ToastLevel::Warning, issue.to_string());
        }
        self.emit(DesignerEvent::SaveStarted {
            session_id: self.session_id.clone(),
        });
        Ok(SaveRequest {
            document: self.document(),
        })
    }

    /// Take the store's answer. Success closes the session; failure leaves
    /// everything as it was so the user can retry.
    pub fn finish_save(&mut self, result: std::result::Result<String, StoreError>) -> bool {
        match result {
            Ok(automation_id) => {
                log::info!("Automation {} saved", automation_id);
                self.automation_id = Some(automation_id.clone());
                self.emit(DesignerEvent::Saved {
                    session_id: self.session_id.clone(),
                    automation_id,
                });
                self.toast(ToastLevel::Info, "Automation saved");
                self.close();
                true
            }
            Err(e) => {
                log::warn!("Save failed: {}", e);
                self.emit(DesignerEvent::SaveFailed {
                    session_id: self.session_id.clone(),
                    error: e.to_string(),
                });
                self.toast(ToastLevel::Error, format!("Save failed: {}", e));
                false
            }
        }
    }

    /// Prepare, store and finish in one call
    pub async fn save(&mut self, store: &dyn AutomationStore) -> Result<bool> {
        let request = self.prepare_save()?;
        let result = store.save(&request).await;
        Ok(self.finish_save(result))
    }

    /// Tear down: stop the frame loop and drop transient state
    pub fn close(&mut self) {
        if !self.frame_loop.is_running() {
            return;
        }
        self.frame_loop.stop();
        self.view.drag = DragState::Idle;
        self.form = None;
        log::info!("Designer session {} closed", self.session_id);
        self.emit(DesignerEvent::SessionClosed {
            session_id: self.session_id.clone(),
        });
    }

    fn emit_view_changed(&self) {
        self.emit(DesignerEvent::ViewChanged {
            session_id: self.session_id.clone(),
            zoom: self.view.zoom,
            pan: self.view.pan,
        });
    }

    fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        self.emit(DesignerEvent::toast(&self.session_id, level, message));
    }

    fn emit(&self, event: DesignerEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Dropped designer event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RuleSet;
    use crate::descriptor::PortDirection;
    use crate::events::VecEventSink;
    use crate::interaction::{Key, PointerButton};
    use crate::node_config::FieldValue;
    use crate::render::RecordingSurface;
    use crate::store::MemoryAutomationStore;
    use serde_json::json;

    fn session() -> (DesignerSession, Arc<VecEventSink>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let sink = Arc::new(VecEventSink::new());
        let session = DesignerSession::new(
            Arc::new(NodeTypeRegistry::with_builtins()),
            DesignerConfig::default(),
            sink.clone(),
        );
        (session, sink)
    }

    fn port_on_screen(
        session: &DesignerSession,
        node: NodeId,
        direction: PortDirection,
        index: usize,
    ) -> Point {
        let graph_point = session
            .graph()
            .port_position(session.registry(), node, direction, index)
            .unwrap();
        session.view().graph_to_screen(graph_point)
    }

    fn click(session: &mut DesignerSession, at: Point) {
        session.handle_input(InputEvent::PointerDown {
            position: at,
            button: PointerButton::Primary,
        });
        session.handle_input(InputEvent::PointerUp {
            position: at,
            button: PointerButton::Primary,
        });
    }

    fn drag(session: &mut DesignerSession, from: Point, to: Point) {
        session.handle_input(InputEvent::PointerDown {
            position: from,
            button: PointerButton::Primary,
        });
        session.handle_input(InputEvent::PointerMove { position: to });
        session.handle_input(InputEvent::PointerUp {
            position: to,
            button: PointerButton::Primary,
        });
    }

    fn configure(session: &mut DesignerSession, node: NodeId, edits: &[(&str, &str)]) {
        assert!(session.open_form(node));
        let form = session.form_mut().unwrap();
        for (name, raw) in edits {
            form.set_input(name, raw).unwrap();
        }
        assert!(session.commit_form());
    }

    #[test]
    fn test_delete_connected_node_through_input() {
        let (mut session, sink) = session();
        let a = session
            .drop_palette_item("timeTrigger", Point::new(50.0, 50.0))
            .unwrap();
        let b = session
            .drop_palette_item("sceneAction", Point::new(400.0, 50.0))
            .unwrap();
        configure(&mut session, b, &[("scene", "movie")]);
        let b_config = session.graph().node(b).unwrap().config.clone();

        let from = port_on_screen(&session, a, PortDirection::Output, 0);
        let to = port_on_screen(&session, b, PortDirection::Input, 0);
        drag(&mut session, from, to);
        assert_eq!(session.graph().connections().len(), 1);

        let a_center = session
            .view()
            .graph_to_screen(session.graph().node(a).unwrap().bounds().center());
        click(&mut session, a_center);
        assert_eq!(session.view().selected_node, Some(a));
        session.handle_input(InputEvent::Key { key: Key::Delete });

        assert!(session.graph().node(a).is_none());
        assert!(session.graph().connections().is_empty());
        assert_eq!(session.graph().node(b).unwrap().config, b_config);
        assert!(sink.events().contains(&DesignerEvent::NodeDeleted {
            session_id: session.session_id().to_string(),
            node_id: a,
            connections_removed: 1,
        }));
    }

    #[test]
    fn test_rejected_connection_raises_toast() {
        let (mut session, sink) = session();
        let c = session
            .drop_palette_item("timeCondition", Point::new(100.0, 100.0))
            .unwrap();
        let from = port_on_screen(&session, c, PortDirection::Output, 0);
        let to = port_on_screen(&session, c, PortDirection::Input, 0);
        drag(&mut session, from, to);

        assert!(session.graph().connections().is_empty());
        assert_eq!(sink.toasts(ToastLevel::Warning).len(), 1);
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DesignerEvent::ConnectionRejected { .. })));
    }

    #[test]
    fn test_unknown_palette_type_is_a_toast() {
        let (mut session, sink) = session();
        assert!(session.place_node("warpDrive").is_none());
        assert!(session.graph().is_empty());
        assert_eq!(
            sink.toasts(ToastLevel::Warning),
            vec!["Unknown node type: warpDrive".to_string()]
        );
    }

    #[test]
    fn test_place_node_cascades_from_center() {
        let (mut session, _) = session();
        let first = session.place_node("timeTrigger").unwrap();
        let second = session.place_node("timeTrigger").unwrap();
        let p1 = session.graph().node(first).unwrap().position;
        let p2 = session.graph().node(second).unwrap().position;
        assert_eq!(p1, Point::new(400.0 - 90.0, 300.0 - 40.0));
        assert_eq!(p2, p1.offset(PLACEMENT_CASCADE, PLACEMENT_CASCADE));
    }

    #[test]
    fn test_drop_respects_pan_and_zoom() {
        let (mut session, _) = session();
        session.zoom_in();
        let zoom = session.view().zoom;
        let screen = Point::new(500.0, 200.0);
        let expected = session.view().screen_to_graph(screen);
        let id = session.drop_palette_item("orGate", screen).unwrap();
        assert_eq!(session.graph().node(id).unwrap().position, expected);
        assert!(zoom > 1.0);
    }

    #[test]
    fn test_double_click_opens_form_and_delete_closes_it() {
        let (mut session, _) = session();
        let id = session
            .drop_palette_item("notificationAction", Point::new(100.0, 100.0))
            .unwrap();
        let center = session
            .view()
            .graph_to_screen(session.graph().node(id).unwrap().bounds().center());
        session.handle_input(InputEvent::DoubleClick { position: center });
        assert_eq!(session.form().map(NodeForm::node_id), Some(id));

        session.handle_input(InputEvent::ContextMenu { position: center });
        assert!(session.graph().is_empty());
        assert!(session.form().is_none());
    }

    #[test]
    fn test_invalid_form_commit_applies_nothing() {
        let (mut session, sink) = session();
        let id = session.place_node("delayAction").unwrap();
        let before = session.graph().node(id).unwrap().config.clone();

        session.open_form(id);
        let form = session.form_mut().unwrap();
        form.set("unit", FieldValue::Text("minutes".into())).unwrap();
        form.set_input("delay", "soon").unwrap();
        assert!(!session.commit_form());

        assert_eq!(session.graph().node(id).unwrap().config, before);
        assert!(session.form().is_some());
        assert_eq!(sink.toasts(ToastLevel::Error).len(), 1);

        session.cancel_form();
        assert!(session.form().is_none());
    }

    #[test]
    fn test_frame_paints_until_closed() {
        let (mut session, sink) = session();
        session.place_node("timeTrigger");
        let mut surface = RecordingSurface::new();

        assert!(session.paint_if_requested(&mut surface));
        assert!(!session.paint_if_requested(&mut surface));
        assert_eq!(session.frame(&mut surface), FrameOutcome::Continue);
        assert!(surface.texts().contains(&"Time"));

        session.close();
        surface.take();
        assert_eq!(session.frame(&mut surface), FrameOutcome::Stopped);
        assert!(surface.take().is_empty());
        assert!(session.handle_input(InputEvent::Key { key: Key::Delete }).is_empty());
        assert!(matches!(
            sink.events().last(),
            Some(DesignerEvent::SessionClosed { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_compiles_unconnected_nodes() {
        let (mut session, sink) = session();
        let trigger = session.place_node("deviceStateTrigger").unwrap();
        configure(
            &mut session,
            trigger,
            &[("device", "light.kitchen"), ("attribute", "state"), ("to", "on")],
        );
        let action = session.place_node("deviceAction").unwrap();
        configure(
            &mut session,
            action,
            &[("device", "light.hall"), ("command", "turn_on")],
        );
        session.set_meta(AutomationMeta {
            name: "Kitchen follows hall".into(),
            description: String::new(),
            enabled: true,
        });

        let store = MemoryAutomationStore::new();
        assert!(session.save(&store).await.unwrap());

        let id = session.automation_id().unwrap().to_string();
        let stored = store.fetch(&id).await.unwrap();
        assert_eq!(
            stored["triggers"],
            json!([{"type": "device_state", "device_id": "light.kitchen", "attribute": "state", "to": "on"}])
        );
        assert_eq!(stored["conditions"], json!([]));
        assert_eq!(
            stored["actions"],
            json!([{"type": "device_command", "device_id": "light.hall", "command": "turn_on"}])
        );
        assert_eq!(stored["name"], "Kitchen follows hall");
        assert_eq!(stored["layout"]["nodes"].as_array().unwrap().len(), 2);

        assert!(!session.is_open());
        assert!(sink.events().contains(&DesignerEvent::Saved {
            session_id: session.session_id().to_string(),
            automation_id: id,
        }));
        assert!(matches!(
            session.prepare_save(),
            Err(DesignerError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_graph_untouched() {
        let (mut session, sink) = session();
        let a = session
            .drop_palette_item("timeTrigger", Point::new(40.0, 40.0))
            .unwrap();
        let b = session
            .drop_palette_item("andGate", Point::new(300.0, 40.0))
            .unwrap();
        session
            .drop_palette_item("sceneAction", Point::new(560.0, 40.0))
            .unwrap();
        let from = port_on_screen(&session, a, PortDirection::Output, 0);
        let to = port_on_screen(&session, b, PortDirection::Input, 1);
        drag(&mut session, from, to);
        let before = session.graph().clone();

        let store = MemoryAutomationStore::new();
        store
            .fail_next_save(StoreError::Unavailable("connection refused".into()))
            .await;
        assert!(!session.save(&store).await.unwrap());

        assert!(session.is_open());
        assert_eq!(session.graph(), &before);
        assert!(session.automation_id().is_none());
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DesignerEvent::SaveFailed { .. })));
        assert_eq!(
            sink.toasts(ToastLevel::Error),
            vec!["Save failed: Store unavailable: connection refused".to_string()]
        );

        // retry without losing anything
        assert!(session.save(&store).await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_open_stored_document_round_trips() {
        let (mut first, _) = session();
        let t = first
            .drop_palette_item("stateChangeTrigger", Point::new(40.0, 200.0))
            .unwrap();
        let gate = first
            .drop_palette_item("notGate", Point::new(320.0, 200.0))
            .unwrap();
        let from = port_on_screen(&first, t, PortDirection::Output, 0);
        let to = port_on_screen(&first, gate, PortDirection::Input, 0);
        drag(&mut first, from, to);
        let document = first.document();

        let sink = Arc::new(VecEventSink::new());
        let reopened = DesignerSession::open(
            Arc::new(NodeTypeRegistry::with_builtins()),
            DesignerConfig::default(),
            sink.clone(),
            &document,
        );
        assert_eq!(reopened.graph(), first.graph());
        assert!(sink.toasts(ToastLevel::Warning).is_empty());
        assert_ne!(reopened.session_id(), first.session_id());
    }

    #[test]
    fn test_open_malformed_payload_warns() {
        let sink = Arc::new(VecEventSink::new());
        let session = DesignerSession::open_payload(
            Arc::new(NodeTypeRegistry::with_builtins()),
            DesignerConfig::default(),
            sink.clone(),
            &json!([1, 2, 3]),
        );
        assert!(session.graph().is_empty());
        assert!(session.is_open());
        assert_eq!(sink.toasts(ToastLevel::Warning).len(), 1);
    }

    #[test]
    fn test_unusable_config_falls_back_to_defaults() {
        let sink = Arc::new(VecEventSink::new());
        let mut session = DesignerSession::new(
            Arc::new(NodeTypeRegistry::with_builtins()),
            DesignerConfig {
                zoom_min: 3.0,
                zoom_max: 1.0,
                grid_size: 0.0,
                ..Default::default()
            },
            sink.clone(),
        );
        assert_eq!(session.config(), &DesignerConfig::default());
        assert_eq!(sink.toasts(ToastLevel::Warning).len(), 1);

        session.handle_input(InputEvent::Wheel {
            position: Point::new(100.0, 100.0),
            delta_y: -1.0,
        });
        assert!(session.view().zoom > 1.0);
        let mut surface = RecordingSurface::new();
        assert_eq!(session.frame(&mut surface), FrameOutcome::Continue);
    }

    #[test]
    fn test_toolbar_zoom_and_reset() {
        let (mut session, sink) = session();
        for _ in 0..10 {
            session.zoom_in();
        }
        assert_eq!(session.view().zoom, 2.0);
        session.reset_view();
        assert_eq!(session.view().zoom, 1.0);
        assert_eq!(session.view().pan, Point::default());
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DesignerEvent::ViewChanged { .. })));

        session.place_node("timeTrigger");
        session.clear();
        assert!(session.graph().is_empty());
        assert_eq!(to_automation(session.graph()), RuleSet::default());
    }
}
