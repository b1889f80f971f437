//! Remote rendering: components become create/update/action records on the
//! outbound queue, and their `on:*` listeners become entries in the handler
//! table.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::connection::{ConnectionState, RemoteListener};
use super::handlers::HandlerTable;
use super::kind::RemoteKind;
use super::protocol::{correlation_key, InboundEvent, OutboundMessage};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::render::{
    expect_listener, AttrValue, Backend, Component, ComponentId, IdGenerator, Mount, Renderer,
    EVENT_PREFIX,
};

/// What a mounted remote component remembers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteHandle {
    scope: Option<ComponentId>,
}

impl RemoteHandle {
    /// The dialog that children of this component are created in.
    pub fn scope(&self) -> Option<ComponentId> {
        self.scope
    }
}

/// Shared state of a [`RemoteRenderer`]: the outbound queue, the handler
/// table, and the connection state.
pub struct RemoteBackend {
    ids: IdGenerator,
    outbound: mpsc::UnboundedSender<String>,
    handlers: Arc<HandlerTable>,
    state: watch::Receiver<ConnectionState>,
    accept_task: Option<JoinHandle<()>>,
}

impl RemoteBackend {
    pub(crate) fn new(
        outbound: mpsc::UnboundedSender<String>,
        handlers: Arc<HandlerTable>,
        state: watch::Receiver<ConnectionState>,
        accept_task: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            ids: IdGenerator::new(),
            outbound,
            handlers,
            state,
            accept_task,
        }
    }

    /// Serialize and enqueue one record.
    fn send(&self, message: &OutboundMessage) -> Result<()> {
        let frame = message.encode()?;
        trace!(%frame, "enqueue");
        self.outbound.send(frame).map_err(|_| Error::QueueClosed)
    }

    fn register_listener(&self, id: ComponentId, key: &str, value: &AttrValue) -> bool {
        match key.strip_prefix(EVENT_PREFIX) {
            Some(event) => {
                self.handlers
                    .register(correlation_key(id, event), expect_listener(key, value));
                true
            }
            None => false,
        }
    }

    /// Emit `component` and its subtree in pre-order: create, then the
    /// follow-up action, then each child.
    ///
    /// # Panics
    ///
    /// Panics if a component's kind is not a [`RemoteKind`].
    fn create_element(
        self: &Arc<Self>,
        component: &Component<RemoteBackend>,
        scope: Option<ComponentId>,
    ) -> Result<()> {
        let Some(kind) = RemoteKind::from_name(component.name()) else {
            panic!(
                "component kind `{}` is not implemented by the remote backend",
                component.name()
            );
        };
        let id = component.id();
        let (attributes, children) = component.snapshot();

        // Handlers go in before the peer can learn the id.
        for (key, value) in &attributes {
            self.register_listener(id, key, value);
        }

        self.send(&OutboundMessage::create(
            id,
            kind,
            kind.create_payload(&attributes, scope),
        ))?;
        if let Some(action) = kind.follow_up_action() {
            self.send(&OutboundMessage::action(id, kind, action))?;
        }

        let child_scope = if kind.opens_scope() { Some(id) } else { scope };
        component.mount(Mount {
            renderer: Arc::downgrade(self),
            handle: RemoteHandle { scope: child_scope },
        });

        for child in &children {
            self.create_element(child, child_scope)?;
        }
        Ok(())
    }
}

impl Backend for RemoteBackend {
    type Handle = RemoteHandle;

    /// Forward a change on a mounted component.
    ///
    /// `on:*` keys replace the registered handler and send nothing. Kinds
    /// without update support, and unknown kinds, drop the change.
    fn update_attribute(
        &self,
        component: &Component<Self>,
        _handle: &RemoteHandle,
        key: &str,
        value: &AttrValue,
    ) -> Result<()> {
        let Some(kind) = RemoteKind::from_name(component.name()) else {
            trace!(name = component.name(), key, "update for unknown kind dropped");
            return Ok(());
        };

        if self.register_listener(component.id(), key, value) {
            return Ok(());
        }

        if !kind.accepts_updates() {
            trace!(kind = kind.as_str(), key, "kind takes no updates");
            return Ok(());
        }

        let Some(value) = value.to_json() else {
            debug!(id = %component.id(), key, "callback attribute is not sent");
            return Ok(());
        };
        self.send(&OutboundMessage::update(component.id(), kind, key, value))
    }
}

impl Drop for RemoteBackend {
    fn drop(&mut self) {
        if let Some(accept_task) = self.accept_task.take() {
            accept_task.abort();
        }
    }
}

/// Mirrors a component tree to a single remote peer over a WebSocket.
///
/// # Example
///
/// ```rust,ignore
/// let renderer = RemoteRenderer::bind(RemoteConfig::default()).await?;
///
/// let dialog = renderer.new_component("dialog");
/// dialog.set_attribute("title", "Counter")?;
///
/// let button = renderer.new_component("button");
/// button.set_attribute("text", "0")?;
/// button.set_attribute("on:click", Callback::new(move || counter.set_with(|n| n + 1)))?;
/// dialog.add_child(&button);
///
/// renderer.render(&[dialog])?;
/// ```
#[derive(Clone)]
pub struct RemoteRenderer {
    backend: Arc<RemoteBackend>,
}

impl RemoteRenderer {
    /// Listen on `config.bind_addr` and wait for the first peer.
    ///
    /// Fails with [`Error::ConnectTimeout`] if no peer completes the
    /// WebSocket handshake within `config.connect_timeout`.
    pub async fn bind(config: RemoteConfig) -> Result<Self> {
        RemoteListener::bind(config).await?.wait_for_peer().await
    }

    /// [`RemoteRenderer::bind`] for synchronous callers.
    ///
    /// Blocks the calling thread. Must not be called from within an async
    /// context.
    pub fn bind_blocking(runtime: &Handle, config: RemoteConfig) -> Result<Self> {
        runtime.block_on(Self::bind(config))
    }

    pub(crate) fn from_backend(backend: Arc<RemoteBackend>) -> Self {
        Self { backend }
    }

    pub fn state(&self) -> ConnectionState {
        *self.backend.state.borrow()
    }

    /// Resolves once the connection has closed.
    pub async fn closed(&self) {
        let mut state = self.backend.state.clone();
        // An Err means the accept loop is gone, which also means closed.
        let _ = state.wait_for(|s| *s == ConnectionState::Closed).await;
    }

    /// Whether a handler is registered under `"{id}:{event}"`.
    pub fn has_handler(&self, id: ComponentId, event: &str) -> bool {
        self.backend.handlers.contains(&correlation_key(id, event))
    }

    /// Run the handler for `event` as if the peer had sent it.
    pub fn dispatch(&self, event: &InboundEvent) -> bool {
        self.backend.handlers.dispatch(event)
    }
}

impl Renderer for RemoteRenderer {
    type Backend = RemoteBackend;

    fn new_component(&self, name: &str) -> Component<RemoteBackend> {
        Component::new(self.backend.ids.next_id(), name)
    }

    /// # Panics
    ///
    /// Panics if any component in the trees has an unknown kind or an
    /// `on:*` attribute that is not a callback.
    fn render(&self, roots: &[Component<RemoteBackend>]) -> Result<()> {
        for root in roots {
            self.backend.create_element(root, None)?;
        }
        Ok(())
    }

    /// The peer has no move operation, so appending a child that is already
    /// mounted only updates the local tree.
    fn append(
        &self,
        parent: &Component<RemoteBackend>,
        child: &Component<RemoteBackend>,
    ) -> Result<()> {
        let handle = parent.handle().ok_or(Error::NotMounted(parent.id()))?;
        parent.add_child(child);

        if child.is_mounted() {
            return Ok(());
        }
        self.backend.create_element(child, handle.scope)
    }
}
