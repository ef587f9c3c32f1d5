// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher: canonical-event lifecycle, listener bookkeeping, and
//! frame-batched gesture routing.
//!
//! [`PointerEngine`] is the coordination core. Input sources normalize
//! platform events and drive the canonical `down`/`move`/`up`/`cancel`
//! lifecycle through their [`SourceCtx`](crate::SourceCtx); the
//! engine synthesizes and delivers canonical events synchronously, snapshots
//! each into the gesture queue, and replays the queue once per rendering
//! frame into exactly the recognizers each interaction requires.
//!
//! ## Lifecycle per pointer
//!
//! A pointer id is absent until its `down`, active until its `up` or
//! `cancel`, then absent again; no other transitions exist. Sources recover
//! from missed terminations before reporting a new `down` for a live id.
//!
//! ## Required-recognizer sets
//!
//! When a `down` is processed, the engine walks the resolved target's
//! ancestor path (host links included) and unions every gesture name with a
//! nonzero listener count into a [`RecognizerSet`]. The set is frozen for
//! the interaction: every queued event for that pointer carries it, and the
//! frame flush invokes a recognizer for an event if and only if its slot bit
//! is set.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use thicket_scope_tree::{NodeId, NodeKind, ScopeTree};

use crate::event::{AnyEvent, PointerEvent, PointerEventKind, PointerId, SharedFlag};
use crate::host::{FrameHost, TimerHost, TimerId};
use crate::pointer_map::PointerMap;
use crate::raw::RawEvent;
use crate::recognizer::{GestureCtx, GestureRecognizer, RecognizerSet};
use crate::source::{InputSource, SourceCtx};
use crate::trace::InputTrace;

/// A listener callback for delivered events.
pub type GestureHandler = Box<dyn FnMut(&AnyEvent)>;

/// Token identifying one added listener, returned by
/// [`PointerEngine::add_listener`] and consumed by
/// [`PointerEngine::remove_listener`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct GestureListeners {
    count: u32,
    handlers: Vec<(ListenerId, GestureHandler)>,
}

#[derive(Default)]
struct NodeGestures {
    total: u32,
    gestures: HashMap<String, GestureListeners>,
}

#[derive(Copy, Clone, Debug)]
struct GestureDependency {
    slot: Option<usize>,
    listeners: u32,
}

struct QueuedEvent {
    required: RecognizerSet,
    event: PointerEvent,
}

#[derive(Copy, Clone, Debug)]
struct RecentTouch {
    pos: Point,
    until: u64,
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum TimerOwner {
    Source(usize),
    Recognizer(usize),
}

#[derive(Copy, Clone, Debug)]
struct TimerEntry {
    owner: TimerOwner,
    repeating: bool,
}

/// Shared dispatcher state reachable from source and recognizer contexts.
pub(crate) struct EngineCore {
    /// Pointer id → last-known target. The per-pointer state store.
    pointers: PointerMap<NodeId>,
    /// Pointer id → frozen required-recognizer set for the interaction.
    required: PointerMap<RecognizerSet>,
    /// Pointer id → the interaction's shared tap-suppression flag.
    suppress: PointerMap<SharedFlag>,
    /// Lower-cased gesture name → recognizer slot and listener total.
    dependencies: HashMap<String, GestureDependency>,
    /// Per-node listener bookkeeping.
    nodes: HashMap<NodeId, NodeGestures>,
    /// Events awaiting the next frame flush.
    queue: Vec<QueuedEvent>,
    /// Recently-ended touch positions that swallow compat mouse events.
    recent_touches: SmallVec<[RecentTouch; 4]>,
    timer_entries: HashMap<TimerId, TimerEntry>,
    next_listener: u64,
    next_timer: u64,
    trace: Option<Box<dyn InputTrace>>,
}

impl EngineCore {
    fn new() -> Self {
        let mut dependencies = HashMap::new();
        // down/up are always valid names so plain canonical listeners can
        // activate sources without any recognizer.
        for seed in ["down", "up"] {
            dependencies.insert(
                String::from(seed),
                GestureDependency {
                    slot: None,
                    listeners: 0,
                },
            );
        }
        Self {
            pointers: PointerMap::new(),
            required: PointerMap::new(),
            suppress: PointerMap::new(),
            dependencies,
            nodes: HashMap::new(),
            queue: Vec::new(),
            recent_touches: SmallVec::new(),
            timer_entries: HashMap::new(),
            next_listener: 0,
            next_timer: 0,
            trace: None,
        }
    }

    // Canonical lifecycle ---------------------------------------------------

    pub(crate) fn down(
        &mut self,
        tree: &ScopeTree,
        frames: &mut dyn FrameHost,
        mut event: PointerEvent,
    ) {
        let set = self.compute_required(tree, event.target);
        if let Some(t) = self.trace.as_mut() {
            t.required_set(event.pointer_id, set);
        }
        self.required.set(event.pointer_id, set);
        self.suppress.set(event.pointer_id, event.suppress.clone());
        event.kind = PointerEventKind::Down;
        self.dispatch_canonical(tree, frames, event);
    }

    pub(crate) fn moved(&mut self, frames: &mut dyn FrameHost, mut event: PointerEvent) {
        // Moves skip listener delivery; they are only meaningful to
        // recognizers and go straight into the queue.
        event.kind = PointerEventKind::Move;
        self.attach_suppress(&mut event);
        self.fill_queue(frames, event);
    }

    pub(crate) fn up(
        &mut self,
        tree: &ScopeTree,
        frames: &mut dyn FrameHost,
        mut event: PointerEvent,
    ) {
        let id = event.pointer_id;
        self.attach_suppress(&mut event);
        event.kind = PointerEventKind::Up;
        self.dispatch_canonical(tree, frames, event);
        self.required.delete(id);
        self.suppress.delete(id);
    }

    pub(crate) fn cancel(
        &mut self,
        tree: &ScopeTree,
        frames: &mut dyn FrameHost,
        mut event: PointerEvent,
    ) {
        let id = event.pointer_id;
        self.attach_suppress(&mut event);
        // A cancel is a gesture-suppressing up.
        event.prevent_tap();
        event.kind = PointerEventKind::Up;
        self.dispatch_canonical(tree, frames, event);
        self.required.delete(id);
        self.suppress.delete(id);
    }

    fn dispatch_canonical(
        &mut self,
        tree: &ScopeTree,
        frames: &mut dyn FrameHost,
        event: PointerEvent,
    ) {
        if event.target.is_none() {
            return;
        }
        if let Some(t) = self.trace.as_mut() {
            t.canonical(event.kind, event.pointer_id, event.target);
        }
        // Deliver first, then snapshot into the queue, so suppression raised
        // by a listener during dispatch rides along with the snapshot.
        let delivered = AnyEvent::Pointer(event.clone());
        self.deliver(tree, &delivered);
        self.fill_queue(frames, event);
    }

    fn fill_queue(&mut self, frames: &mut dyn FrameHost, event: PointerEvent) {
        if self.queue.is_empty() {
            frames.request_frame();
        }
        let required = self
            .required
            .get(event.pointer_id)
            .copied()
            .unwrap_or_default();
        if let Some(t) = self.trace.as_mut() {
            t.enqueued(event.kind, event.pointer_id);
        }
        self.queue.push(QueuedEvent { required, event });
    }

    /// Delivers an event to listeners on its target and every ancestor,
    /// crossing scope boundaries through host links.
    pub(crate) fn deliver(&mut self, tree: &ScopeTree, event: &AnyEvent) {
        let Some(target) = event.target() else { return };
        let name = event.name();
        let Self { nodes, trace, .. } = self;
        let mut current = Some(target);
        while let Some(node) = current {
            if let Some(entry) = nodes.get_mut(&node) {
                if let Some(listeners) = entry.gestures.get_mut(name) {
                    if !listeners.handlers.is_empty() {
                        if let Some(t) = trace.as_mut() {
                            t.delivered(name, node);
                        }
                        for (_, handler) in listeners.handlers.iter_mut() {
                            handler(event);
                        }
                    }
                }
            }
            current = tree.parent_or_host(node);
        }
    }

    fn compute_required(&self, tree: &ScopeTree, target: Option<NodeId>) -> RecognizerSet {
        let mut set = RecognizerSet::empty();
        let mut current = target.filter(|&t| tree.is_alive(t));
        while let Some(node) = current {
            if let Some(entry) = self.nodes.get(&node) {
                for (name, listeners) in &entry.gestures {
                    if listeners.count > 0 {
                        if let Some(dep) = self.dependencies.get(name) {
                            if let Some(slot) = dep.slot {
                                set.insert(slot);
                            }
                        }
                    }
                }
            }
            current = tree.parent_or_host(node);
        }
        set
    }

    fn attach_suppress(&mut self, event: &mut PointerEvent) {
        if let Some(flag) = self.suppress.get(event.pointer_id) {
            event.suppress = flag.clone();
        }
    }

    // Pointer store ---------------------------------------------------------

    pub(crate) fn set_pointer(&mut self, id: PointerId, target: NodeId) {
        self.pointers.set(id, target);
    }

    pub(crate) fn pointer_target(&self, id: PointerId) -> Option<NodeId> {
        self.pointers.get(id).copied()
    }

    pub(crate) fn has_pointer(&self, id: PointerId) -> bool {
        self.pointers.has(id)
    }

    pub(crate) fn remove_pointer(&mut self, id: PointerId) {
        self.pointers.delete(id);
    }

    pub(crate) fn live_pointers(&self) -> usize {
        self.pointers.pointers()
    }

    pub(crate) fn pointer_entries(&self) -> SmallVec<[(PointerId, NodeId); 8]> {
        let mut entries = SmallVec::new();
        self.pointers.for_each(|&target, id| {
            entries.push((id, target));
        });
        entries
    }

    // Mouse-compat dedup ----------------------------------------------------

    pub(crate) fn arm_mouse_dedup(&mut self, pos: Point, until: u64) {
        self.recent_touches.push(RecentTouch { pos, until });
    }

    pub(crate) fn near_recent_touch(&mut self, pos: Point, now: u64, radius: f64) -> bool {
        self.recent_touches.retain(|t| t.until > now);
        self.recent_touches
            .iter()
            .any(|t| (pos.x - t.pos.x).abs() <= radius && (pos.y - t.pos.y).abs() <= radius)
    }

    // Timers ----------------------------------------------------------------

    pub(crate) fn alloc_timer_for_source(&mut self, index: usize, repeating: bool) -> TimerId {
        self.alloc_timer(TimerOwner::Source(index), repeating)
    }

    pub(crate) fn alloc_timer_for_recognizer(&mut self, slot: usize, repeating: bool) -> TimerId {
        self.alloc_timer(TimerOwner::Recognizer(slot), repeating)
    }

    fn alloc_timer(&mut self, owner: TimerOwner, repeating: bool) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timer_entries.insert(id, TimerEntry { owner, repeating });
        id
    }

    pub(crate) fn drop_timer(&mut self, id: TimerId) {
        self.timer_entries.remove(&id);
    }
}

struct SourceEntry {
    name: &'static str,
    source: Box<dyn InputSource>,
}

struct RecognizerEntry {
    name: &'static str,
    recognizer: Box<dyn GestureRecognizer>,
}

/// The dispatch and recognition engine.
///
/// Owns the per-pointer state store, the gesture queue, the listener
/// bookkeeping, the registered input sources, and the registered
/// recognizers. The embedder supplies the document model to each entry point
/// and drives the injected [`FrameHost`]/[`TimerHost`] seams.
pub struct PointerEngine {
    core: EngineCore,
    sources: Vec<SourceEntry>,
    recognizers: Vec<RecognizerEntry>,
    frames: Box<dyn FrameHost>,
    timers: Box<dyn TimerHost>,
}

impl PointerEngine {
    /// An engine with no sources, no recognizers, and no listeners.
    #[must_use]
    pub fn new(frames: Box<dyn FrameHost>, timers: Box<dyn TimerHost>) -> Self {
        Self {
            core: EngineCore::new(),
            sources: Vec::new(),
            recognizers: Vec::new(),
            frames,
            timers,
        }
    }

    /// Installs an observer for dispatch decisions.
    pub fn set_trace(&mut self, trace: Box<dyn InputTrace>) {
        self.core.trace = Some(trace);
    }

    /// Registers an input source under a name. Sources are consulted in
    /// registration order; the first one interested in a raw event's kind
    /// handles it.
    pub fn register_source(&mut self, name: &'static str, source: Box<dyn InputSource>) {
        self.sources.push(SourceEntry { name, source });
    }

    /// Registers a recognizer, assigning it the next slot and mapping every
    /// gesture name it exposes. Returns `false` when all slots are taken.
    pub fn register_recognizer(
        &mut self,
        name: &'static str,
        recognizer: Box<dyn GestureRecognizer>,
    ) -> bool {
        let slot = self.recognizers.len();
        if slot >= RecognizerSet::CAPACITY {
            return false;
        }
        for gesture in recognizer.exposes() {
            self.core.dependencies.insert(
                gesture.to_lowercase(),
                GestureDependency {
                    slot: Some(slot),
                    listeners: 0,
                },
            );
        }
        self.recognizers.push(RecognizerEntry { name, recognizer });
        true
    }

    /// Enables a gesture for a node, registering the node with every input
    /// source on its first-ever listener and applying the recognizer's
    /// default scroll-policy attribute if the node's ownable element lacks
    /// an explicit one. Returns whether the gesture name was recognized.
    pub fn activate_gesture(&mut self, tree: &mut ScopeTree, node: NodeId, gesture: &str) -> bool {
        let name = gesture.to_lowercase();
        let Some(dep) = self.core.dependencies.get(&name) else {
            return false;
        };
        let slot = dep.slot;
        if !self.core.nodes.contains_key(&node) {
            for entry in &mut self.sources {
                entry.source.register(node);
            }
        }
        if let Some(slot) = slot {
            if let Some(entry) = self.recognizers.get(slot) {
                let action = entry
                    .recognizer
                    .default_actions()
                    .iter()
                    .find(|(g, _)| *g == name)
                    .map(|&(_, a)| a);
                if let Some(action) = action {
                    // The ownable element: the node itself, or a scope
                    // root's host.
                    let owner = match tree.kind(node) {
                        Some(NodeKind::Element) => Some(node),
                        Some(NodeKind::ScopeRoot) => tree.host(node),
                        _ => None,
                    };
                    if let Some(owner) = owner {
                        if tree.touch_action(owner).is_none() {
                            tree.set_touch_action(owner, Some(action));
                        }
                    }
                }
            }
        }
        let entry = self.core.nodes.entry(node).or_default();
        entry.gestures.entry(name.clone()).or_default().count += 1;
        entry.total += 1;
        if let Some(dep) = self.core.dependencies.get_mut(&name) {
            dep.listeners += 1;
        }
        true
    }

    /// The exact inverse of [`activate_gesture`](Self::activate_gesture):
    /// decrements the node's counts and unregisters the node from every
    /// source once its total reaches zero. Returns whether the gesture name
    /// was recognized.
    pub fn deactivate_gesture(&mut self, node: NodeId, gesture: &str) -> bool {
        let name = gesture.to_lowercase();
        if !self.core.dependencies.contains_key(&name) {
            return false;
        }
        if let Some(entry) = self.core.nodes.get_mut(&node) {
            if let Some(listeners) = entry.gestures.get_mut(&name) {
                listeners.count = listeners.count.saturating_sub(1);
            }
            entry.total = entry.total.saturating_sub(1);
            if entry.total == 0 {
                self.core.nodes.remove(&node);
                for source in &mut self.sources {
                    source.source.unregister(node);
                }
            }
        }
        if let Some(dep) = self.core.dependencies.get_mut(&name) {
            dep.listeners = dep.listeners.saturating_sub(1);
        }
        true
    }

    /// Listens for a gesture on a node. Returns a removal token, or `None`
    /// when the gesture name is not recognized.
    pub fn add_listener(
        &mut self,
        tree: &mut ScopeTree,
        node: NodeId,
        gesture: &str,
        handler: GestureHandler,
    ) -> Option<ListenerId> {
        if !self.activate_gesture(tree, node, gesture) {
            return None;
        }
        let name = gesture.to_lowercase();
        self.core.next_listener += 1;
        let id = ListenerId(self.core.next_listener);
        if let Some(entry) = self.core.nodes.get_mut(&node) {
            if let Some(listeners) = entry.gestures.get_mut(&name) {
                listeners.handlers.push((id, handler));
            }
        }
        Some(id)
    }

    /// Stops listening. Removing a listener that was never added (or was
    /// already removed) is a no-op; the returned boolean still reports
    /// whether the gesture name was recognized.
    pub fn remove_listener(&mut self, node: NodeId, gesture: &str, id: ListenerId) -> bool {
        let name = gesture.to_lowercase();
        if !self.core.dependencies.contains_key(&name) {
            return false;
        }
        let mut found = false;
        if let Some(entry) = self.core.nodes.get_mut(&node) {
            if let Some(listeners) = entry.gestures.get_mut(&name) {
                let before = listeners.handlers.len();
                listeners.handlers.retain(|(hid, _)| *hid != id);
                found = listeners.handlers.len() != before;
            }
        }
        if found {
            self.deactivate_gesture(node, &name);
        }
        true
    }

    /// Feeds one raw platform event through the interested source.
    ///
    /// The same underlying platform event observed through more than one
    /// registered scope must share its handled marker (clone the
    /// [`RawEvent`]); the second and later observations are no-ops.
    pub fn handle_raw(&mut self, tree: &ScopeTree, raw: &RawEvent) {
        if raw.handled().get() {
            if let Some(t) = self.core.trace.as_mut() {
                t.duplicate_raw();
            }
            return;
        }
        raw.handled().set();
        let kind = raw.kind();
        let Self {
            core,
            sources,
            frames,
            timers,
            ..
        } = self;
        for (index, entry) in sources.iter_mut().enumerate() {
            if entry.source.events().contains(&kind) {
                let mut ctx = SourceCtx::new(tree, &mut *core, frames.as_mut(), timers.as_mut(), index);
                entry.source.handle(raw, &mut ctx);
                break;
            }
        }
    }

    /// Flushes the gesture queue: replays every queued event, in enqueue
    /// order, into the recognizers whose slot bit is set in that event's
    /// required set, in registration order. The embedder calls this exactly
    /// once per [`FrameHost::request_frame`] request.
    pub fn run_frame(&mut self, tree: &ScopeTree) {
        let Self {
            core,
            recognizers,
            timers,
            ..
        } = self;
        let queue = mem::take(&mut core.queue);
        if let Some(t) = core.trace.as_mut() {
            t.flushed(queue.len());
        }
        for queued in &queue {
            for (slot, entry) in recognizers.iter_mut().enumerate() {
                if queued.required.contains(slot) {
                    let mut ctx = GestureCtx {
                        tree,
                        core: &mut *core,
                        timers: timers.as_mut(),
                        slot,
                    };
                    match queued.event.kind {
                        PointerEventKind::Down => entry.recognizer.down(&queued.event, &mut ctx),
                        PointerEventKind::Move => entry.recognizer.moved(&queued.event, &mut ctx),
                        PointerEventKind::Up | PointerEventKind::Cancel => {
                            entry.recognizer.up(&queued.event, &mut ctx);
                        }
                    }
                }
            }
        }
    }

    /// Routes a fired timer to the source or recognizer that owns it. The
    /// embedder passes the current time in milliseconds.
    pub fn fire_timer(&mut self, tree: &ScopeTree, id: TimerId, now: u64) {
        let Some(entry) = self.core.timer_entries.get(&id).copied() else {
            return;
        };
        if !entry.repeating {
            self.core.timer_entries.remove(&id);
        }
        let Self {
            core,
            sources,
            recognizers,
            frames,
            timers,
            ..
        } = self;
        match entry.owner {
            TimerOwner::Source(index) => {
                if let Some(s) = sources.get_mut(index) {
                    let mut ctx =
                        SourceCtx::new(tree, &mut *core, frames.as_mut(), timers.as_mut(), index);
                    s.source.timer(id, now, &mut ctx);
                }
            }
            TimerOwner::Recognizer(slot) => {
                if let Some(r) = recognizers.get_mut(slot) {
                    let mut ctx = GestureCtx {
                        tree,
                        core: &mut *core,
                        timers: timers.as_mut(),
                        slot,
                    };
                    r.recognizer.timer(id, now, &mut ctx);
                }
            }
        }
    }

    /// The number of currently live pointers in the state store.
    #[must_use]
    pub fn live_pointers(&self) -> usize {
        self.core.live_pointers()
    }

    /// The last-known target of a live pointer.
    #[must_use]
    pub fn pointer_target(&self, id: PointerId) -> Option<NodeId> {
        self.core.pointer_target(id)
    }

    /// The number of events awaiting the next frame flush.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.core.queue.len()
    }

    /// The total listener count for a gesture name across all nodes, or
    /// `None` when the name is not recognized.
    #[must_use]
    pub fn listener_count(&self, gesture: &str) -> Option<u32> {
        self.core
            .dependencies
            .get(&gesture.to_lowercase())
            .map(|d| d.listeners)
    }
}

impl fmt::Debug for PointerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerEngine")
            .field("sources", &self.sources.iter().map(|s| s.name).collect::<Vec<_>>())
            .field(
                "recognizers",
                &self.recognizers.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .field("live_pointers", &self.core.live_pointers())
            .field("pending_events", &self.core.queue.len())
            .finish_non_exhaustive()
    }
}
