//! Focus arbitration and popout window lifecycle.
//!
//! The router is the single authority over which entity owns the exclusive
//! fullscreen slot and which entities own detached popout surfaces. It knows
//! entities only by identity (kind + id), never by their internals, and it
//! is owned by the top-level controller -- never a global.
//!
//! Window creation and destruction are deferred: a request made during a
//! frame queues a [`WindowCommand`] which the controller drains and executes
//! against the [`WindowManager`] collaborator by the next frame at the
//! latest.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::EntityId;
use crate::error::WindowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusKind {
    Timer,
    Stopwatch,
    Pomodoro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusType {
    /// Shown inline in the main view.
    #[default]
    None,
    /// Owns the whole main window.
    Fullscreen,
    /// Detached into its own surface.
    Popout,
}

/// The single authoritative focus slot.
///
/// Invariant: at most one entity is `Fullscreen`, and whenever one is, this
/// state equals that entity's identity. `Popout` never appears here -- a
/// popped-out entity leaves the main view interactive for the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusState {
    pub kind: Option<FocusKind>,
    pub focus_type: FocusType,
    pub id: Option<EntityId>,
}

/// Opaque handle minted by the window-manager collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

/// Host platform window surface operations. The engine maps close events
/// back to a popout through the handle key.
pub trait WindowManager {
    fn create_window(&mut self, kind: FocusKind, id: EntityId) -> Result<WindowHandle, WindowError>;
    fn destroy_window(&mut self, handle: WindowHandle);
}

/// A live detached surface bound to exactly one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopoutWindow {
    pub handle: WindowHandle,
    pub kind: FocusKind,
    pub id: EntityId,
    /// Set when the engine itself decided to close the window (e.g. a
    /// pomodoro cycle finishing while popped out).
    pub pending_close: bool,
}

/// Deferred window-manager work, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Create { kind: FocusKind, id: EntityId },
    Destroy { handle: WindowHandle },
}

#[derive(Debug, Clone, Copy)]
struct EntityFocus {
    kind: FocusKind,
    focus: FocusType,
}

/// Single authoritative focus state plus popout-window registry.
#[derive(Debug, Default)]
pub struct FocusRouter {
    global: FocusState,
    entities: HashMap<EntityId, EntityFocus>,
    popouts: HashMap<WindowHandle, PopoutWindow>,
    pending: Vec<WindowCommand>,
}

impl FocusRouter {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registry ─────────────────────────────────────────────────────

    /// Make an entity known to the router. Focus requests for unknown ids
    /// are silently ignored.
    pub fn register(&mut self, kind: FocusKind, id: EntityId) {
        self.entities.insert(id, EntityFocus {
            kind,
            focus: FocusType::None,
        });
    }

    /// Forget an entity. Releases its fullscreen slot if held and queues
    /// destruction of its popout if one is live.
    pub fn unregister(&mut self, id: EntityId) {
        let Some(entry) = self.entities.remove(&id) else {
            return;
        };
        if self.global.id == Some(id) {
            self.global = FocusState::default();
        }
        if entry.focus == FocusType::Popout {
            if let Some(handle) = self.popout_handle(id) {
                self.request_close(handle);
            }
        }
    }

    pub fn is_registered(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> FocusState {
        self.global
    }

    /// An entity's local focus flag; `FocusType::None` for unknown ids.
    pub fn local_focus(&self, id: EntityId) -> FocusType {
        self.entities
            .get(&id)
            .map(|e| e.focus)
            .unwrap_or(FocusType::None)
    }

    pub fn popouts(&self) -> impl Iterator<Item = &PopoutWindow> {
        self.popouts.values()
    }

    pub fn popout_handle(&self, id: EntityId) -> Option<WindowHandle> {
        self.popouts
            .values()
            .find(|p| p.id == id)
            .map(|p| p.handle)
    }

    // ── Focus transitions ────────────────────────────────────────────

    /// Validate and apply a focus transition, returning the resulting global
    /// state. Invalid requests (unknown id, kind mismatch, transitions not in
    /// the rule table) are no-ops, not errors.
    pub fn request_focus(
        &mut self,
        kind: FocusKind,
        id: EntityId,
        desired: FocusType,
    ) -> FocusState {
        let Some(entry) = self.entities.get(&id).copied() else {
            debug!(%id, "focus request for unknown entity ignored");
            return self.global;
        };
        if entry.kind != kind {
            debug!(%id, ?kind, "focus request with mismatched kind ignored");
            return self.global;
        }

        match (entry.focus, desired) {
            (FocusType::None, FocusType::Fullscreen) => {
                // The fullscreen slot is exclusive: demote the current
                // holder's local flag in the same transition.
                if self.global.focus_type == FocusType::Fullscreen {
                    if let Some(prev) = self.global.id {
                        if let Some(prev_entry) = self.entities.get_mut(&prev) {
                            prev_entry.focus = FocusType::None;
                        }
                    }
                }
                self.set_local(id, FocusType::Fullscreen);
                self.global = FocusState {
                    kind: Some(kind),
                    focus_type: FocusType::Fullscreen,
                    id: Some(id),
                };
                debug!(%id, ?kind, "entity took fullscreen");
            }
            (FocusType::Fullscreen, FocusType::None) => {
                // Compress/back action.
                self.set_local(id, FocusType::None);
                self.global = FocusState::default();
            }
            (FocusType::None | FocusType::Fullscreen, FocusType::Popout) => {
                self.set_local(id, FocusType::Popout);
                // The main view stays interactive for the other entities.
                if self.global.id == Some(id) {
                    self.global = FocusState::default();
                }
                self.pending.push(WindowCommand::Create { kind, id });
                debug!(%id, ?kind, "popout requested");
            }
            // Popout -> None happens only through window close paths, and
            // everything else is not a transition.
            _ => {}
        }
        self.global
    }

    fn set_local(&mut self, id: EntityId, focus: FocusType) {
        if let Some(entry) = self.entities.get_mut(&id) {
            entry.focus = focus;
        }
    }

    // ── Popout lifecycle ─────────────────────────────────────────────

    /// Take the queued window-manager work for this frame.
    pub fn drain_commands(&mut self) -> Vec<WindowCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Record the handle the window manager minted for a create command.
    pub fn bind_popout(&mut self, kind: FocusKind, id: EntityId, handle: WindowHandle) {
        self.popouts.insert(handle, PopoutWindow {
            handle,
            kind,
            id,
            pending_close: false,
        });
    }

    /// Revert an entity's popout flag after the window manager failed to
    /// create its surface. Local and non-fatal.
    pub fn abort_popout(&mut self, id: EntityId) {
        if let Some(entry) = self.entities.get_mut(&id) {
            if entry.focus == FocusType::Popout {
                entry.focus = FocusType::None;
            }
        }
    }

    /// Flag a popout for engine-initiated close and queue its destruction.
    pub fn request_close(&mut self, handle: WindowHandle) {
        if let Some(popout) = self.popouts.get_mut(&handle) {
            popout.pending_close = true;
            self.pending.push(WindowCommand::Destroy { handle });
        }
    }

    /// Tear down a popout, whichever path triggered it (external close event
    /// or engine auto-close). Always clears the bound entity's local flag
    /// back to `None`.
    pub fn on_window_closed(&mut self, handle: WindowHandle) -> Option<PopoutWindow> {
        let popout = self.popouts.remove(&handle)?;
        if let Some(entry) = self.entities.get_mut(&popout.id) {
            entry.focus = FocusType::None;
        }
        debug!(id = %popout.id, handle = popout.handle.0, "popout closed");
        Some(popout)
    }
}
