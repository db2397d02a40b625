//! Lifecycle events.
//!
//! The tracer fires `Start`/`End` events around the table body, caption,
//! head and rows. Each `(Structure, EventTiming)` pair holds at most one
//! listener; registering again replaces it.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::state::TraceState;
use crate::structure::{EventTiming, Structure, TableId};
use crate::transform::RawUnit;

/// A registered event listener.
pub type Listener<'a> = Box<dyn FnMut(&mut TracedEvent<'_, 'a>) -> Result<()> + 'a>;

/// An event fired while a table is traced.
///
/// Listeners read and adjust tracing state through [`tracer_mut`]. Column
/// names may only be declared from a `Row`/`Start` listener.
///
/// [`tracer_mut`]: TracedEvent::tracer_mut
pub struct TracedEvent<'t, 'a> {
    structure: Structure,
    timing: EventTiming,
    target: RawUnit<'a>,
    tracer: &'t mut TraceState,
    stopped: bool,
}

impl<'t, 'a> TracedEvent<'t, 'a> {
    /// Creates an event for `structure`.
    ///
    /// Fails for structures that take no part in event dispatch.
    pub fn new(
        structure: Structure,
        timing: EventTiming,
        target: RawUnit<'a>,
        tracer: &'t mut TraceState,
    ) -> Result<Self> {
        if !structure.supports_event() {
            return Err(Error::usage(
                "TracedEvent::new",
                format!(
                    "{structure} does not dispatch events; use a {structure} transformer instead"
                ),
            ));
        }

        Ok(Self {
            structure,
            timing,
            target,
            tracer,
            stopped: false,
        })
    }

    /// Structure the event belongs to.
    #[must_use]
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Whether the event fires before or after the content.
    #[must_use]
    pub fn timing(&self) -> EventTiming {
        self.timing
    }

    /// Element or fragment the event is about.
    #[must_use]
    pub fn target(&self) -> &RawUnit<'a> {
        &self.target
    }

    /// Table being traced.
    #[must_use]
    pub fn table_id(&self) -> Option<TableId> {
        self.tracer.current_table_id()
    }

    /// Read access to the tracing state.
    #[must_use]
    pub fn tracer(&self) -> &TraceState {
        &*self.tracer
    }

    /// Write access to the tracing state.
    pub fn tracer_mut(&mut self) -> &mut TraceState {
        &mut *self.tracer
    }

    /// Whether [`stop_tracing`](Self::stop_tracing) is allowed.
    #[must_use]
    pub fn is_stoppable(&self) -> bool {
        self.timing == EventTiming::Start && self.structure.supports_stop()
    }

    /// Whether a listener stopped tracing.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stopped
    }

    /// Stops tracing the structure before its content is consumed.
    ///
    /// On `TableHead`/`Start` head inference is skipped; on `Row`/`Start` no
    /// rows are produced for the table.
    pub fn stop_tracing(&mut self) -> Result<()> {
        if self.timing == EventTiming::End {
            return Err(Error::usage(
                "stop_tracing",
                format!(
                    "{0}/End fires after the content was consumed; stop from a {0}/Start listener",
                    self.structure
                ),
            ));
        }
        if !self.structure.supports_stop() {
            return Err(Error::usage(
                "stop_tracing",
                format!(
                    "{} cannot be stopped; only TableHead/Start and Row/Start listeners may stop tracing",
                    self.structure
                ),
            ));
        }

        self.stopped = true;
        Ok(())
    }
}

impl fmt::Debug for TracedEvent<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedEvent")
            .field("structure", &self.structure)
            .field("timing", &self.timing)
            .field("target", &self.target)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

/// Listener slots keyed by structure and timing.
#[derive(Default)]
pub(crate) struct Dispatcher<'a> {
    listeners: HashMap<(Structure, EventTiming), Listener<'a>>,
}

impl<'a> Dispatcher<'a> {
    /// Stores `listener`, replacing any previous one for the same slot.
    pub(crate) fn insert(
        &mut self,
        structure: Structure,
        timing: EventTiming,
        listener: Listener<'a>,
    ) -> Result<()> {
        if !structure.supports_event() {
            return Err(Error::usage(
                "add_event_listener",
                format!(
                    "{structure} does not dispatch events; register a {structure} transformer with add_transformer instead"
                ),
            ));
        }

        self.listeners.insert((structure, timing), listener);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Fires the event, returning whether the listener stopped tracing.
    ///
    /// `target` is only built when a listener is registered. The dispatch
    /// marker on `state` is cleared even when the listener fails.
    pub(crate) fn dispatch(
        &mut self,
        structure: Structure,
        timing: EventTiming,
        target: impl FnOnce() -> RawUnit<'a>,
        state: &mut TraceState,
    ) -> Result<bool> {
        let Some(listener) = self.listeners.get_mut(&(structure, timing)) else {
            return Ok(false);
        };

        let mut event = TracedEvent::new(structure, timing, target(), state)?;
        event.tracer.begin_dispatch(structure, timing);
        let outcome = listener(&mut event);
        let stopped = event.stopped;
        event.tracer.end_dispatch();

        outcome.map(|()| stopped)
    }
}
