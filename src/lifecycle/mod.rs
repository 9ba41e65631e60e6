//! Modal lifecycle state machine.
//!
//! ```text
//! Idle ──bootstrap──► Scheduled ──delay──► Active ──close/cta──► Closing ──exit──► Removed
//!  ▲                      │                                                          │
//!  └──── gate failed ─────┘                                                          │
//!  └──────────────────────────────── bootstrap again ◄───────────────────────────────┘
//! ```
//!
//! The controller owns every piece of mutable session state (scroll lock,
//! pending tasks, the live modal handle) and receives the document on each
//! call. Time is virtual: the host advances the clock and due continuations
//! run in order.
//!
//! Every continuation re-checks the world before mutating it. The gate runs
//! again when the delay elapses, the style fallback only acts while the
//! modal is showing, and removal tolerates nodes that are already gone.

pub mod tasks;


pub use tasks::{Task, TaskQueue};

use crate::analytics::{AnalyticsEmitter, AnalyticsRecord};
use crate::config::ModalConfig;
use crate::dom::{Document, DomError};
use crate::gate::{GateFailure, ValidationGate};
use crate::modal::{ModalAssembler, ModalHandlers};
use crate::scroll::ScrollLock;
use crate::style::StyleInjector;
use crate::{debug, error, log, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Scheduled,
    Active,
    Closing,
    Removed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Closing => "closing",
            Self::Removed => "removed",
        };
        f.write_str(name)
    }
}

/// Payload bound to the modal's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalIntent {
    Close,
    Cta,
}

/// Drives one modal session on a document.
#[derive(Debug)]
pub struct LifecycleController<N> {
    config: Arc<ModalConfig>,
    phase: Phase,
    scroll: ScrollLock,
    analytics: AnalyticsEmitter,
    tasks: TaskQueue<N>,
    modal: Option<N>,
    last_rejection: Option<GateFailure>,
    now: Duration,
}

impl<N: Clone + fmt::Debug> LifecycleController<N> {
    pub fn new(config: Arc<ModalConfig>) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            scroll: ScrollLock::new(),
            analytics: AnalyticsEmitter::new(),
            tasks: TaskQueue::new(),
            modal: None,
            last_rejection: None,
            now: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scroll(&self) -> &ScrollLock {
        &self.scroll
    }

    /// The most recent gate failure, at bootstrap or activation.
    pub fn last_rejection(&self) -> Option<GateFailure> {
        self.last_rejection
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// When the host should next call [`run_until`](Self::run_until).
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.next_due()
    }

    /// Live modal root, while one is showing or closing.
    pub fn modal(&self) -> Option<&N> {
        self.modal.as_ref()
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Check the gate and schedule activation after the configured delay.
    ///
    /// Returns `false` if the gate refused or a modal is already showing
    /// or closing; nothing is scheduled then and the controller stays where
    /// it was.
    pub fn bootstrap<D>(&mut self, doc: &mut D) -> bool
    where
        D: Document<ModalIntent, Node = N>,
    {
        if !self.gate_passes(doc) {
            return false;
        }
        match self.phase {
            Phase::Idle | Phase::Removed => self.phase = Phase::Scheduled,
            Phase::Scheduled => {}
            Phase::Active | Phase::Closing => {
                debug!("lifecycle"; "bootstrap ignored while {}", self.phase);
                return false;
            }
        }
        let due = self.now + self.config.timing.delay();
        self.tasks.schedule(due, Task::Activate);
        debug!("lifecycle"; "activation scheduled at {:?}", due);
        true
    }

    /// React to a control of the modal.
    ///
    /// Only an active modal reacts; anything arriving while closing (a
    /// double click, say) is ignored. Returns whether the intent was taken.
    pub fn handle<D>(&mut self, doc: &mut D, intent: ModalIntent) -> bool
    where
        D: Document<ModalIntent, Node = N>,
    {
        if self.phase != Phase::Active {
            debug!("lifecycle"; "{:?} ignored while {}", intent, self.phase);
            return false;
        }

        let analytics = &self.config.analytics;
        let record = match intent {
            ModalIntent::Close => AnalyticsRecord::close(analytics),
            ModalIntent::Cta => AnalyticsRecord::cta(analytics),
        };
        self.analytics.emit(doc, &record);

        if let Err(e) = self.scroll.unlock(doc) {
            debug!("lifecycle"; "scroll unlock: {}", e);
        }
        self.begin_removal(doc);
        true
    }

    /// [`handle`](Self::handle) an intent that arrived at `now`.
    ///
    /// The clock is brought up to `now` first, running anything that fell
    /// due, so the exit animation is timed from the click rather than from
    /// the last task.
    pub fn handle_at<D>(&mut self, doc: &mut D, intent: ModalIntent, now: Duration) -> bool
    where
        D: Document<ModalIntent, Node = N>,
    {
        self.run_until(doc, now);
        self.handle(doc, intent)
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Advance the clock by `elapsed` and run whatever became due.
    pub fn advance<D>(&mut self, doc: &mut D, elapsed: Duration) -> usize
    where
        D: Document<ModalIntent, Node = N>,
    {
        let until = self.now + elapsed;
        self.run_until(doc, until)
    }

    /// Run every task due at or before `until`, returning how many ran.
    ///
    /// The clock moves to each task's due time before it runs, so tasks it
    /// schedules are timed from that instant and run in the same pass if
    /// they fall inside the window.
    pub fn run_until<D>(&mut self, doc: &mut D, until: Duration) -> usize
    where
        D: Document<ModalIntent, Node = N>,
    {
        let mut ran = 0;
        while let Some((due, task)) = self.tasks.pop_due(until) {
            self.now = self.now.max(due);
            debug!("lifecycle"; "running {} at {:?}", task.name(), self.now);
            self.run(doc, task);
            ran += 1;
        }
        self.now = self.now.max(until);
        ran
    }

    fn run<D>(&mut self, doc: &mut D, task: Task<N>)
    where
        D: Document<ModalIntent, Node = N>,
    {
        match task {
            Task::Activate => self.activate(doc),
            Task::StyleFallback { style } => {
                if self.phase != Phase::Active {
                    debug!("lifecycle"; "style fallback skipped while {}", self.phase);
                    return;
                }
                StyleInjector::new(&self.config).fallback(doc, &style);
            }
            Task::Remove { modal, style } => {
                detach(doc, &modal);
                if let Some(style) = style {
                    detach(doc, &style);
                }
                self.phase = Phase::Removed;
                debug!("lifecycle"; "modal removed");
            }
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn gate_passes<D>(&mut self, doc: &D) -> bool
    where
        D: Document<ModalIntent, Node = N>,
    {
        match ValidationGate::new(&self.config).check(doc) {
            Ok(()) => true,
            Err(failure) => {
                warn!("gate"; "{}", failure);
                self.last_rejection = Some(failure);
                false
            }
        }
    }

    /// Scheduled → Active, after re-checking the gate.
    fn activate<D>(&mut self, doc: &mut D)
    where
        D: Document<ModalIntent, Node = N>,
    {
        if !self.gate_passes(doc) {
            if self.phase == Phase::Scheduled {
                self.phase = Phase::Idle;
            }
            return;
        }
        if self.phase != Phase::Scheduled {
            debug!("lifecycle"; "stale activation while {}", self.phase);
            return;
        }

        match self.show(doc) {
            Ok(modal) => {
                self.modal = Some(modal);
                self.phase = Phase::Active;
                log!("lifecycle"; "modal shown");
            }
            Err(e) => {
                error!("lifecycle"; "activation failed: {}", e);
                if let Err(e) = self.scroll.unlock(doc) {
                    debug!("lifecycle"; "scroll unlock: {}", e);
                }
                self.phase = Phase::Idle;
            }
        }
    }

    /// Lock scroll, inject styles, then assemble and append the modal.
    fn show<D>(&mut self, doc: &mut D) -> Result<N, DomError>
    where
        D: Document<ModalIntent, Node = N>,
    {
        self.scroll.lock(doc)?;

        match StyleInjector::new(&self.config).inject(doc) {
            Ok(Some(style)) => {
                let due = self.now + self.config.timing.fallback();
                self.tasks.schedule(due, Task::StyleFallback { style });
            }
            Ok(None) => {}
            Err(e) => error!("style"; "style injection failed: {}", e),
        }

        let modal = ModalAssembler::new(&self.config).assemble(
            doc,
            ModalHandlers {
                on_close: ModalIntent::Close,
                on_cta: ModalIntent::Cta,
            },
        )?;
        let body = doc.body().ok_or(DomError::MissingContainer("body"))?;
        doc.append_child(&body, &modal)?;
        Ok(modal)
    }

    /// Active → Closing: play the exit animation and schedule removal.
    fn begin_removal<D>(&mut self, doc: &mut D)
    where
        D: Document<ModalIntent, Node = N>,
    {
        let style = doc.element_by_id(&self.config.style_id);
        let modal = match self.modal.take() {
            Some(modal) if doc.is_connected(&modal) => modal,
            _ => {
                debug!("lifecycle"; "modal already gone");
                if let Some(style) = style {
                    detach(doc, &style);
                }
                self.phase = Phase::Removed;
                return;
            }
        };

        for (enter, exit) in self.config.animation.swaps() {
            for node in doc.elements_by_class(&modal, enter) {
                doc.replace_class(&node, enter, exit);
            }
        }

        self.phase = Phase::Closing;
        let due = self.now + self.config.timing.exit();
        self.tasks.schedule(due, Task::Remove { modal, style });
    }
}

/// Detach `node` from its parent. A node without a parent is left alone.
fn detach<M, D: Document<M>>(doc: &mut D, node: &D::Node) -> bool {
    let Some(parent) = doc.parent(node) else {
        return false;
    };
    match doc.remove_child(&parent, node) {
        Ok(()) => true,
        Err(e) => {
            debug!("lifecycle"; "detach failed: {}", e);
            false
        }
    }
}
