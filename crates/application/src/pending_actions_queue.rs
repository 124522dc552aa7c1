use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use runscope_core::AppResult;
use tracing::{debug, warn};

/// Boxed future produced by one pending action.
pub type PendingActionFuture = Pin<Box<dyn Future<Output = AppResult<()>> + Send>>;

/// Deferred zero-argument asynchronous operation.
pub type PendingAction = Box<dyn FnOnce() -> PendingActionFuture + Send>;

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    /// Identifier of the queue whose drained action is being polled.
    static DRAINING_QUEUE: u64;
}

struct QueuedAction {
    sequence: u64,
    /// Enqueued by an action of the running drain.
    reentrant: bool,
    action: PendingAction,
}

#[derive(Default)]
struct QueueState {
    actions: VecDeque<QueuedAction>,
    next_sequence: u64,
    draining: bool,
}

/// FIFO queue of actions that wait for a readiness gate to open.
///
/// The gate is evaluated again on every [`enqueue`](Self::enqueue) and
/// [`process`](Self::process) call. A drain runs the actions queued before it
/// started. Actions that a drained action enqueues itself wait for the next
/// call. Actions enqueued by other callers while the drain is running are
/// picked up by the same drain once its batch is done, together with any
/// older action queued ahead of them.
///
/// When a queued action fails, the drain stops and returns the error. The
/// failed action is dropped and the actions behind it are put back at the head
/// of the queue for the next drain.
pub struct PendingActionsQueue {
    id: u64,
    readiness_gate: Box<dyn Fn() -> bool + Send + Sync>,
    state: Mutex<QueueState>,
}

impl PendingActionsQueue {
    /// Creates an empty queue guarded by `readiness_gate`.
    #[must_use]
    pub fn new(readiness_gate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            id: NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed),
            readiness_gate: Box::new(readiness_gate),
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Runs `action` now when the gate is open, otherwise queues it.
    ///
    /// Older queued actions always run first, inside this call. While a drain
    /// is running the action is queued and left to that drain.
    pub async fn enqueue<F, Fut>(&self, action: F) -> AppResult<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        let action: PendingAction = Box::new(move || Box::pin(action()));
        let reentrant = DRAINING_QUEUE
            .try_with(|queue_id| *queue_id == self.id)
            .unwrap_or(false);

        let immediate = {
            let mut state = self.lock_state();
            let sequence = state.next_sequence;
            state.next_sequence += 1;

            if reentrant || state.draining || !(self.readiness_gate)() {
                state.actions.push_back(QueuedAction {
                    sequence,
                    reentrant,
                    action,
                });
                debug!(
                    sequence,
                    reentrant,
                    pending_actions = state.actions.len(),
                    "deferred pending action"
                );
                return Ok(());
            }

            if state.actions.is_empty() {
                Some(action)
            } else {
                state.actions.push_back(QueuedAction {
                    sequence,
                    reentrant,
                    action,
                });
                None
            }
        };

        match immediate {
            Some(action) => action().await,
            None => self.process().await,
        }
    }

    /// Runs every action queued before this call when the gate is open.
    pub async fn process(&self) -> AppResult<()> {
        let batch = {
            let mut state = self.lock_state();
            if state.draining || !(self.readiness_gate)() || state.actions.is_empty() {
                return Ok(());
            }

            state.draining = true;
            std::mem::take(&mut state.actions)
        };

        let mut drain = Drain {
            queue: self,
            remaining: batch,
            active: true,
        };

        loop {
            debug!(batch_size = drain.remaining.len(), "draining pending actions");
            while let Some(queued) = drain.remaining.pop_front() {
                let sequence = queued.sequence;
                DRAINING_QUEUE
                    .scope(self.id, (queued.action)())
                    .await
                    .inspect_err(|error| {
                        warn!(
                            sequence,
                            requeued_actions = drain.remaining.len(),
                            error = %error,
                            "pending action failed"
                        );
                    })?;
            }

            if !drain.take_follow_up_batch() {
                return Ok(());
            }
        }
    }

    /// Drops every queued action and returns how many were discarded.
    pub fn clear(&self) -> usize {
        let mut state = self.lock_state();
        let discarded = state.actions.len();
        state.actions.clear();
        discarded
    }

    /// Returns the number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().actions.len()
    }

    /// Returns whether no action is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Running drain. Unexecuted actions return to the head of the queue when it
/// ends early.
struct Drain<'a> {
    queue: &'a PendingActionsQueue,
    remaining: VecDeque<QueuedAction>,
    active: bool,
}

impl Drain<'_> {
    /// Moves actions queued by other callers during the batch into
    /// `remaining`, up to the last of them. Ends the drain when there are none
    /// or the gate has closed.
    fn take_follow_up_batch(&mut self) -> bool {
        let mut state = self.queue.lock_state();
        let last_external = state
            .actions
            .iter()
            .rposition(|queued| !queued.reentrant)
            .filter(|_| (self.queue.readiness_gate)());

        match last_external {
            Some(last_external) => {
                self.remaining = state.actions.drain(..=last_external).collect();
                true
            }
            None => {
                state.draining = false;
                self.active = false;
                false
            }
        }
    }
}

impl Drop for Drain<'_> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }

        let mut state = self.queue.lock_state();
        state.draining = false;

        if !self.remaining.is_empty() {
            let newer = std::mem::take(&mut state.actions);
            let mut requeued = std::mem::take(&mut self.remaining);
            requeued.extend(newer);
            state.actions = requeued;
        }
    }
}
