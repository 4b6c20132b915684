//! Debounced query controller.
//!
//! A single actor task owns the query, results, loading flag and error.
//! Callers send commands over an mpsc channel and observe state through a
//! `watch` channel. Requests run on their own tasks and report back tagged
//! with the generation they were issued under; the actor drops any
//! completion whose generation no longer matches.

use super::{FetchError, SearchFetcher, SearchItem, SearchSnapshot, FETCH_FAILED_MESSAGE};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default quiet period before a query is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

const COMMAND_BUFFER: usize = 64;

enum Command {
    SetQuery {
        text: String,
        ack: oneshot::Sender<()>,
    },
}

struct Completion {
    generation: u64,
    outcome: Result<Vec<SearchItem>, FetchError>,
}

// ============================================================================
// Controller Handle
// ============================================================================

/// Handle to a running debounced search controller.
///
/// Dropping the handle tears the controller down: the pending timer is
/// discarded and any in-flight request is cancelled.
pub struct SearchController {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<SearchSnapshot>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
    debounce: Duration,
}

impl SearchController {
    /// Spawn a controller on the current tokio runtime.
    pub fn spawn<F: SearchFetcher>(fetcher: F, debounce: Duration) -> Self {
        Self::spawn_shared(Arc::new(fetcher), debounce)
    }

    /// Spawn a controller around an already shared fetcher.
    pub fn spawn_shared(fetcher: Arc<dyn SearchFetcher>, debounce: Duration) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchSnapshot::default());
        let shutdown = CancellationToken::new();

        let actor = Actor {
            fetcher,
            debounce,
            state: state_tx,
            completions: completions_tx,
            generation: 0,
            deadline: None,
            in_flight: None,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(actor.run(commands_rx, completions_rx));

        Self {
            commands: commands_tx,
            state: state_rx,
            shutdown,
            task: Some(task),
            debounce,
        }
    }

    /// Replace the current query.
    ///
    /// Returns once the controller has applied the change, so a following
    /// [`snapshot`](Self::snapshot) already reflects the new text.
    pub async fn set_query(&self, text: impl Into<String>) {
        let (ack, applied) = oneshot::channel();
        let command = Command::SetQuery {
            text: text.into(),
            ack,
        };
        if self.commands.send(command).await.is_err() {
            debug!("search controller stopped; ignoring query");
            return;
        }
        let _ = applied.await;
    }

    /// Current observable state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.clone()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Tear the controller down and wait for its task to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// ============================================================================
// Actor
// ============================================================================

struct Actor {
    fetcher: Arc<dyn SearchFetcher>,
    debounce: Duration,
    state: watch::Sender<SearchSnapshot>,
    completions: mpsc::UnboundedSender<Completion>,
    /// Bumped whenever earlier work is superseded.
    generation: u64,
    deadline: Option<Instant>,
    in_flight: Option<CancellationToken>,
    shutdown: CancellationToken,
}

impl Actor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                command = commands.recv() => match command {
                    Some(Command::SetQuery { text, ack }) => {
                        self.set_query(text);
                        let _ = ack.send(());
                    }
                    None => break,
                },
                Some(done) = completions.recv() => self.apply(done),
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    self.deadline = None;
                    self.fire();
                }
            }
        }
        self.teardown();
    }

    fn set_query(&mut self, text: String) {
        self.generation += 1;
        self.deadline = None;
        self.cancel_in_flight();

        let blank = text.trim().is_empty();
        self.state.send_modify(|s| {
            s.query = text;
            s.error = None;
            if blank {
                s.results.clear();
                s.is_loading = false;
            } else {
                s.is_loading = true;
            }
        });

        if !blank {
            self.deadline = Some(Instant::now() + self.debounce);
            debug!(generation = self.generation, "search timer armed");
        }
    }

    fn fire(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;

        let generation = self.generation;
        let query = self.state.borrow().query.clone();
        let token = self.shutdown.child_token();
        self.in_flight = Some(token.clone());

        debug!(generation, query = %query, "issuing search request");

        let fetcher = self.fetcher.clone();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => Err(FetchError::Cancelled),
                res = fetcher.fetch(&query, token.clone()) => res,
            };
            let _ = completions.send(Completion {
                generation,
                outcome,
            });
        });
    }

    fn apply(&mut self, done: Completion) {
        if done.generation != self.generation {
            debug!(
                generation = done.generation,
                current = self.generation,
                "dropping superseded search result"
            );
            return;
        }
        self.in_flight = None;

        match done.outcome {
            Ok(items) => {
                debug!(generation = done.generation, count = items.len(), "search results applied");
                self.state.send_modify(|s| {
                    s.results = items;
                    s.is_loading = false;
                });
            }
            Err(FetchError::Cancelled) => {
                debug!(generation = done.generation, "search request cancelled");
            }
            Err(e) => {
                warn!(generation = done.generation, "search request failed: {}", e);
                self.state.send_modify(|s| {
                    s.error = Some(FETCH_FAILED_MESSAGE.to_string());
                    s.is_loading = false;
                });
            }
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    fn teardown(&mut self) {
        self.deadline = None;
        self.cancel_in_flight();
        debug!("search controller stopped");
    }
}
