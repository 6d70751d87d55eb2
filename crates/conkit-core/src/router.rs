//! Input routing across independently running components.
//!
//! The router owns the physical [`EventSource`]. A poller thread reads it and
//! forwards every event to the router loop, which pushes it into the bounded
//! queue of the active component. Each component runs [`Component::run`] on
//! its own thread; when the last one returns the router's `run` returns.
//!
//! The first registered component is the active one and stays active. The
//! other components receive no input.

use crate::error::{ConsoleError, ConsoleResult};
use crate::key::Event;
use crate::surface::EventSource;
use crossbeam_channel::{bounded, select, unbounded, Receiver, SendError, Sender};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Default capacity of every component queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Index of the component that receives input
const ACTIVE_COMPONENT: usize = 0;

/// Receiving end of a component's private event queue
#[derive(Debug, Clone)]
pub struct EventQueue {
    receiver: Receiver<Event>,
}

/// Sending end paired with an [`EventQueue`]
#[derive(Debug, Clone)]
pub struct QueueSender {
    sender: Sender<Event>,
}

impl QueueSender {
    /// Blocks while the queue is full
    pub fn send(&self, event: Event) -> Result<(), SendError<Event>> {
        self.sender.send(event)
    }
}

impl EventQueue {
    /// Create a bounded queue holding at most `capacity` pending events
    pub fn channel(capacity: usize) -> (QueueSender, EventQueue) {
        let (sender, receiver) = bounded(capacity);
        (QueueSender { sender }, EventQueue { receiver })
    }

    /// Block for the next event; `None` once every sender is gone
    pub fn poll_event(&self) -> Option<Event> {
        self.receiver.recv().ok()
    }

    /// Next event if one is already queued
    pub fn try_poll_event(&self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// A UI component driven by its own event queue
pub trait Component: Send {
    /// Name used for the component's thread and in errors
    fn name(&self) -> &str {
        "component"
    }

    /// Consume events until done. Returning ends the component.
    fn run(&mut self, queue: &EventQueue) -> ConsoleResult<()>;
}

struct Registration {
    component: Box<dyn Component>,
    sender: QueueSender,
    queue: EventQueue,
}

/// Decrements the live count when a component thread ends, panics included.
/// The last one out signals termination.
struct LiveGuard {
    live: Arc<AtomicUsize>,
    done: Sender<ConsoleResult<()>>,
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        if self.live.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!("EventRouter: last component finished");
            let _ = self.done.send(Ok(()));
        }
    }
}

pub struct EventRouter {
    source: Arc<dyn EventSource>,
    registrations: Vec<Registration>,
    queue_capacity: usize,
}

impl EventRouter {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            registrations: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Capacity of component queues registered after this call. Zero is
    /// raised to one.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Add a component. The first one registered receives all input.
    pub fn register(&mut self, component: impl Component + 'static) -> &mut Self {
        let (sender, queue) = EventQueue::channel(self.queue_capacity);
        debug!(
            "EventRouter: registered '{}' at index {}",
            component.name(),
            self.registrations.len()
        );
        self.registrations.push(Registration {
            component: Box::new(component),
            sender,
            queue,
        });
        self
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn active_index(&self) -> usize {
        ACTIVE_COMPONENT
    }

    /// Run every component on its own thread and route input to the active
    /// one. Returns once all components have finished, or with the first
    /// component or input failure.
    pub fn run(self) -> ConsoleResult<()> {
        if self.registrations.is_empty() {
            warn!("EventRouter: run called with no components");
            return Ok(());
        }

        let live = Arc::new(AtomicUsize::new(self.registrations.len()));
        let (done_tx, done_rx) = unbounded::<ConsoleResult<()>>();
        let (input_tx, input_rx) = bounded::<ConsoleResult<Event>>(self.queue_capacity);

        let mut senders = Vec::with_capacity(self.registrations.len());
        let mut handles = Vec::with_capacity(self.registrations.len());
        for (index, registration) in self.registrations.into_iter().enumerate() {
            let Registration {
                mut component,
                sender,
                queue,
            } = registration;
            senders.push(sender);

            let guard = LiveGuard {
                live: Arc::clone(&live),
                done: done_tx.clone(),
            };
            let done = done_tx.clone();
            let name = component.name().to_string();
            let handle = thread::Builder::new()
                .name(format!("conkit-{name}-{index}"))
                .spawn(move || {
                    let _guard = guard;
                    if let Err(e) = component.run(&queue) {
                        error!("EventRouter: component '{name}' failed: {e}");
                        let _ = done.send(Err(ConsoleError::ComponentFailed {
                            name,
                            reason: e.to_string(),
                        }));
                    }
                })
                .map_err(|e| ConsoleError::ThreadError(format!("failed to spawn component: {e}")))?;
            handles.push(handle);
        }
        drop(done_tx);

        let source = Arc::clone(&self.source);
        thread::Builder::new()
            .name("conkit-input".to_string())
            .spawn(move || loop {
                let event = source.poll_event();
                let fatal = event.is_err();
                if input_tx.send(event).is_err() || fatal {
                    break;
                }
            })
            .map_err(|e| ConsoleError::ThreadError(format!("failed to spawn input poller: {e}")))?;

        info!("EventRouter: running {} components", senders.len());
        let active = &senders[ACTIVE_COMPONENT];

        loop {
            select! {
                recv(input_rx) -> message => match message {
                    Ok(Ok(event)) => {
                        if active.send(event).is_err() {
                            warn!("EventRouter: active component has stopped, dropping {event:?}");
                        }
                    }
                    Ok(Err(e)) => {
                        error!("EventRouter: input failed: {e}");
                        return Err(e);
                    }
                    Err(_) => {
                        return Err(ConsoleError::ThreadError("input poller stopped".to_string()));
                    }
                },
                recv(done_rx) -> message => {
                    let result = message.unwrap_or(Ok(()));
                    if result.is_ok() {
                        for handle in handles {
                            if handle.join().is_err() {
                                warn!("EventRouter: a component thread panicked");
                            }
                        }
                        info!("EventRouter: all components finished");
                    }
                    return result;
                }
            }
        }
    }
}
