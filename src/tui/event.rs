/// This file is based on https://github.com/ratatui/templates/blob/main/event-driven/template/src/event.rs
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use ratatui::crossterm::event::{self, Event as CrosstermEvent};
use tokio::sync::mpsc as tokio_mpsc;

use crate::characters::CharacterPage;
use crate::picker::PageRequest;
use crate::ports::characters::CharacterSource;

const TIMEOUT: Duration = Duration::from_millis(250);

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// Crossterm events.
    ///
    /// These events are emitted by the terminal.
    Crossterm(CrosstermEvent),
    /// Application events.
    ///
    /// Queued by key handlers and processed on the next loop iteration.
    App(AppEvent),
    /// Background events.
    ///
    /// These events are emitted by the background task.
    Background(BackgroundEvent),
}

/// Application events.
#[derive(Clone, Debug)]
pub enum AppEvent {
    /// Retry the page load that failed.
    Retry,
}

/// Background events.
#[derive(Clone, Debug)]
pub enum BackgroundEvent {
    Page(PageEvent),
}

/// Outcome of a page fetch, tagged with the generation of its request.
#[derive(Clone, Debug)]
pub enum PageEvent {
    Loaded { generation: u64, page: CharacterPage },
    Failed { generation: u64, error: String },
}

#[derive(Clone, Debug)]
pub enum BackgroundRequest {
    /// Fetch one page of characters.
    FetchPage(PageRequest),
}

/// Terminal event handler.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::Sender<Event>,
    /// Event receiver channel.
    receiver: mpsc::Receiver<Event>,
    /// Background request channel.
    background_sender: tokio_mpsc::UnboundedSender<BackgroundRequest>,
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`].
    ///
    /// Spawns a thread reading terminal events and a task on the current tokio runtime that
    /// runs page fetches against `source`.
    pub fn new(source: Arc<dyn CharacterSource>) -> Self {
        let (sender, receiver) = mpsc::channel();

        let cross_term_actor = CrosstermEventThread::new(sender.clone());
        thread::spawn(|| {
            if let Err(error) = cross_term_actor.run() {
                log::error!("Terminal event thread stopped: {:#}", error);
            }
        });

        let (background_sender, background_receiver) = tokio_mpsc::unbounded_channel();
        let background_actor = BackgroundTask::new(background_receiver, sender.clone(), source);
        tokio::spawn(background_actor.run());

        Self {
            sender,
            receiver,
            background_sender,
        }
    }

    /// An event handler with no terminal thread and no background task.
    ///
    /// Background requests are handed to the returned receiver instead.
    #[cfg(test)]
    pub fn detached() -> (Self, tokio_mpsc::UnboundedReceiver<BackgroundRequest>) {
        let (sender, receiver) = mpsc::channel();
        let (background_sender, background_receiver) = tokio_mpsc::unbounded_channel();
        (
            Self {
                sender,
                receiver,
                background_sender,
            },
            background_receiver,
        )
    }

    /// Receives an event from the sender.
    ///
    /// This function blocks until an event is received.
    ///
    /// # Errors
    ///
    /// This function returns an error if the sender channel is disconnected. This can happen if an
    /// error occurs in the event thread. In practice, this should not happen unless there is a
    /// problem with the underlying terminal.
    pub fn next(&self) -> Result<Event> {
        self.receiver.recv().wrap_err("failed to receive event")
    }

    /// Receives an event, giving up after `timeout`.
    ///
    /// Without a timeout this blocks like [`EventHandler::next`]. Returns `None` when the
    /// timeout elapsed first.
    pub fn next_timeout(&self, timeout: Option<Duration>) -> Result<Option<Event>> {
        let Some(timeout) = timeout else {
            return self.next().map(Some);
        };
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(eyre!("event channel disconnected")),
        }
    }

    /// Queue an app event to be sent to the event receiver.
    ///
    /// This is useful for sending events to the event handler which will be processed by the next
    /// iteration of the application's event loop.
    pub fn send(&mut self, app_event: AppEvent) {
        // Ignore the result as the receiver cannot be dropped while this struct still has a
        // reference to it
        let _ = self.sender.send(Event::App(app_event));
    }

    /// Queue a request for the background task.
    pub fn send_background_request(&mut self, request: BackgroundRequest) {
        if self.background_sender.send(request).is_err() {
            log::error!("Background task is gone, request dropped");
        }
    }
}

/// A thread that handles reading crossterm events
struct CrosstermEventThread {
    /// Event sender channel.
    sender: mpsc::Sender<Event>,
}

impl CrosstermEventThread {
    /// Constructs a new instance of [`CrosstermEventThread`].
    fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Runs the event thread.
    ///
    /// Polls for crossterm events until the receiving side is dropped.
    fn run(self) -> Result<()> {
        loop {
            if event::poll(TIMEOUT).wrap_err("failed to poll for crossterm events")? {
                let event = event::read().wrap_err("failed to read crossterm event")?;
                if self.sender.send(Event::Crossterm(event)).is_err() {
                    // Shutting down the app drops the receiver.
                    return Ok(());
                }
            }
        }
    }
}

struct BackgroundTask {
    /// Background request receiver channel.
    requests: tokio_mpsc::UnboundedReceiver<BackgroundRequest>,
    /// Event sender channel.
    sender: mpsc::Sender<Event>,
    /// Where pages come from.
    source: Arc<dyn CharacterSource>,
}

impl BackgroundTask {
    /// Constructs a new instance of [`BackgroundTask`].
    fn new(
        requests: tokio_mpsc::UnboundedReceiver<BackgroundRequest>,
        sender: mpsc::Sender<Event>,
        source: Arc<dyn CharacterSource>,
    ) -> Self {
        Self {
            requests,
            sender,
            source,
        }
    }

    /// Runs until the event handler is dropped.
    ///
    /// Each fetch runs in its own task, so a slow response for an outdated search does not
    /// hold back the request for the current one.
    async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            match request {
                BackgroundRequest::FetchPage(request) => {
                    tokio::spawn(fetch_page(
                        self.source.clone(),
                        self.sender.clone(),
                        request,
                    ));
                }
            }
        }
        log::debug!("Background task stopped");
    }
}

async fn fetch_page(
    source: Arc<dyn CharacterSource>,
    sender: mpsc::Sender<Event>,
    request: PageRequest,
) {
    let event = match source.fetch_page(&request.url).await {
        Ok(page) => PageEvent::Loaded {
            generation: request.generation,
            page,
        },
        Err(error) => {
            log::warn!("Fetching {} failed: {}", request.url, error);
            PageEvent::Failed {
                generation: request.generation,
                error: error.to_string(),
            }
        }
    };
    let _ = sender.send(Event::Background(BackgroundEvent::Page(event)));
}
