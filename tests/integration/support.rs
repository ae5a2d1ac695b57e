//! Shared fixtures: a scripted in-memory fetcher and an event recorder

use async_trait::async_trait;
use site_sweep::crawler::{EventHandler, Fetcher};
use site_sweep::state::PageDetails;
use site_sweep::FetchError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What the scripted fetcher does for one URL
#[derive(Clone)]
pub enum Script {
    Page(PageDetails),
    Fail(&'static str),
    /// Never completes; only cancellation ends it
    Block,
    /// Blocks the worker thread without yielding
    Stall(Duration),
}

/// Fetcher that serves a fixed site graph keyed by canonical URL
///
/// Unknown URLs load with a 404 error.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
    started: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every scripted page take `delay` to load
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn page(mut self, url: &str, details: PageDetails) -> Self {
        self.pages.insert(url.to_string(), Script::Page(details));
        self
    }

    pub fn fail(mut self, url: &str, message: &'static str) -> Self {
        self.pages.insert(url.to_string(), Script::Fail(message));
        self
    }

    pub fn block(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Script::Block);
        self
    }

    pub fn stall(mut self, url: &str, duration: Duration) -> Self {
        self.pages.insert(url.to_string(), Script::Stall(duration));
        self
    }

    /// Every URL fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.calls().iter().filter(|u| u.as_str() == url).count()
    }

    /// Number of fetches that have begun
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        url: &str,
        _cancel: &CancellationToken,
    ) -> Result<PageDetails, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.started.fetch_add(1, Ordering::SeqCst);

        match self.pages.get(url).cloned() {
            Some(Script::Page(details)) => {
                match self.delay {
                    Some(delay) => tokio::time::sleep(delay).await,
                    None => tokio::task::yield_now().await,
                }
                Ok(details)
            }
            Some(Script::Fail(message)) => Err(FetchError::Other {
                url: url.to_string(),
                message: message.to_string(),
            }),
            Some(Script::Block) => std::future::pending().await,
            Some(Script::Stall(duration)) => {
                std::thread::sleep(duration);
                Ok(PageDetails::default())
            }
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// One observed engine event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Progress(usize),
    Complete { processed: usize, canceled: bool },
}

/// Event handler that records everything it sees
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn completions(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Complete { .. }))
            .collect()
    }
}

impl EventHandler for Recorder {
    fn on_progress(&self, processed: usize) {
        self.events.lock().unwrap().push(Event::Progress(processed));
    }

    fn on_complete(&self, processed: usize, canceled: bool) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Complete { processed, canceled });
    }
}

/// Builds a ring of `n` pages where page i links to i+1 and 3i, all under `site`
pub fn ring_site(site: &str, n: usize) -> ScriptedFetcher {
    let mut fetcher = ScriptedFetcher::new();
    for i in 0..n {
        let details = PageDetails::titled(format!("Page {}", i))
            .with_link(format!("{}/p{}", site, (i + 1) % n))
            .with_link(format!("{}/p{}/", site, (i * 3) % n));
        fetcher = fetcher.page(&format!("{}/p{}", site, i), details);
    }
    fetcher.page(
        site,
        PageDetails::titled("Home").with_link(format!("{}/p0", site)),
    )
}
