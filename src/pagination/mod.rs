//! Infinite-scroll driver and per-listing page cursor.

#[cfg(test)]
mod tests;

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// Observer configuration for the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollOptions {
    /// Visible fraction of the sentinel that counts as "reached".
    pub threshold: f64,
    /// CSS margin grown around the root so loads start early.
    pub root_margin: String,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "100px".to_string(),
        }
    }
}

/// One visibility report for the sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub is_intersecting: bool,
    pub visible_fraction: f64,
}

impl Observation {
    pub fn visible(visible_fraction: f64) -> Self {
        Self {
            is_intersecting: true,
            visible_fraction,
        }
    }

    pub fn hidden() -> Self {
        Self {
            is_intersecting: false,
            visible_fraction: 0.0,
        }
    }
}

/// Clears the in-flight flag when dropped, whatever the load's outcome.
#[derive(Debug)]
#[must_use = "the load counts as finished once the ticket is dropped"]
pub struct LoadTicket {
    in_flight: Rc<Cell<bool>>,
}

impl Drop for LoadTicket {
    fn drop(&mut self) {
        self.in_flight.set(false);
    }
}

/// Decides when a sentinel report should start a page load.
///
/// Clones share the in-flight flag, so an observer callback can hold one
/// while the owning component holds another.
#[derive(Debug, Clone)]
pub struct InfiniteScroll {
    options: ScrollOptions,
    in_flight: Rc<Cell<bool>>,
    attached: Rc<Cell<bool>>,
}

impl Default for InfiniteScroll {
    fn default() -> Self {
        Self::new(ScrollOptions::default())
    }
}

impl InfiniteScroll {
    pub fn new(options: ScrollOptions) -> Self {
        Self {
            options,
            in_flight: Rc::new(Cell::new(false)),
            attached: Rc::new(Cell::new(true)),
        }
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.get()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Stops every future trigger. A load already running finishes normally.
    pub fn detach(&self) {
        self.attached.set(false);
    }

    fn qualifies(&self, observation: Observation) -> bool {
        observation.is_intersecting
            && observation.visible_fraction + f64::EPSILON >= self.options.threshold
    }

    /// Returns a ticket when this report should start a load. Reports arriving
    /// while a ticket is alive are dropped, not queued.
    pub fn observe(&self, observation: Observation) -> Option<LoadTicket> {
        if !self.attached.get() || !self.qualifies(observation) || self.in_flight.get() {
            return None;
        }
        self.in_flight.set(true);
        Some(LoadTicket {
            in_flight: self.in_flight.clone(),
        })
    }

    /// Runs `on_load_more` for a qualifying report. Returns whether it ran.
    pub async fn handle<F, Fut>(&self, observation: Observation, on_load_more: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        let Some(_ticket) = self.observe(observation) else {
            return false;
        };

        if let Err(e) = on_load_more().await {
            tracing::warn!("loading next page failed: {e}");
        }
        true
    }
}

/// Page counter for one paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    has_more: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            has_more: true,
        }
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page the next load should request (1-based).
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Folds one page result into the cursor and hands back the items to append.
    ///
    /// Errors leave the cursor untouched so the same page is retried on the
    /// next trigger; only an empty page ends the listing.
    pub fn apply<T>(&mut self, result: Result<Vec<T>, String>) -> Vec<T> {
        match result {
            Ok(items) if items.is_empty() => {
                self.has_more = false;
                items
            }
            Ok(items) => {
                self.page += 1;
                items
            }
            Err(e) => {
                tracing::warn!(page = self.page, "page load failed: {e}");
                Vec::new()
            }
        }
    }
}
