//! Sentinel observer feeding [`crate::pagination::InfiniteScroll`].

use crate::pagination::{InfiniteScroll, LoadTicket, ScrollOptions};
use dioxus::prelude::*;
use std::future::Future;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use crate::pagination::Observation;
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

#[cfg(target_arch = "wasm32")]
struct ObserverCleanup {
    observer: IntersectionObserver,
    sentinel: web_sys::Element,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

#[cfg(target_arch = "wasm32")]
impl ObserverCleanup {
    /// Observers only report threshold crossings. Re-observing yields a fresh
    /// report for a sentinel that never left the viewport.
    fn refresh(&self) {
        self.observer.unobserve(&self.sentinel);
        self.observer.observe(&self.sentinel);
    }
}

/// What [`use_infinite_scroll`] hands back to the listing.
#[derive(Clone, Copy)]
pub struct InfiniteScrollHandle {
    loading: Signal<bool>,
}

impl InfiniteScrollHandle {
    /// Reactive: components reading this re-render when a load starts or ends.
    pub fn is_loading(&self) -> bool {
        (self.loading)()
    }
}

/// Watches the element with id `sentinel_id` and calls `on_load_more` when it
/// scrolls into view. At most one load runs at a time.
///
/// The callback is captured on first render, so it should read signals rather
/// than close over plain values.
pub fn use_infinite_scroll<F, Fut>(
    sentinel_id: &str,
    options: ScrollOptions,
    on_load_more: F,
) -> InfiniteScrollHandle
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<(), String>> + 'static,
{
    let driver = use_hook(|| InfiniteScroll::new(options));
    let on_load_more = use_hook(|| Rc::new(on_load_more));
    // Observer callbacks only issue tickets; the load itself runs as a task of this scope.
    let mut pending = use_signal(|| None::<LoadTicket>);
    let mut loading = use_signal(|| false);
    #[cfg(target_arch = "wasm32")]
    let mut cleanup = use_signal(|| None::<ObserverCleanup>);

    use_effect(move || {
        if pending.read().is_none() {
            return;
        }
        let Some(ticket) = pending.write().take() else {
            return;
        };
        let load = on_load_more.clone();
        loading.set(true);
        spawn(async move {
            if let Err(e) = load().await {
                tracing::warn!("loading next page failed: {e}");
            }
            drop(ticket);
            loading.set(false);
            #[cfg(target_arch = "wasm32")]
            if let Some(attached) = cleanup.peek().as_ref() {
                attached.refresh();
            }
        });
    });

    #[cfg(target_arch = "wasm32")]
    {
        let sentinel_id = use_hook(|| sentinel_id.to_string());

        let observer_driver = driver.clone();
        use_effect(move || {
            if cleanup.peek().is_some() {
                return;
            }
            match attach_observer(&sentinel_id, observer_driver.clone(), pending) {
                Some(attached) => cleanup.set(Some(attached)),
                None => tracing::warn!("scroll sentinel `{sentinel_id}` not found"),
            }
        });

        let teardown_driver = driver.clone();
        use_drop(move || {
            teardown_driver.detach();
            if let Some(attached) = cleanup.write().take() {
                attached.observer.disconnect();
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = (sentinel_id, driver);

    InfiniteScrollHandle { loading }
}

#[cfg(target_arch = "wasm32")]
fn attach_observer(
    sentinel_id: &str,
    driver: InfiniteScroll,
    pending: Signal<Option<LoadTicket>>,
) -> Option<ObserverCleanup> {
    let sentinel = window()?.document()?.get_element_by_id(sentinel_id)?;

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(driver.options().threshold));
    init.set_root_margin(&driver.options().root_margin);

    let runtime = Runtime::current();
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let _guard = RuntimeGuard::new(runtime.clone());
            let mut pending = pending;
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let observation = Observation {
                    is_intersecting: entry.is_intersecting(),
                    visible_fraction: entry.intersection_ratio(),
                };
                let Some(ticket) = driver.observe(observation) else {
                    continue;
                };
                // A failed write drops the ticket, which re-arms the driver.
                if let Ok(mut slot) = pending.try_write() {
                    *slot = Some(ticket);
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).ok()?;
    observer.observe(&sentinel);

    Some(ObserverCleanup {
        observer,
        sentinel,
        _callback: callback,
    })
}

/// One-pixel marker placed after the last item of a paginated list.
#[component]
pub fn ScrollSentinel(id: String, loading: bool) -> Element {
    rsx! {
        div { id: "{id}", class: "w-full h-px", aria_busy: loading }
    }
}
