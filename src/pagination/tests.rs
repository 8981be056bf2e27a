use super::*;
use std::cell::Cell;
use std::rc::Rc;

fn counting_load(calls: &Rc<Cell<u32>>) -> impl FnOnce() -> std::future::Ready<Result<(), String>> {
    let calls = calls.clone();
    move || {
        calls.set(calls.get() + 1);
        std::future::ready(Ok(()))
    }
}

#[test]
fn defaults_match_preload_margin() {
    let options = ScrollOptions::default();
    assert_eq!(options.threshold, 0.1);
    assert_eq!(options.root_margin, "100px");
}

#[test]
fn only_qualifying_reports_issue_tickets() {
    let driver = InfiniteScroll::new(ScrollOptions {
        threshold: 0.5,
        root_margin: "0px".into(),
    });
    assert!(driver.observe(Observation::hidden()).is_none());
    assert!(driver.observe(Observation::visible(0.2)).is_none());
    let ticket = driver.observe(Observation::visible(0.5));
    assert!(ticket.is_some());
    assert!(driver.is_loading());
}

#[test]
fn ticket_blocks_overlap_until_dropped() {
    let driver = InfiniteScroll::default();
    let ticket = driver.observe(Observation::visible(1.0)).unwrap();
    assert!(driver.observe(Observation::visible(1.0)).is_none());
    assert!(driver.clone().observe(Observation::visible(1.0)).is_none());
    drop(ticket);
    assert!(!driver.is_loading());
    assert!(driver.observe(Observation::visible(1.0)).is_some());
}

#[test]
fn detached_driver_never_triggers() {
    let driver = InfiniteScroll::default();
    let observer_side = driver.clone();
    driver.detach();
    assert!(!observer_side.is_attached());
    assert!(observer_side.observe(Observation::visible(1.0)).is_none());
}

#[tokio::test]
async fn overlapping_reports_start_one_load() {
    let driver = InfiniteScroll::default();
    let calls = Rc::new(Cell::new(0u32));
    let (release, gate) = tokio::sync::oneshot::channel::<()>();

    let counter = calls.clone();
    let first = driver.handle(Observation::visible(1.0), move || {
        counter.set(counter.get() + 1);
        async move { gate.await.map_err(|e| e.to_string()) }
    });
    futures_util::pin_mut!(first);
    assert!(futures_util::poll!(first.as_mut()).is_pending());
    assert!(driver.is_loading());

    let second = driver
        .handle(Observation::visible(1.0), counting_load(&calls))
        .await;
    assert!(!second);
    assert_eq!(calls.get(), 1);

    release.send(()).unwrap();
    assert!(first.await);
    assert_eq!(calls.get(), 1);
    assert!(!driver.is_loading());
}

#[tokio::test]
async fn failed_load_clears_the_flag() {
    let driver = InfiniteScroll::default();
    let ran = driver
        .handle(Observation::visible(1.0), || async {
            Err::<(), _>("HTTP 503".to_string())
        })
        .await;
    assert!(ran);
    assert!(!driver.is_loading());

    let calls = Rc::new(Cell::new(0u32));
    assert!(
        driver
            .handle(Observation::visible(1.0), counting_load(&calls))
            .await
    );
    assert_eq!(calls.get(), 1);
}

#[test]
fn cursor_advances_on_results_and_stops_on_empty_page() {
    let mut cursor = PageCursor::new();
    assert_eq!(cursor.page(), 1);

    let items = cursor.apply(Ok(vec!["a", "b"]));
    assert_eq!(items, vec!["a", "b"]);
    assert_eq!(cursor.page(), 2);
    assert!(cursor.has_more());

    let items: Vec<&str> = cursor.apply(Ok(Vec::new()));
    assert!(items.is_empty());
    assert_eq!(cursor.page(), 2);
    assert!(!cursor.has_more());

    cursor.reset();
    assert_eq!(cursor, PageCursor::default());
}

#[test]
fn cursor_keeps_page_after_error() {
    let mut cursor = PageCursor::new();
    cursor.apply(Ok(vec![1]));
    let items: Vec<i32> = cursor.apply(Err("HTTP 500".to_string()));
    assert!(items.is_empty());
    assert_eq!(cursor.page(), 2);
    assert!(cursor.has_more());
}

#[tokio::test]
async fn sentinel_still_visible_after_a_load_requests_the_next_page() {
    let driver = InfiniteScroll::default();
    let cursor = Rc::new(std::cell::RefCell::new(PageCursor::new()));
    let requested = Rc::new(std::cell::RefCell::new(Vec::new()));

    // Short first page: the sentinel never leaves the viewport, so every
    // fresh report after a finished load is still a visible one.
    for _ in 0..2 {
        let cursor = cursor.clone();
        let requested = requested.clone();
        let ran = driver
            .handle(Observation::visible(1.0), move || {
                let page = cursor.borrow().page();
                requested.borrow_mut().push(page);
                cursor.borrow_mut().apply(Ok(vec![page]));
                std::future::ready(Ok(()))
            })
            .await;
        assert!(ran);
    }

    assert_eq!(*requested.borrow(), vec![1, 2]);
    assert_eq!(cursor.borrow().page(), 3);
    assert!(!driver.is_loading());
}
