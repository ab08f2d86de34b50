//! Cursor-driven traversal of list endpoints.
//!
//! Any operation that takes a cursor and returns a [`Page`] can be walked
//! with [`paginate`] (blocking, an `Iterator`) or [`paginate_stream`]
//! (cooperative, a `Stream`). Both request the first page with no cursor,
//! hand back items in server order, and feed the returned cursor into the
//! next request until the remote returns none.
//!
//! Pages are fetched only when the consumer asks for an item the buffered
//! page cannot supply; nothing is prefetched. Once `max_total` items have
//! been produced no further request is issued. A failed page request is
//! yielded once as `Err` and ends the traversal; it is not retried.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::QueryValue;

/// Opaque position token returned by a list endpoint.
///
/// Only ever round-tripped from one response to the next request.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Cursor(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Cursor(value.to_string())
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor({:?})", self.0)
    }
}

impl From<Cursor> for QueryValue {
    fn from(value: Cursor) -> Self {
        QueryValue::Text(value.0)
    }
}

impl From<&Cursor> for QueryValue {
    fn from(value: &Cursor) -> Self {
        QueryValue::Text(value.0.clone())
    }
}

/// One page of a cursor-paginated listing.
pub trait Page {
    type Item;

    /// Items in server order, and the cursor of the next page (`None` at the
    /// end of the listing).
    fn into_parts(self) -> (Vec<Self::Item>, Option<Cursor>);
}

/// The list envelope shared by the remote's list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    #[serde(default)]
    pub object: Option<String>,
    pub items: Vec<T>,
    #[serde(default)]
    pub cursor: Option<Cursor>,
}

impl<T> Page for CursorPage<T> {
    type Item = T;

    fn into_parts(self) -> (Vec<T>, Option<Cursor>) {
        (self.items, self.cursor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    More,
    Done,
}

/// Blocking, forward-only traversal. Created by [`paginate`].
///
/// Not restartable: walking the listing again needs a new `paginate` call,
/// which starts over from the first page.
pub struct Paginator<F, P: Page> {
    fetch: F,
    buffer: VecDeque<P::Item>,
    cursor: Option<Cursor>,
    state: State,
    yielded: usize,
    max_total: Option<usize>,
    pages: usize,
}

/// Walk every item of a cursor-paginated operation, blocking per page.
///
/// `fetch` receives `None` for the first page and the previous page's cursor
/// afterwards; any other parameters are captured by the closure.
///
/// ```
/// use comm_core::{paginate, CursorPage, Error};
///
/// let pages = vec![
///     CursorPage { object: None, items: vec![1, 2], cursor: Some("x".into()) },
///     CursorPage { object: None, items: vec![3], cursor: None },
/// ];
/// let mut pages = pages.into_iter();
/// let items: Result<Vec<i32>, Error> =
///     paginate(|_cursor| Ok(pages.next().unwrap()), None).collect();
/// assert_eq!(items.unwrap(), vec![1, 2, 3]);
/// ```
pub fn paginate<F, P>(fetch: F, max_total: Option<usize>) -> Paginator<F, P>
where
    F: FnMut(Option<Cursor>) -> Result<P, Error>,
    P: Page,
{
    Paginator {
        fetch,
        buffer: VecDeque::new(),
        cursor: None,
        state: State::Start,
        yielded: 0,
        max_total,
        pages: 0,
    }
}

impl<F, P: Page> Paginator<F, P> {
    /// Pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    fn capped(&self) -> bool {
        self.max_total.is_some_and(|max| self.yielded >= max)
    }
}

impl<F, P> Iterator for Paginator<F, P>
where
    F: FnMut(Option<Cursor>) -> Result<P, Error>,
    P: Page,
{
    type Item = Result<P::Item, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.capped() {
                self.state = State::Done;
                self.buffer.clear();
                return None;
            }
            if let Some(item) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(Ok(item));
            }
            if self.state == State::Done {
                return None;
            }

            self.pages += 1;
            match (self.fetch)(self.cursor.take()) {
                Ok(page) => {
                    let (items, next) = page.into_parts();
                    tracing::trace!(
                        page = self.pages,
                        items = items.len(),
                        has_next = next.is_some(),
                        "pagination.page"
                    );
                    self.buffer.extend(items);
                    self.state = if next.is_some() { State::More } else { State::Done };
                    self.cursor = next;
                }
                Err(err) => {
                    self.state = State::Done;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<F, P> std::iter::FusedIterator for Paginator<F, P>
where
    F: FnMut(Option<Cursor>) -> Result<P, Error>,
    P: Page,
{
}

/// Cooperative counterpart of [`paginate`].
///
/// The returned stream awaits one page request at a time, only when polled
/// past the end of the current page. Dropping the stream cancels any page
/// request in flight.
pub fn paginate_stream<F, Fut, P>(
    mut fetch: F,
    max_total: Option<usize>,
) -> impl Stream<Item = Result<P::Item, Error>>
where
    F: FnMut(Option<Cursor>) -> Fut,
    Fut: Future<Output = Result<P, Error>>,
    P: Page,
{
    async_stream::try_stream! {
        let mut cursor: Option<Cursor> = None;
        let mut yielded = 0usize;
        let mut page_no = 0usize;
        'pages: loop {
            if max_total.is_some_and(|max| yielded >= max) {
                break 'pages;
            }
            page_no += 1;
            let page = fetch(cursor.take()).await?;
            let (items, next) = page.into_parts();
            tracing::trace!(
                page = page_no,
                items = items.len(),
                has_next = next.is_some(),
                "pagination.page"
            );
            for item in items {
                yield item;
                yielded += 1;
                if max_total.is_some_and(|max| yielded >= max) {
                    break 'pages;
                }
            }
            match next {
                Some(next) => cursor = Some(next),
                None => break 'pages,
            }
        }
    }
}
