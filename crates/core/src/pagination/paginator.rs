use std::future::Future;

use duoadmin_domain::{AdminError, Result};
use tracing::{debug, trace};

/// Something that can fetch one page of a listing.
pub trait PageSource {
    type Item;

    fn fetch_page(
        &mut self,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Self::Item>>> + Send;
}

/// [`PageSource`] backed by a closure taking the offset.
pub struct PageFn<F>(F);

/// Wrap `f(offset)` as a [`PageSource`].
pub fn page_fn<F>(f: F) -> PageFn<F> {
    PageFn(f)
}

impl<F, Fut, T> PageSource for PageFn<F>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + Send,
{
    type Item = T;

    fn fetch_page(&mut self, offset: usize, _limit: usize) -> impl Future<Output = Result<Vec<T>>> + Send {
        (self.0)(offset)
    }
}

/// Lazy, restartable page sequence over a [`PageSource`].
pub struct Paginator<S> {
    source: S,
    page_size: usize,
    offset: usize,
    exhausted: bool,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(AdminError::InvalidRequest("page size must be at least 1".to_string()));
        }
        Ok(Self { source, page_size, offset: 0, exhausted: false })
    }

    /// Fetch the next page, or `None` once the listing is complete.
    ///
    /// A failed fetch ends the sequence; call [`restart`](Self::restart) to
    /// begin again from offset zero.
    pub async fn next_page(&mut self) -> Option<Result<Vec<S::Item>>> {
        if self.exhausted {
            return None;
        }

        let offset = self.offset;
        trace!(offset, limit = self.page_size, "fetching page");
        match self.source.fetch_page(offset, self.page_size).await {
            Ok(items) => {
                if items.len() < self.page_size {
                    self.exhausted = true;
                } else {
                    self.offset += self.page_size;
                }
                Some(Ok(items))
            }
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }

    pub fn restart(&mut self) {
        self.offset = 0;
        self.exhausted = false;
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Offset the next page will be requested at.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Collect every page in order into one list.
///
/// Nothing is returned on failure; a partial listing is never handed out.
pub async fn fetch_all<S: PageSource>(source: S, page_size: usize) -> Result<Vec<S::Item>> {
    let mut paginator = Paginator::new(source, page_size)?;
    let mut items = Vec::new();
    let mut pages = 0usize;

    while let Some(page) = paginator.next_page().await {
        items.extend(page?);
        pages += 1;
    }

    debug!(pages, items = items.len(), page_size, "listing complete");
    Ok(items)
}
