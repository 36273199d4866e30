use crate::{
    error::{Error, Result},
    service::VideoService,
};
use futures::{stream, Stream, TryStreamExt};
use std::future::Future;
use tracing::debug;

/// Upper bound on pages followed before a listing is considered runaway.
pub const DEFAULT_MAX_PAGES: usize = 1000;

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Streams pages from `list_page`, feeding each continuation token back in
/// until the service stops returning one.
///
/// Fails with `Error::PaginationLimit` instead of requesting page
/// `max_pages + 1`.
pub fn pages<T, F, Fut>(mut list_page: F, max_pages: usize) -> impl Stream<Item = Result<Vec<T>>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>)>>,
{
    stream::try_unfold((Cursor::Start, 0usize), move |(cursor, fetched)| {
        let request = match cursor {
            Cursor::Done => Ok(None),
            _ if fetched >= max_pages => Err(Error::PaginationLimit(max_pages)),
            Cursor::Start => Ok(Some(list_page(None))),
            Cursor::Next(token) => Ok(Some(list_page(Some(token)))),
        };

        async move {
            let request = match request {
                Err(e) => return Err(e),
                Ok(Some(request)) => request,
                Ok(None) => return Ok(None),
            };
            let (items, next_token) = request.await?;
            debug!(page = fetched, items = items.len(), "fetched page");

            let cursor = match next_token {
                Some(token) if !token.is_empty() => Cursor::Next(token),
                _ => Cursor::Done,
            };
            Ok(Some((items, (cursor, fetched + 1))))
        }
    })
}

/// Flattens every page into one sequence, keeping page order.
pub async fn collect<T, F, Fut>(list_page: F, max_pages: usize) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>)>>,
{
    pages(list_page, max_pages)
        .try_fold(Vec::new(), |mut acc, mut items| async move {
            acc.append(&mut items);
            Ok(acc)
        })
        .await
}

/// All video ids of a playlist, in playlist order. Duplicates are kept.
pub async fn collect_video_ids<S: VideoService>(
    service: &S,
    playlist_id: &str,
    page_size: u32,
) -> Result<Vec<String>> {
    let ids = collect(
        move |token| async move {
            let page = service
                .list_playlist_items(playlist_id, token, page_size)
                .await?;
            Ok::<_, Error>((page.video_ids, page.next_page_token))
        },
        DEFAULT_MAX_PAGES,
    )
    .await?;

    debug!(playlist_id, count = ids.len(), "collected video ids");
    Ok(ids)
}
