use crate::{
    data::{VideoPart, VideoRecord},
    duration,
    error::{Error, Result},
    service::VideoService,
};
use std::future::Future;
use tracing::debug;

/// Most ids the videos endpoint accepts in one call.
pub const MAX_BATCH_SIZE: usize = 50;

/// Splits `ids` into consecutive chunks of at most `batch_size` and calls
/// `fetch` once per chunk, in order.
///
/// Items are appended in whatever order the service returns them. An empty
/// `ids` is rejected before `fetch` is ever called.
pub async fn lookup_batches<T, F, Fut>(
    ids: &[String],
    batch_size: usize,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    if ids.is_empty() {
        return Err(Error::InvalidArgument(
            "video id list cannot be empty".to_owned(),
        ));
    }
    if batch_size == 0 {
        return Err(Error::InvalidArgument(
            "batch size must be at least 1".to_owned(),
        ));
    }

    let mut results = Vec::with_capacity(ids.len());
    for (i, batch) in ids.chunks(batch_size).enumerate() {
        debug!(batch = i, size = batch.len(), "looking up videos");
        let mut items = fetch(batch.to_vec()).await?;
        results.append(&mut items);
    }
    Ok(results)
}

async fn lookup_videos<S: VideoService>(
    service: &S,
    ids: &[String],
    part: VideoPart,
) -> Result<Vec<VideoRecord>> {
    lookup_batches(ids, MAX_BATCH_SIZE, move |batch| async move {
        service.list_videos(&batch, part).await
    })
    .await
}

pub async fn video_snippets<S: VideoService>(
    service: &S,
    ids: &[String],
) -> Result<Vec<VideoRecord>> {
    lookup_videos(service, ids, VideoPart::Snippet).await
}

/// Titles of the given videos, in the order the service reports them.
pub async fn video_titles<S: VideoService>(service: &S, ids: &[String]) -> Result<Vec<String>> {
    let records = video_snippets(service, ids).await?;
    Ok(records
        .into_iter()
        .map(|record| record.title.unwrap_or_default())
        .collect())
}

/// Summed duration of the given videos, in minutes.
pub async fn total_minutes<S: VideoService>(service: &S, ids: &[String]) -> Result<f64> {
    let records = lookup_videos(service, ids, VideoPart::ContentDetails).await?;
    Ok(records
        .iter()
        .map(|record| duration::parse(record.duration.as_deref().unwrap_or_default()))
        .sum())
}

pub async fn video_statistics<S: VideoService>(
    service: &S,
    ids: &[String],
) -> Result<Vec<VideoRecord>> {
    lookup_videos(service, ids, VideoPart::Statistics).await
}
