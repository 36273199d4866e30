use crate::{
    batch, duration,
    error::{Error, Result},
    paginate,
    service::VideoService,
};
use tracing::info;

pub async fn resolve_channel<S: VideoService>(service: &S, user: &str) -> Result<String> {
    service
        .list_channel(user)
        .await?
        .into_iter()
        .next()
        .map(|channel| channel.id)
        .ok_or_else(|| Error::NotFound(format!("channel for user '{}'", user)))
}

/// Id of the first playlist whose title is exactly `name`.
pub async fn resolve_playlist<S: VideoService>(
    service: &S,
    channel_id: &str,
    name: &str,
) -> Result<String> {
    let playlist = service
        .list_playlists(channel_id)
        .await?
        .into_iter()
        .find(|playlist| playlist.title == name)
        .ok_or_else(|| Error::NotFound(format!("playlist '{}'", name)))?;

    info!("Playlist: {} (ID: {})", playlist.title, playlist.id);
    Ok(playlist.id)
}

async fn playlist_video_ids<S: VideoService>(
    service: &S,
    user: &str,
    playlist_name: &str,
    page_size: u32,
) -> Result<Vec<String>> {
    let channel_id = resolve_channel(service, user).await?;
    let playlist_id = resolve_playlist(service, &channel_id, playlist_name).await?;
    paginate::collect_video_ids(service, &playlist_id, page_size).await
}

/// Total running time of a user's playlist, formatted like `"2h 10m"`.
pub async fn total_duration<S: VideoService>(
    service: &S,
    user: &str,
    playlist_name: &str,
    page_size: u32,
) -> Result<String> {
    let ids = playlist_video_ids(service, user, playlist_name, page_size).await?;
    let minutes = batch::total_minutes(service, &ids).await?;
    info!(videos = ids.len(), minutes, "summed playlist duration");
    Ok(duration::format(minutes))
}

/// Id of the most viewed video in a user's playlist.
///
/// Hidden view counts count as zero. On a tie the earlier video wins.
pub async fn most_viewed<S: VideoService>(
    service: &S,
    user: &str,
    playlist_name: &str,
    page_size: u32,
) -> Result<String> {
    let ids = playlist_video_ids(service, user, playlist_name, page_size).await?;
    let records = batch::video_statistics(service, &ids).await?;

    let mut best: Option<(u64, String)> = None;
    for record in records {
        let views = record.view_count.unwrap_or(0);
        let replace = match &best {
            Some((most, _)) => views > *most,
            None => true,
        };
        if replace {
            best = Some((views, record.id));
        }
    }

    let (views, id) =
        best.ok_or_else(|| Error::NotFound(format!("videos of playlist '{}'", playlist_name)))?;
    info!(video_id = %id, views, "most viewed video");
    Ok(id)
}
