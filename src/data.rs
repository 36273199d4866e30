use prettytable::{cell, row, Row};

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistSummary {
    pub id: String,
    pub title: String,
}

impl PlaylistSummary {
    pub fn new(id: String, title: String) -> Self {
        PlaylistSummary { id, title }
    }
}

/// One page of a playlist listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistItemsPage {
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// Which `part` of a video resource a lookup asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPart {
    ContentDetails,
    Snippet,
    Statistics,
}

impl VideoPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoPart::ContentDetails => "contentDetails",
            VideoPart::Snippet => "snippet",
            VideoPart::Statistics => "statistics",
        }
    }
}

/// A video resource. Only the field matching the requested `VideoPart` is
/// filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoRecord {
    pub id: String,
    pub title: Option<String>,
    pub duration: Option<String>,
    pub view_count: Option<u64>,
}

impl VideoRecord {
    pub fn new(id: String) -> Self {
        VideoRecord {
            id,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_duration(mut self, duration: String) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_view_count(mut self, view_count: u64) -> Self {
        self.view_count = Some(view_count);
        self
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

/// A title listing entry as shown by the `titles` command.
#[derive(Debug)]
pub struct TitleEntry {
    title: String,
    video_id: String,
}

impl TitleEntry {
    pub fn new(title: String, video_id: String) -> Self {
        TitleEntry { title, video_id }
    }

    pub fn url(&self) -> String {
        watch_url(&self.video_id)
    }

    pub fn to_row(&self, i: usize) -> Row {
        row![format!("V{}", i), self.title, self.url()]
    }
}
