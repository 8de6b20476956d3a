use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PlaylistItem {
    pub path: PathBuf,
    pub title: String,
}

/// Tracks given on the command line, played in order.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    pub items: Vec<PlaylistItem>,
    pub current: Option<usize>,
}

impl Playlist {
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        let items = paths
            .into_iter()
            .map(|path| {
                let title = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Unknown")
                    .to_string();
                PlaylistItem { path, title }
            })
            .collect();
        Self { items, current: None }
    }

    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.current.and_then(|i| self.items.get(i))
    }

    pub fn current_path(&self) -> Option<&PathBuf> {
        self.current_item().map(|it| &it.path)
    }

    /// Next index in order; `None` past the last track.
    pub fn next_index_sequence(&self) -> Option<usize> {
        match self.current {
            None if !self.items.is_empty() => Some(0),
            None => None,
            Some(cur) => (cur + 1 < self.items.len()).then_some(cur + 1),
        }
    }
}
