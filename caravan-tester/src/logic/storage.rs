use caravan_game::LeaderboardStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Leaderboard persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileLeaderboard {
    path: PathBuf,
}

impl FileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStore for FileLeaderboard {
    type Error = std::io::Error;

    fn load_raw(&self) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save_raw(&self, json: &str) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)
    }

    fn clear(&self) -> Result<(), Self::Error> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravan_game::{LeaderboardEntry, leaderboard};

    fn temp_board(label: &str) -> FileLeaderboard {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        FileLeaderboard::new(
            std::env::temp_dir()
                .join(format!("caravan-board-{label}-{nanos}"))
                .join("leaderboard.json"),
        )
    }

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            survived: true,
            party_survivors: 3,
            distance_traveled: 2000,
            date: "1848-10-02".to_string(),
        }
    }

    #[test]
    fn missing_file_is_an_empty_board() {
        let store = temp_board("missing");
        assert_eq!(store.load_raw().unwrap(), None);
        assert!(leaderboard::load(&store).unwrap().is_empty());
        store.clear().unwrap();
    }

    #[test]
    fn records_survive_a_reload() {
        let store = temp_board("reload");
        leaderboard::record(&store, entry("Abigail", 2100)).unwrap();
        leaderboard::record(&store, entry("Ezekiel", 3300)).unwrap();

        let board = leaderboard::load(&store).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board.entries()[0].name, "Ezekiel");

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(leaderboard::load(&store).unwrap().is_empty());
    }
}
