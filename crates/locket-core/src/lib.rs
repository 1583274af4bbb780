pub mod catalog;
pub mod defaults;
pub mod embed;
pub mod game;
pub mod game_config;
pub mod manifest;
pub mod scores;
pub mod selection;
pub mod source;
pub mod tuning;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::path::{Path, PathBuf};

    use crate::game::{Difficulty, GameDescriptor, GameId};

    /// Create a descriptor whose slug equals its id.
    pub fn make_game(
        id: &str,
        title: &str,
        category: &str,
        difficulty: Difficulty,
    ) -> GameDescriptor {
        GameDescriptor {
            id: GameId::from(id),
            title: title.to_string(),
            slug: id.to_string(),
            display_icon: String::new(),
            short_desc: format!("{title} test game"),
            play_url: format!("{id}/index.html"),
            category: category.to_string(),
            difficulty,
            estimated_play_time: "1-2 minutes".to_string(),
        }
    }

    /// The two-game manifest used in the catalog examples.
    pub fn example_manifest_json() -> &'static str {
        r#"{"games": [
            {"id": "brick-blaster", "title": "Brick Blaster", "slug": "brick-blaster",
             "displayIcon": "B", "shortDesc": "Brick breaker",
             "playUrl": "brick-blaster/index.html",
             "category": "arcade", "difficulty": "easy", "estimatedPlayTime": "5-10 minutes"},
            {"id": "ludo-blitz", "title": "Ludo Blitz", "slug": "ludo-blitz",
             "displayIcon": "L", "shortDesc": "Fast Ludo", "playUrl": "ludo-blitz/index.html",
             "category": "board", "difficulty": "easy", "estimatedPlayTime": "8-15 minutes"}
        ]}"#
    }

    /// Temporary directory removed on drop.
    pub struct ScratchDir {
        path: PathBuf,
    }

    impl ScratchDir {
        pub fn new() -> Self {
            let path = std::env::temp_dir().join(format!("locket-test-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&path).expect("create scratch dir");
            Self { path }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Write `content` to `relative`, creating parent directories.
        pub fn write(&self, relative: &str, content: &str) -> PathBuf {
            let path = self.path.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create parent dir");
            }
            std::fs::write(&path, content).expect("write scratch file");
            path
        }
    }

    impl Default for ScratchDir {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
