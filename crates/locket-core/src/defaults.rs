//! Built-in catalog and tuning parameters used when no files are on disk.

use serde_json::{Map, Value, json};

use crate::game::{Difficulty, GameDescriptor, GameId};

fn builtin(
    slug: &str,
    title: &str,
    icon: &str,
    short_desc: &str,
    category: &str,
    difficulty: Difficulty,
    play_time: &str,
) -> GameDescriptor {
    GameDescriptor {
        id: GameId::from(slug),
        title: title.to_string(),
        slug: slug.to_string(),
        display_icon: icon.to_string(),
        short_desc: short_desc.to_string(),
        play_url: format!("{slug}/index.html"),
        category: category.to_string(),
        difficulty,
        estimated_play_time: play_time.to_string(),
    }
}

/// The ten games shipped with the launcher.
pub fn default_games() -> Vec<GameDescriptor> {
    use Difficulty::{Easy, Medium};
    vec![
        builtin(
            "brick-blaster",
            "Brick Blaster",
            "🧱",
            "Arkanoid-style brick breaker with Indian festival themes",
            "arcade",
            Easy,
            "5-10 minutes",
        ),
        builtin(
            "subway-sprinter",
            "Subway Sprinter",
            "🚇",
            "Endless runner through Indian railway stations",
            "runner",
            Medium,
            "3-15 minutes",
        ),
        builtin(
            "rooftop-cricket-smash",
            "Rooftop Cricket Smash",
            "🏏",
            "Cricket batting game on Mumbai rooftops",
            "sports",
            Medium,
            "2-5 minutes",
        ),
        builtin(
            "fruit-slice-masala",
            "Fruit Slice Masala",
            "🥭",
            "Slice Indian fruits with spice-themed effects",
            "casual",
            Easy,
            "3-8 minutes",
        ),
        builtin(
            "racing-rickshaw",
            "Racing Rickshaw",
            "🛺",
            "Top-down auto-rickshaw racing adventure",
            "racing",
            Medium,
            "5-12 minutes",
        ),
        builtin(
            "ludo-blitz",
            "Ludo Blitz",
            "🎲",
            "Fast-paced Ludo with Indian sweet game pieces",
            "board",
            Easy,
            "8-15 minutes",
        ),
        builtin(
            "snake-redux",
            "Snake Redux",
            "🐍",
            "Classic snake game with Indian foods and scenery",
            "classic",
            Medium,
            "2-10 minutes",
        ),
        builtin(
            "memory-bollywood",
            "Memory Bollywood",
            "🎬",
            "Memory card matching with Bollywood themes",
            "puzzle",
            Easy,
            "3-6 minutes",
        ),
        builtin(
            "puzzle-rickshaw-rush",
            "Puzzle Rickshaw Rush",
            "🧩",
            "Navigate city streets to pick up passengers",
            "puzzle",
            Medium,
            "4-10 minutes",
        ),
        builtin(
            "rangoli-tetris",
            "Rangoli Tetris",
            "🌸",
            "Tetris with decorative Rangoli pattern blocks",
            "puzzle",
            Medium,
            "5-20 minutes",
        ),
    ]
}

/// Built-in tuning parameters for the games that have them.
pub fn default_config(slug: &str) -> Option<Map<String, Value>> {
    let value = match slug {
        "brick-blaster" => json!({
            "ballSpeedBase": 360,
            "ballSpeedIncrement": 20,
            "paddleWidth": 80,
            "paddleResponseLerp": 0.15,
            "brickRows": 6,
            "brickCols": 12,
            "powerupDropRate": 0.3
        }),
        "subway-sprinter" => json!({
            "forwardSpeed": 350,
            "jumpHeightPx": 120,
            "laneSwitchTimeMs": 200,
            "coinSpawnRate": 0.4,
            "obstacleSpacing": 300
        }),
        "rooftop-cricket-smash" => json!({
            "bowlerSpeed": 750,
            "perfectTimingWindowMs": 100,
            "shotVelocityMultiplier": 1.4,
            "gravity": 1400,
            "windEffect": 0.1
        }),
        _ => return None,
    };
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
