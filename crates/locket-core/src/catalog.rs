use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::GameDescriptor;

/// Label of the "no filter" choice in the gallery selectors.
pub const ALL: &str = "All";

/// A gallery filter: either the `All` sentinel or an exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Filter {
    #[default]
    All,
    Exact(String),
}

impl Filter {
    pub fn parse(s: &str) -> Self {
        if s == ALL {
            Self::All
        } else {
            Self::Exact(s.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(wanted) => wanted == value,
        }
    }
}

impl From<String> for Filter {
    fn from(s: String) -> Self {
        if s == ALL { Self::All } else { Self::Exact(s) }
    }
}

impl From<Filter> for String {
    fn from(f: Filter) -> Self {
        match f {
            Filter::All => ALL.to_string(),
            Filter::Exact(s) => s,
        }
    }
}

/// Field the gallery is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Title,
    Category,
    Difficulty,
    PlayTime,
}

impl SortKey {
    fn key<'a>(self, game: &'a GameDescriptor) -> &'a str {
        match self {
            Self::Title => &game.title,
            Self::Category => &game.category,
            // Raw label order: easy < hard < medium.
            Self::Difficulty => game.difficulty.as_str(),
            Self::PlayTime => &game.estimated_play_time,
        }
    }
}

/// A sort key string that is not one of the gallery choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(pub String);

impl fmt::Display for UnknownSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown sort key {:?}: expected Title, Category, Difficulty or Play Time",
            self.0
        )
    }
}

impl std::error::Error for UnknownSortKey {}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "title" => Ok(Self::Title),
            "category" => Ok(Self::Category),
            "difficulty" => Ok(Self::Difficulty),
            "playtime" => Ok(Self::PlayTime),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Filter `games` by category and difficulty, then stably sort ascending on
/// the string form of `sort`. Unknown filter values give an empty result.
pub fn select<'a>(
    games: &'a [GameDescriptor],
    category: &Filter,
    difficulty: &Filter,
    sort: SortKey,
) -> Vec<&'a GameDescriptor> {
    let mut out: Vec<&GameDescriptor> = games
        .iter()
        .filter(|g| category.matches(&g.category) && difficulty.matches(g.difficulty.as_str()))
        .collect();
    out.sort_by(|a, b| sort.key(a).cmp(sort.key(b)));
    out
}

/// Choices offered by the gallery's filter selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub difficulties: Vec<String>,
}

/// `All` followed by the distinct categories and difficulties present in `games`.
pub fn facets(games: &[GameDescriptor]) -> Facets {
    let categories: BTreeSet<&str> = games.iter().map(|g| g.category.as_str()).collect();
    let difficulties: BTreeSet<&str> = games.iter().map(|g| g.difficulty.as_str()).collect();
    let with_all = |set: BTreeSet<&str>| {
        std::iter::once(ALL)
            .chain(set)
            .map(str::to_string)
            .collect::<Vec<_>>()
    };
    Facets {
        categories: with_all(categories),
        difficulties: with_all(difficulties),
    }
}
