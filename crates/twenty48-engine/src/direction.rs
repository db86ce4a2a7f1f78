//! The four move directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Transform};

/// A direction the player can slide the board.
///
/// Serialized as the lowercase word (`"up"`, `"down"`, `"left"`,
/// `"right"`), which is also what [`FromStr`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every direction, in the order the advisor protocol lists them.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The `(pre, post)` grid transforms that turn this move into a
    /// left-move and back again.
    ///
    /// `post` is always `pre.inverse()`.
    pub fn transforms(self) -> (Transform, Transform) {
        let pre = match self {
            Self::Left => Transform::Identity,
            Self::Right => Transform::ReverseRows,
            Self::Up => Transform::RotateCcw,
            Self::Down => Transform::RotateCw,
        };
        (pre, pre.inverse())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(EngineError::InvalidDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_all_names() {
        for dir in Direction::ALL {
            assert_eq!(dir.as_str().parse::<Direction>().unwrap(), dir);
        }
    }

    #[test]
    fn test_from_str_unknown_name_rejected() {
        let err = "diagonal".parse::<Direction>().unwrap_err();
        assert_eq!(err, EngineError::InvalidDirection("diagonal".into()));
        assert!("UP".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), "\"left\"");
        let dir: Direction = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn test_transforms_post_undoes_pre() {
        for dir in Direction::ALL {
            let (pre, post) = dir.transforms();
            assert_eq!(post, pre.inverse());
        }
        assert_eq!(Direction::Up.transforms(), (Transform::RotateCcw, Transform::RotateCw));
        assert_eq!(Direction::Down.transforms(), (Transform::RotateCw, Transform::RotateCcw));
    }
}
