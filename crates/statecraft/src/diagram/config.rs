//! Renderer configuration

use std::fmt;
use std::str::FromStr;

/// Layout direction hint passed through to DOT and Mermaid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left to right (LR)
    #[default]
    LeftRight,
    /// Top to bottom (TB)
    TopDown,
    /// Right to left (RL)
    RightLeft,
    /// Bottom to top (BT)
    BottomUp,
}

impl Direction {
    /// The two-letter code both DOT `rankdir` and Mermaid `direction` use
    pub fn code(&self) -> &'static str {
        match self {
            Direction::LeftRight => "LR",
            Direction::TopDown => "TB",
            Direction::RightLeft => "RL",
            Direction::BottomUp => "BT",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LR" => Ok(Direction::LeftRight),
            "TD" | "TB" => Ok(Direction::TopDown),
            "RL" => Ok(Direction::RightLeft),
            "BT" => Ok(Direction::BottomUp),
            _ => Err(format!(
                "Invalid direction: {}. Valid options: LR, TB, TD, RL, BT",
                s
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Options shared by the text renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramConfig {
    pub direction: Direction,
    /// Draw the arrow into the start state
    pub show_start_arrow: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            show_start_arrow: true,
        }
    }
}

impl DiagramConfig {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_start_arrow(mut self, show: bool) -> Self {
        self.show_start_arrow = show;
        self
    }
}
