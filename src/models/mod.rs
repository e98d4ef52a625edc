pub mod game;

pub use game::{Decision, Game, GameStatus, Guess};
