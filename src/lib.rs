#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod coord;
pub mod event;
pub mod fog;
pub mod force;
pub mod game;
pub mod grid;
pub mod network;
pub mod piece;
pub mod rules;
pub mod session;
pub mod test_util;
pub mod tui;
