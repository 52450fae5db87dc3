//! Terminal UI: renders the controller's read-only view and turns key presses
//! into controller operations.

mod app;
mod game_view;

pub use app::App;
