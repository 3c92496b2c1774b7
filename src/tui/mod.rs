mod app;
mod input;

pub use app::App;
pub use input::InputMode;
