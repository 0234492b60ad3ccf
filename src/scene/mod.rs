// scene/ - Static backdrop behind the fight
//
// The background is picked once from the player's stored preference and
// degrades to the default image, then to a flat fill.

mod background;

pub use background::{Background, BackgroundState};
