mod badger;
mod handle_bar;
mod luggage_rack;
mod steering;
mod wheel;

pub use badger::{Badger, BadgerConfig};
pub use handle_bar::HandleBar;
pub use luggage_rack::LuggageRack;
pub use steering::{Steering, SteeringConfig};
pub use wheel::{Wheel, WheelSide};
