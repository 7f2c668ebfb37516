mod machine;
mod state;
mod store;
mod throttle;

pub use machine::{App, TickActivity, TickResult};
pub use state::State;
pub use store::AppContext;
pub use throttle::LogThrottle;
