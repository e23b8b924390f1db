// AccentFlow Composition
// State machine and the router that drives it

mod router;
mod state;

pub use router::{EventRouter, RouteOutcome, DEFAULT_TRIGGER};
pub use state::{effective_index, ActiveKey, CompositionState};
