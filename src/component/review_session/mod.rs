mod session;

pub use session::{ReviewEntry, ReviewSession};
