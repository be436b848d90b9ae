// Collections of submitted poems: validated names, the append-only entry store,
// submission handling, display ordering and the HTTP handlers on top of them.

pub mod handlers;
pub mod name;
pub mod ordering;
pub mod store;
pub mod submission;
