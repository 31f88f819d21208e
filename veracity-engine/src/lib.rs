//! Veracity Engine
//!
//! Turns independent signals into one explainable verdict:
//! - [`Engine`] runs the evaluators in a fixed order and sums their penalties
//! - [`Assessor`] fetches inputs from collaborators and calls the engine
//! - [`InMemoryStore`] implements the collaborator interfaces over loaded records
//!
//! Evaluation is synchronous and holds no mutable state, so one engine can
//! be shared by any number of threads.

pub mod assessor;
pub mod engine;
pub mod sources;
pub mod store;

pub use assessor::*;
pub use engine::*;
pub use sources::*;
pub use store::*;
