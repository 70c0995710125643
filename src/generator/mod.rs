mod config;
mod errors;
mod fixture_generator;
mod selector;

pub use config::{GeneratorConfig, IdStrategy, SelectionWeights};
pub use errors::{GenerationError, SelectionError};
pub use fixture_generator::{FixtureGenerator, GenerationSummary};
pub use selector::{Selection, Selector};
