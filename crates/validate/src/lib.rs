pub mod fields;
pub mod outcome;
pub mod refine;
pub mod regions;
pub mod rules;
pub mod validator;

pub use fields::{empty_field_map, FieldMap};
pub use outcome::ValidationOutcome;
pub use refine::refine;
pub use regions::canonical_state;
pub use validator::validate;
