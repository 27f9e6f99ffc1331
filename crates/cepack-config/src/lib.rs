pub mod ambient;
pub mod dev;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod options;
pub mod validation;

// Re-export main types
pub use ambient::*;
pub use dev::*;
pub use error::*;
pub use manifest::*;
pub use metadata::*;
pub use naming::*;
pub use options::*;

// Re-export validation
pub use validation::{OptionsValidator, RequiredOptionsValidator, validate};
