pub mod types;
pub mod options;
pub mod loader;
pub mod validator;

pub use types::*;
pub use options::*;
pub use loader::*;
pub use validator::*;
