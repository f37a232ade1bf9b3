pub mod mock;
pub mod primitives;
pub mod traits;
pub mod types;

pub use mock::MockTessellator;
pub use primitives::PrimitiveTessellator;
pub use traits::*;
pub use types::*;
