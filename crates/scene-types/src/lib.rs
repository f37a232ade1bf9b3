pub mod document;
pub mod mesh;
pub mod node;
pub mod placement;
pub mod sketch;
pub mod view;

pub use document::*;
pub use mesh::*;
pub use node::*;
pub use placement::*;
pub use sketch::*;
pub use view::*;
