pub mod segmentation;
pub mod extraction;
pub mod candidates;
pub mod filtering;
pub mod selection;

pub use segmentation::*;
pub use extraction::*;
pub use candidates::*;
pub use filtering::*;
pub use selection::*;
