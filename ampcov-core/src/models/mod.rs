pub mod depth;
pub mod interval;
pub mod summary;
pub mod window;

pub use depth::DepthRecord;
pub use interval::Interval;
pub use summary::MeanDepthRow;
pub use window::{TargetSet, TargetWindow};
