//! Domain models shared across the overlay service.

pub mod chart;
pub mod frame;
pub mod levels;
pub mod snapshot;
pub mod strike;

pub use chart::{ChartConfig, ChartPosition, WindowMode, WindowSpec};
pub use frame::{AnnotationPosition, RenderFrame, ScaledAxis, Sign, SumReading};
pub use levels::{AnnotationRange, LevelKind, ReferenceLevels};
pub use snapshot::{ChartSnapshot, ChartStatus};
pub use strike::{ClassicPayload, StatePayload, Strike};
