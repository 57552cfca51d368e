//! Data-shaping core: strike window selection, axis scaling, level
//! interpolation and the pipeline that runs them once per tick.

pub mod axis;
pub mod format;
pub mod interpolate;
pub mod pipeline;
pub mod strike_filter;
