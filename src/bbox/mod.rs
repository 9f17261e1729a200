//! Bounding-box algebra (§4.C7) and its circular-arc-aware Cartesian
//! computation (§4.C8).

mod box3d;
mod compute;
mod gbox;
mod gidx;

pub use box3d::Box3D;
pub use compute::calculate_gbox;
pub use gbox::GBox;
pub use gidx::{next_float_down, next_float_up, Gidx, GIDX_MAX_DIM};
