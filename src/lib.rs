pub mod detection;
pub mod detector;
pub mod error;
pub mod metric;
pub mod object;
pub mod registry;
pub mod solver;
pub mod tracker;

pub use detection::Detection;
pub use error::Error;
pub use object::{ObjectId, TrackedObject};
pub use tracker::{Tracker, TrackerConfig};

use nalgebra as na;
use std::fmt;

pub trait Float:
    num_traits::FromPrimitive + na::RealField + Copy + fmt::Debug + PartialEq + 'static
{
}

impl<T> Float for T where
    T: num_traits::FromPrimitive + na::RealField + Copy + fmt::Debug + PartialEq + 'static
{
}
