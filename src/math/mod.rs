pub mod surface;

pub use surface::{
    estimate_normals, estimate_normals_with_progress, gradient, normal, normals, Height,
    HeightField, Neighbours,
};
