//! Soil matrix descriptors, which can be stored as grid cells.

use bytemuck::{Pod, Zeroable};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Describes a single soil type by the fraction of its mixture.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Display, From, Serialize, Deserialize, Pod, Zeroable,
)]
#[display("binary({mixture})")]
pub struct Binary {
    pub mixture: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_matrix() {
        let soil = [Binary::from(0.25), Binary::default()];

        assert_eq!(soil[0].to_string(), "binary(0.25)");
        assert_eq!(bytemuck::cast_slice::<Binary, f32>(&soil), &[0.25, 0.0]);
    }
}
