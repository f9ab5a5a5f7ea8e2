//! Structuring element definitions for morphological operations

use claimsat_core::{Error, Result};

/// Shape of a structuring element for morphological operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuringElement {
    /// Square element of given radius (side = 2*radius + 1)
    Square(usize),
    /// Cross (plus-shaped) element of given radius
    Cross(usize),
}

impl Default for StructuringElement {
    fn default() -> Self {
        StructuringElement::Square(1)
    }
}

impl StructuringElement {
    /// Reject zero-radius elements
    pub fn validate(&self) -> Result<()> {
        if self.radius() == 0 {
            return Err(Error::InvalidParameter {
                name: "radius",
                value: "0".to_string(),
                reason: "structuring element radius must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn radius(&self) -> usize {
        match self {
            StructuringElement::Square(r) | StructuringElement::Cross(r) => *r,
        }
    }

    /// (dr, dc) offsets relative to the centre for all active cells
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius() as isize;
        match self {
            StructuringElement::Square(_) => (-r..=r)
                .flat_map(|dr| (-r..=r).map(move |dc| (dr, dc)))
                .collect(),
            StructuringElement::Cross(_) => {
                let mut offsets = Vec::new();
                for d in -r..=r {
                    offsets.push((d, 0));
                    if d != 0 {
                        offsets.push((0, d));
                    }
                }
                offsets
            }
        }
    }
}
