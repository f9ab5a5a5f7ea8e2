//! Shared neighbourhood loop for binary erosion and dilation

use super::element::StructuringElement;
use crate::maybe_rayon::*;
use claimsat_core::{Mask, Result, MASK_NODATA};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Rule {
    /// Flag when every valid neighbour is flagged (erosion)
    All,
    /// Flag when any valid neighbour is flagged (dilation)
    Any,
}

pub(crate) fn binary_filter(mask: &Mask, element: &StructuringElement, rule: Rule) -> Result<Mask> {
    element.validate()?;

    let (rows, cols) = mask.shape();
    let offsets = element.offsets();

    let output: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![MASK_NODATA; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let center = unsafe { mask.get_unchecked(row, col) };
                if mask.is_nodata(center) {
                    continue;
                }

                let mut flagged = match rule {
                    Rule::All => true,
                    Rule::Any => false,
                };
                for &(dr, dc) in &offsets {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let v = unsafe { mask.get_unchecked(nr as usize, nc as usize) };
                    if mask.is_nodata(v) {
                        continue;
                    }
                    match rule {
                        Rule::All if v != 1 => {
                            flagged = false;
                            break;
                        }
                        Rule::Any if v == 1 => {
                            flagged = true;
                            break;
                        }
                        _ => {}
                    }
                }
                *out = u8::from(flagged);
            }
            row_data
        })
        .collect();

    mask.derive(output, mask.nodata())
}
