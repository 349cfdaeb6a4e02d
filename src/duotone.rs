use bevy::color::{Alpha, Srgba};
use ndarray::Array2;

use crate::{field::ScalarField, interp::remap, types::Value};

/// Maximum tint opacity on a 0..255 scale.
pub const MAX_TINT_ALPHA: Value = 180.0;

/// Per-cell two-colour filter and brightness forming.
///
/// Each sample is drawn as one tile. Forming darkens tiles below `mid` and lightens tiles
/// above it, then the duotone filter multiplies the tile by `inside` or `outside` depending
/// on which side of the threshold the sample falls:
///
/// ```text
///  b < mid   multiply black  alpha = remap(|b - mid|, 0..mid, 0..180) * form_strength
///  b > mid   screen white    (same alpha)
///  b ≥ t     multiply inside   alpha = 180 * duo_strength * mix
///  b < t     multiply outside
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuotoneStyle {
    pub inside: Srgba,
    pub outside: Srgba,
    /// Strength of the duotone filter in `[0, 1]`.
    pub duo_strength: Value,
    /// Strength of brightness forming in `[0, 1]`. `0` disables forming.
    pub form_strength: Value,
    /// Brightness that forming leaves untouched.
    pub mid: Value,
}

impl Default for DuotoneStyle {
    fn default() -> Self {
        Self {
            inside: Srgba::rgb(1.0, 0.8, 0.4),
            outside: Srgba::rgb(0.2, 0.4, 1.0),
            duo_strength: 0.6,
            form_strength: 0.5,
            mid: 128.0,
        }
    }
}

/// How a tile is pushed towards its average brightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Forming {
    /// Multiply with black at the given opacity.
    Darken(Value),
    /// Screen with white at the given opacity.
    Lighten(Value),
}

/// Filters applied to one tile, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTint {
    pub forming: Option<Forming>,
    /// Duotone colour with its opacity folded into the alpha channel.
    pub duotone: Option<Srgba>,
}

impl DuotoneStyle {
    /// Works out the filters for a tile of brightness `b`.
    pub fn tint(&self, b: Value, inside: bool, mix: Value) -> CellTint {
        let forming = if self.form_strength > 0.0 {
            let delta = b - self.mid;
            let alpha = (remap(delta.abs(), [0.0, self.mid], [0.0, MAX_TINT_ALPHA])
                * self.form_strength)
                .clamp(0.0, MAX_TINT_ALPHA)
                / 255.0;
            if delta < 0.0 {
                Some(Forming::Darken(alpha))
            } else if delta > 0.0 {
                Some(Forming::Lighten(alpha))
            } else {
                None
            }
        } else {
            None
        };

        let mix = mix.clamp(0.0, 1.0);
        let duotone = (self.duo_strength > 0.0 && mix > 0.0).then(|| {
            let color = if inside { self.inside } else { self.outside };
            color.with_alpha(MAX_TINT_ALPHA * self.duo_strength.min(1.0) * mix / 255.0)
        });

        CellTint { forming, duotone }
    }

    /// Tints every sample of `field`, classifying them against `threshold`.
    pub fn cell_tints(&self, field: &ScalarField, threshold: Value, mix: Value) -> Array2<CellTint> {
        let mask = field.inside_mask(threshold);
        let mut tints = Array2::from_elem(
            mask.dim(),
            CellTint {
                forming: None,
                duotone: None,
            },
        );
        for ((row, col), tint) in tints.indexed_iter_mut() {
            *tint = self.tint(field.values[[row, col]], mask[[row, col]], mix);
        }
        tints
    }
}

impl CellTint {
    /// Composites the filters over an opaque `base` colour.
    pub fn apply(&self, base: Srgba) -> Srgba {
        let mut rgb = [base.red, base.green, base.blue];

        match self.forming {
            Some(Forming::Darken(a)) => rgb = rgb.map(|c| c * (1.0 - a)),
            Some(Forming::Lighten(a)) => rgb = rgb.map(|c| c + (1.0 - c) * a),
            None => {}
        }

        if let Some(tint) = self.duotone {
            let a = tint.alpha;
            let src = [tint.red, tint.green, tint.blue];
            for (c, s) in rgb.iter_mut().zip(src) {
                *c += (*c * s - *c) * a;
            }
        }

        Srgba::new(rgb[0], rgb[1], rgb[2], base.alpha)
    }
}
