use bevy::color::Hsva;

use crate::{
    contour::extract_contours_par,
    field::ScalarField,
    interp::{lerp, remap},
    segment::Segment,
    types::Value,
};

/// Styling for the stack of concentric contour layers.
///
/// Layer `k` is extracted at `base - k * step`. Deeper layers sit further inside bright
/// regions and are drawn thicker and warmer:
///
/// ```text
///  k = 0            k = layers - 1
///  outer_hue  ───►  inner_hue      (blue → red)
///  min_width  ───►  max_width
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// Number of rings. `0` disables contouring.
    pub layers: usize,
    /// Threshold decrement per deeper layer.
    pub step: Value,
    /// Base opacity on a 0..255 scale, before `mix` is applied.
    pub alpha: Value,
    /// Stroke width of the outermost layer.
    pub min_width: Value,
    /// Stroke width of the innermost layer.
    pub max_width: Value,
    /// Hue in degrees of the outermost layer.
    pub outer_hue: Value,
    /// Hue in degrees of the innermost layer.
    pub inner_hue: Value,
    pub saturation: Value,
    pub brightness: Value,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            layers: 5,
            step: 14.0,
            alpha: 220.0,
            min_width: 1.5,
            max_width: 5.0,
            outer_hue: 210.0,
            inner_hue: 20.0,
            saturation: 0.8,
            brightness: 0.95,
        }
    }
}

/// Colour and stroke width of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerAppearance {
    pub color: Hsva,
    pub width: Value,
}

impl LayerStyle {
    /// Iso-value of layer `k`.
    pub fn threshold(&self, k: usize, base: Value) -> Value {
        base - k as Value * self.step
    }

    /// Colour and width of layer `k`. `mix` in `[0, 1]` scales the opacity.
    pub fn appearance(&self, k: usize, mix: Value) -> LayerAppearance {
        let last = self.layers.saturating_sub(1) as Value;
        let k = k as Value;
        let (hue, t) = if last > 0.0 {
            (remap(k, [0.0, last], [self.outer_hue, self.inner_hue]), k / last)
        } else {
            (self.outer_hue, 0.0)
        };

        let alpha = (self.alpha / 255.0 * mix.clamp(0.0, 1.0)).clamp(0.0, 1.0);
        LayerAppearance {
            color: Hsva::new(hue.rem_euclid(360.0), self.saturation, self.brightness, alpha),
            width: lerp(self.min_width, self.max_width, t),
        }
    }
}

/// Segments of one contour layer, in grid units.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLayer {
    pub index: usize,
    pub threshold: Value,
    pub appearance: LayerAppearance,
    pub segments: Vec<Segment>,
}

impl ContourLayer {
    /// Returns the segments scaled from grid units to world units.
    pub fn scaled_segments(&self, cell_size: Value) -> impl Iterator<Item = Segment> + '_ {
        self.segments.iter().map(move |s| s.scaled(cell_size))
    }
}

/// Extracts every layer of `style` from `field`, starting at `base_threshold`.
pub fn build_layers(
    field: &ScalarField,
    base_threshold: Value,
    style: &LayerStyle,
    mix: Value,
) -> Vec<ContourLayer> {
    (0..style.layers)
        .map(|index| {
            let threshold = style.threshold(index, base_threshold);
            ContourLayer {
                index,
                threshold,
                appearance: style.appearance(index, mix),
                segments: extract_contours_par(field.view(), threshold),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_descend_by_step() {
        let style = LayerStyle::default();
        assert_eq!(style.threshold(0, 128.0), 128.0);
        assert_eq!(style.threshold(3, 128.0), 86.0);
    }

    #[test]
    fn outer_and_inner_layers_use_range_ends() {
        let style = LayerStyle::default();
        let outer = style.appearance(0, 1.0);
        let inner = style.appearance(4, 1.0);
        assert_eq!(outer.color.hue, 210.0);
        assert_eq!(outer.width, 1.5);
        assert_eq!(inner.color.hue, 20.0);
        assert_eq!(inner.width, 5.0);
        assert!((outer.color.alpha - 220.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn mix_scales_alpha() {
        let style = LayerStyle::default();
        assert_eq!(style.appearance(2, 0.0).color.alpha, 0.0);
        let half = style.appearance(2, 0.5).color.alpha;
        assert!((half - 110.0 / 255.0).abs() < 1e-6);
        assert_eq!(style.appearance(2, 3.0).color.alpha, style.appearance(2, 1.0).color.alpha);
    }

    #[test]
    fn single_layer_uses_outer_styling() {
        let style = LayerStyle {
            layers: 1,
            ..Default::default()
        };
        let appearance = style.appearance(0, 1.0);
        assert_eq!(appearance.color.hue, 210.0);
        assert_eq!(appearance.width, 1.5);
    }

    #[test]
    fn build_layers_nests_rings() {
        // radial bump: bright centre, dark edges
        let field = ScalarField::new(21, 21).fill(&|row, col| {
            let d = ((row - 10.0).powi(2) + (col - 10.0).powi(2)).sqrt();
            255.0 - d * 20.0
        });
        let layers = build_layers(&field, 200.0, &LayerStyle::default(), 1.0);
        assert_eq!(layers.len(), 5);
        for (k, layer) in layers.iter().enumerate() {
            assert_eq!(layer.index, k);
            assert!(!layer.segments.is_empty());
        }
        // lower thresholds enclose a larger region, so their rings are longer
        let length = |l: &ContourLayer| {
            l.segments
                .iter()
                .map(|s| nalgebra::distance(&s.start, &s.end))
                .sum::<Value>()
        };
        assert!(length(&layers[4]) > length(&layers[0]));
    }

    #[test]
    fn zero_layers_is_empty() {
        let style = LayerStyle {
            layers: 0,
            ..Default::default()
        };
        assert!(build_layers(&ScalarField::new(3, 3), 1.0, &style, 1.0).is_empty());
    }

    #[test]
    fn scaled_segments_use_cell_size() {
        let field = ScalarField::from_array(ndarray::array![[0.0, 0.0], [0.0, 10.0]]);
        let style = LayerStyle {
            layers: 1,
            ..Default::default()
        };
        let layers = build_layers(&field, 5.0, &style, 1.0);
        let scaled: Vec<Segment> = layers[0].scaled_segments(40.0).collect();
        assert_eq!(scaled.len(), 1);
        assert!((scaled[0].start.x - 20.0).abs() < 1e-4);
        assert!((scaled[0].start.y - 40.0).abs() < 1e-4);
    }
}
