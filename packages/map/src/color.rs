//! Stepped sequential color scale for the choropleth.

use serde::Serialize;

/// `ColorBrewer` `YlGn`, 6 classes, light to dark.
pub const YL_GN_6: [&str; 6] = [
    "#ffffcc", "#d9f0a3", "#addd8e", "#78c679", "#31a354", "#006837",
];

/// Color for values that are NaN or infinite.
pub const NAN_COLOR: &str = "black";

/// Equal-interval step scale over the finite range of the input values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScale {
    /// One color per bin.
    pub colors: Vec<&'static str>,
    /// Bin edges, `colors.len() + 1` of them.
    pub thresholds: Vec<f64>,
    pub nan_color: &'static str,
}

impl ColorScale {
    /// Builds a `YlGn` scale spanning the finite values in `values`.
    ///
    /// With no finite values the scale spans `0..1`.
    #[must_use]
    pub fn yl_gn(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| {
                Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
            })
            .unwrap_or((0.0, 1.0));

        Self::equal_interval(&YL_GN_6, min, max)
    }

    #[allow(clippy::cast_precision_loss)]
    fn equal_interval(colors: &[&'static str], min: f64, max: f64) -> Self {
        let bins = colors.len();
        let step = (max - min) / bins as f64;
        let thresholds = (0..=bins)
            .map(|i| if i == bins { max } else { step.mul_add(i as f64, min) })
            .collect();

        Self {
            colors: colors.to_vec(),
            thresholds,
            nan_color: NAN_COLOR,
        }
    }

    /// Color for `value`. Values outside the range clamp to the end bins.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn color_for(&self, value: f64) -> &'static str {
        if !value.is_finite() {
            return self.nan_color;
        }

        let bins = self.colors.len();
        let min = self.thresholds[0];
        let max = self.thresholds[bins];
        if max <= min {
            return self.colors[0];
        }

        let position = ((value - min) / (max - min) * bins as f64).floor();
        let idx = if position < 0.0 {
            0
        } else {
            (position as usize).min(bins - 1)
        };
        self.colors[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_the_finite_values() {
        let scale = ColorScale::yl_gn([1.0, f64::NAN, 4.0, 2.5, f64::NEG_INFINITY]);
        assert_eq!(scale.thresholds.len(), 7);
        assert!((scale.thresholds[0] - 1.0).abs() < f64::EPSILON);
        assert!((scale.thresholds[6] - 4.0).abs() < f64::EPSILON);
        assert!((scale.thresholds[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ends_map_to_lightest_and_darkest() {
        let scale = ColorScale::yl_gn([0.0, 6.0]);
        assert_eq!(scale.color_for(0.0), "#ffffcc");
        assert_eq!(scale.color_for(6.0), "#006837");
        assert_eq!(scale.color_for(2.5), "#addd8e");
    }

    #[test]
    fn colors_are_monotonic_in_value() {
        let scale = ColorScale::yl_gn([0.0, 3.0]);
        let indices: Vec<usize> = [0.0, 0.4, 0.9, 1.6, 2.2, 2.7, 3.0]
            .iter()
            .map(|v| {
                let color = scale.color_for(*v);
                YL_GN_6.iter().position(|c| *c == color).unwrap()
            })
            .collect();
        assert!(indices.windows(2).all(|w| w[0] <= w[1]), "{indices:?}");
    }

    #[test]
    fn out_of_range_values_clamp() {
        let scale = ColorScale::yl_gn([1.0, 2.0]);
        assert_eq!(scale.color_for(-10.0), "#ffffcc");
        assert_eq!(scale.color_for(10.0), "#006837");
    }

    #[test]
    fn non_finite_values_use_nan_color() {
        let scale = ColorScale::yl_gn([1.0, 2.0]);
        assert_eq!(scale.color_for(f64::NAN), NAN_COLOR);
    }

    #[test]
    fn single_value_uses_first_bin() {
        let scale = ColorScale::yl_gn([3.0, 3.0]);
        assert_eq!(scale.color_for(3.0), "#ffffcc");
    }

    #[test]
    fn no_values_defaults_to_unit_range() {
        let scale = ColorScale::yl_gn(std::iter::empty());
        assert!((scale.thresholds[6] - 1.0).abs() < f64::EPSILON);
    }
}
