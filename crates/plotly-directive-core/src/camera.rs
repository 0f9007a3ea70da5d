//! 3-D camera parameters for plotly scenes.
//!
//! A [`CameraSpec`] is built from exactly nine numbers: the `eye`, `center`
//! and `up` vectors in that order. It renders to the Python mapping accepted
//! by `Figure.update_layout(scene_camera=...)`.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Number of values a camera is built from.
pub const CAMERA_VALUE_COUNT: usize = 9;

/// Errors raised while building a [`CameraSpec`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("camera requires exactly {CAMERA_VALUE_COUNT} values, got {count}")]
    InvalidLength { count: usize },

    #[error("camera value `{value}` is not a number")]
    InvalidNumber { value: String },

    #[error("camera value at position {index} is not finite")]
    NonFinite { index: usize },
}

/// A point or direction in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The `(key, value)` pairs in x, y, z order.
    fn entries(&self) -> [(&'static str, f64); 3] {
        [("x", self.x), ("y", self.y), ("z", self.z)]
    }
}

/// Validated camera position of a 3-D plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSpec {
    eye: Vector3,
    center: Vector3,
    up: Vector3,
}

impl CameraSpec {
    pub fn new(eye: Vector3, center: Vector3, up: Vector3) -> Self {
        Self { eye, center, up }
    }

    /// Returns the position of the camera.
    pub fn eye(&self) -> Vector3 {
        self.eye
    }

    /// Returns the point the camera looks at.
    pub fn center(&self) -> Vector3 {
        self.center
    }

    /// Returns the up direction of the camera.
    pub fn up(&self) -> Vector3 {
        self.up
    }

    /// The nine values in eye, center, up order.
    pub fn values(&self) -> [f64; CAMERA_VALUE_COUNT] {
        let Self { eye, center, up } = self;
        [
            eye.x, eye.y, eye.z, center.x, center.y, center.z, up.x, up.y, up.z,
        ]
    }

    /// Render the camera as a Python dict literal.
    ///
    /// The outer keys are always `eye`, `center`, `up` and the inner keys
    /// always `x`, `y`, `z`; consumers of the generated code rely on this
    /// exact text.
    ///
    /// ```
    /// # use plotly_directive_core::camera::CameraSpec;
    /// let camera = CameraSpec::try_from([1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0].as_slice())
    ///     .unwrap();
    /// assert_eq!(
    ///     camera.to_python_dict(),
    ///     "{'eye': {'x': 1, 'y': 2, 'z': 3}, \
    ///      'center': {'x': 0, 'y': 0, 'z': 0}, \
    ///      'up': {'x': 0, 'y': 0, 'z': 1}}"
    /// );
    /// ```
    pub fn to_python_dict(&self) -> String {
        let groups = [("eye", self.eye), ("center", self.center), ("up", self.up)];
        let rendered: Vec<String> = groups
            .iter()
            .map(|(name, vector)| {
                let entries: Vec<String> = vector
                    .entries()
                    .iter()
                    .map(|(key, value)| format!("'{key}': {value}"))
                    .collect();
                format!("'{name}': {{{}}}", entries.join(", "))
            })
            .collect();
        format!("{{{}}}", rendered.join(", "))
    }
}

impl TryFrom<&[f64]> for CameraSpec {
    type Error = CameraError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let values: &[f64; CAMERA_VALUE_COUNT] = values
            .try_into()
            .map_err(|_| CameraError::InvalidLength {
                count: values.len(),
            })?;

        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(CameraError::NonFinite { index });
        }

        let [ex, ey, ez, cx, cy, cz, ux, uy, uz] = *values;
        Ok(Self::new(
            Vector3::new(ex, ey, ez),
            Vector3::new(cx, cy, cz),
            Vector3::new(ux, uy, uz),
        ))
    }
}

/// Parse nine numbers separated by commas and/or whitespace.
impl FromStr for CameraSpec {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>().map_err(|_| CameraError::InvalidNumber {
                    value: part.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::try_from(values.as_slice())
    }
}

impl fmt::Display for CameraSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values().iter().map(f64::to_string).collect();
        write!(f, "{}", values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn sequential() -> CameraSpec {
        let values: Vec<f64> = (1..=9).map(f64::from).collect();
        CameraSpec::try_from(values.as_slice()).expect("nine values")
    }

    #[test]
    fn test_try_from_groups_values_in_order() {
        let camera = sequential();

        assert_eq!(camera.eye(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.center(), Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(camera.up(), Vector3::new(7.0, 8.0, 9.0));
    }

    #[test]
    fn test_try_from_rejects_wrong_length() {
        let err = CameraSpec::try_from([1.0, 2.0, 3.0].as_slice()).unwrap_err();
        assert_eq!(err, CameraError::InvalidLength { count: 3 });
        assert_eq!(err.to_string(), "camera requires exactly 9 values, got 3");

        let err = CameraSpec::try_from([0.0; 10].as_slice()).unwrap_err();
        assert_eq!(err, CameraError::InvalidLength { count: 10 });
    }

    #[test]
    fn test_try_from_rejects_non_finite() {
        let mut values = [0.0; 9];
        values[4] = f64::NAN;

        let err = CameraSpec::try_from(values.as_slice()).unwrap_err();
        assert_eq!(err, CameraError::NonFinite { index: 4 });
    }

    #[test]
    fn test_python_dict_layout() {
        let dict = sequential().to_python_dict();

        assert_eq!(
            dict,
            "{'eye': {'x': 1, 'y': 2, 'z': 3}, \
             'center': {'x': 4, 'y': 5, 'z': 6}, \
             'up': {'x': 7, 'y': 8, 'z': 9}}"
        );
    }

    #[test]
    fn test_python_dict_fractional_values() {
        let camera: CameraSpec = "1.25 -0.5 2  0 0 0  0 0 1".parse().unwrap();

        assert!(
            camera
                .to_python_dict()
                .contains("'eye': {'x': 1.25, 'y': -0.5, 'z': 2}")
        );
    }

    #[test]
    fn test_from_str_accepts_commas_and_whitespace() {
        let camera: CameraSpec = "1.5, 1.5,0.8\n0 0 0, 0,0,1".parse().unwrap();

        assert_approx_eq!(f64, camera.eye().x, 1.5);
        assert_approx_eq!(f64, camera.eye().z, 0.8);
        assert_approx_eq!(f64, camera.up().z, 1.0);
    }

    #[test]
    fn test_from_str_reports_bad_number() {
        let err = "1 2 three 4 5 6 7 8 9".parse::<CameraSpec>().unwrap_err();

        assert_eq!(
            err,
            CameraError::InvalidNumber {
                value: "three".to_string()
            }
        );
    }

    #[test]
    fn test_from_str_reports_count() {
        let err = "1, 2, 3, 4".parse::<CameraSpec>().unwrap_err();

        assert_eq!(err, CameraError::InvalidLength { count: 4 });
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        let camera = sequential();

        assert_eq!(camera.to_string().parse::<CameraSpec>().unwrap(), camera);
    }
}
