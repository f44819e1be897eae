use std::f64::consts::PI;

/// Shape drawn at each data point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    TriangleUp,
    Diamond,
    TriangleDown,
    Star,
    Plus,
}

impl Marker {
    /// Vertices of the marker, in pixels, relative to the point it marks.
    /// The marker fits in a `2 * size` square. Backend coordinates grow
    /// downwards.
    pub fn outline(&self, size: i32) -> Vec<(i32, i32)> {
        let s = size;
        match self {
            Self::Circle => Self::regular(16, size as f64, 0.0),
            Self::Square => vec![(-s, -s), (s, -s), (s, s), (-s, s)],
            Self::TriangleUp => vec![(0, -s), (s, s), (-s, s)],
            Self::Diamond => vec![(0, -s), (s, 0), (0, s), (-s, 0)],
            Self::TriangleDown => vec![(-s, -s), (s, -s), (0, s)],
            Self::Star => {
                let outer = Self::regular(5, size as f64, -PI / 2.0);
                let inner =
                    Self::regular(5, size as f64 * 0.4, -PI / 2.0 + PI / 5.0);
                outer
                    .into_iter()
                    .zip(inner)
                    .flat_map(|(a, b)| vec![a, b])
                    .collect()
            }
            Self::Plus => {
                let t = (s / 3).max(1);
                vec![
                    (-t, -s),
                    (t, -s),
                    (t, -t),
                    (s, -t),
                    (s, t),
                    (t, t),
                    (t, s),
                    (-t, s),
                    (-t, t),
                    (-s, t),
                    (-s, -t),
                    (-t, -t),
                ]
            }
        }
    }

    // `n` vertices on a circle of the given radius, starting at `phase`.
    fn regular(n: usize, radius: f64, phase: f64) -> Vec<(i32, i32)> {
        (0..n)
            .map(|i| {
                let angle = phase + 2.0 * PI * i as f64 / n as f64;
                (
                    (radius * angle.cos()).round() as i32,
                    (radius * angle.sin()).round() as i32,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Marker; 7] = [
        Marker::Circle,
        Marker::Square,
        Marker::TriangleUp,
        Marker::Diamond,
        Marker::TriangleDown,
        Marker::Star,
        Marker::Plus,
    ];

    #[test]
    fn outlines_fit_their_box() {
        for marker in ALL {
            let outline = marker.outline(5);
            assert!(outline.len() >= 3, "{:?}", marker);
            assert!(
                outline
                    .iter()
                    .all(|(x, y)| x.abs() <= 5 && y.abs() <= 5),
                "{:?}: {:?}",
                marker,
                outline
            );
        }
    }

    #[test]
    fn star_alternates_radii() {
        let outline = Marker::Star.outline(10);
        assert_eq!(outline.len(), 10);
        // top spike first
        assert_eq!(outline[0], (0, -10));
        let inner = outline[1];
        assert!(inner.0.pow(2) + inner.1.pow(2) <= 16);
    }

    #[test]
    fn triangles_point_the_right_way() {
        assert_eq!(Marker::TriangleUp.outline(4)[0], (0, -4));
        assert_eq!(Marker::TriangleDown.outline(4)[2], (0, 4));
    }
}
