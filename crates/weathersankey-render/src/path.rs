use crate::model::{LayoutPoint, LinkPath};

impl LinkPath {
    /// Flow runs along x: both control points sit at the mid x, each level with its endpoint.
    pub fn horizontal(start: LayoutPoint, end: LayoutPoint) -> Self {
        let mid = (start.x + end.x) / 2.0;
        Self {
            start,
            control1: LayoutPoint::new(mid, start.y),
            control2: LayoutPoint::new(mid, end.y),
            end,
        }
    }

    /// Swaps x and y of every point (horizontal flow ⇄ vertical flow).
    pub fn transposed(&self) -> Self {
        let t = |p: LayoutPoint| LayoutPoint::new(p.y, p.x);
        Self {
            start: t(self.start),
            control1: t(self.control1),
            control2: t(self.control2),
            end: t(self.end),
        }
    }

    pub fn to_svg_d(&self) -> String {
        format!(
            "M{},{}C{},{},{},{},{},{}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

pub(crate) fn line_path(points: &[LayoutPoint]) -> Option<String> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return Some(format!("M{},{}Z", first.x, first.y));
    }
    let mut out = format!("M{},{}", first.x, first.y);
    for p in rest {
        out.push_str(&format!("L{},{}", p.x, p.y));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposed_curve_bends_along_y() {
        let h = LinkPath::horizontal(LayoutPoint::new(10.0, 5.0), LayoutPoint::new(90.0, 45.0));
        assert_eq!(h.to_svg_d(), "M10,5C50,5,50,45,90,45");
        let v = h.transposed();
        assert_eq!(v.control1, LayoutPoint::new(5.0, 50.0));
        assert_eq!(v.control2, LayoutPoint::new(45.0, 50.0));
        assert_eq!(v.to_svg_d(), "M5,10C5,50,45,50,45,90");
    }

    #[test]
    fn line_path_handles_single_point() {
        assert_eq!(line_path(&[]), None);
        assert_eq!(
            line_path(&[LayoutPoint::new(1.0, 2.0)]).as_deref(),
            Some("M1,2Z")
        );
        assert_eq!(
            line_path(&[LayoutPoint::new(1.0, 2.0), LayoutPoint::new(3.5, 4.0)]).as_deref(),
            Some("M1,2L3.5,4")
        );
    }
}
