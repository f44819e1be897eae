use crate::plot::Marker;
use plotters::style::RGBColor;

const COLORS: [RGBColor; 7] = [
    // darkorange
    RGBColor(0xFF, 0x8C, 0x00),
    // green
    RGBColor(0x00, 0x80, 0x00),
    // firebrick
    RGBColor(0xB2, 0x22, 0x22),
    // dodgerblue
    RGBColor(0x1E, 0x90, 0xFF),
    // mediumvioletred
    RGBColor(0xC7, 0x15, 0x85),
    // orangered
    RGBColor(0xFF, 0x45, 0x00),
    // saddlebrown
    RGBColor(0x8B, 0x45, 0x13),
];

const MARKERS: [Marker; 7] = [
    Marker::Circle,
    Marker::Square,
    Marker::TriangleUp,
    Marker::Diamond,
    Marker::TriangleDown,
    Marker::Star,
    Marker::Plus,
];

pub struct PlotFmt;

impl PlotFmt {
    /// Color of the `index`-th group of a panel. Groups past the end of the
    /// palette wrap around.
    pub fn color(index: usize) -> RGBColor {
        COLORS[index % COLORS.len()]
    }

    pub fn marker(index: usize) -> Marker {
        MARKERS[index % MARKERS.len()]
    }

    /// Name of the figure of the experiments under `path_suffix`, e.g.
    /// `/noise/run1` is plotted to `noise_run1_plot.svg`.
    pub fn file_name(path_suffix: &str) -> String {
        format!("{}_plot.svg", Self::stem(path_suffix))
    }

    /// Name of the target rates figure of the experiments under
    /// `path_suffix`.
    pub fn rates_file_name(path_suffix: &str) -> String {
        format!("{}_rates.svg", Self::stem(path_suffix))
    }

    // the first character of a suffix is its separator, whichever it is
    fn stem(path_suffix: &str) -> String {
        let mut chars = path_suffix.chars();
        chars.next();
        chars.as_str().replace('/', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_wrap() {
        assert_eq!(PlotFmt::color(0), RGBColor(0xFF, 0x8C, 0x00));
        assert_eq!(PlotFmt::color(7), PlotFmt::color(0));
        assert_eq!(PlotFmt::color(13), PlotFmt::color(6));
        assert_eq!(PlotFmt::marker(7), Marker::Circle);
        assert_eq!(PlotFmt::marker(8), Marker::Square);
    }

    #[test]
    fn file_names() {
        assert_eq!(PlotFmt::file_name("/noise"), "noise_plot.svg");
        assert_eq!(PlotFmt::file_name("/a/b"), "a_b_plot.svg");
        assert_eq!(PlotFmt::file_name(""), "_plot.svg");
        assert_eq!(PlotFmt::file_name("_v2"), "v2_plot.svg");
        assert_eq!(PlotFmt::file_name("-a/b"), "a_b_plot.svg");
        assert_eq!(PlotFmt::rates_file_name("/noise"), "noise_rates.svg");
    }
}
