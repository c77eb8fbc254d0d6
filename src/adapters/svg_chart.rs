//! SVG line-chart rendering for dashboard charts.
//!
//! Every series shares one date axis; x positions come from the calendar date,
//! so series with different trading calendars line up. Undefined samples break
//! the path instead of being drawn.

use crate::domain::dashboard::{ChartSeries, ChartSpec, SeriesColor};
use crate::domain::parameters::Theme;
use crate::ports::chart_port::ChartRenderer;
use chrono::NaiveDate;
use std::fmt::Write;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

struct Palette {
    background: &'static str,
    text: &'static str,
    axis: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: "#ffffff",
            text: "#333333",
            axis: "#cccccc",
        },
        Theme::Dark => Palette {
            background: "#111111",
            text: "#e0e0e0",
            axis: "#444444",
        },
    }
}

fn series_color(color: SeriesColor, theme: Theme) -> &'static str {
    match (color, theme) {
        (SeriesColor::Primary, Theme::Light) => "#004080",
        (SeriesColor::Primary, Theme::Dark) => "#4da3ff",
        (SeriesColor::Comparison, _) | (SeriesColor::Rsi, _) => "#ff8c00",
        (SeriesColor::Overbought, _) | (SeriesColor::MacdSignal, _) => "#e03131",
        (SeriesColor::Oversold, _) => "#2f9e44",
        (SeriesColor::MacdLine, Theme::Light) => "#1c7ed6",
        (SeriesColor::MacdLine, Theme::Dark) => "#74c0fc",
    }
}

pub struct SvgChartRenderer {
    width: f64,
}

impl SvgChartRenderer {
    pub fn new(width: u32) -> Self {
        Self {
            width: width as f64,
        }
    }
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self::new(900)
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &ChartSpec) -> String {
        let width = self.width;
        let height = chart.height as f64;
        let colors = palette(chart.theme);
        let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#,
            w = width,
            h = height
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            colors.background
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="20" font-size="14" font-weight="bold" fill="{}">{}</text>"#,
            MARGIN_LEFT,
            colors.text,
            escape_xml(&chart.title)
        );
        let _ = writeln!(
            svg,
            r#"  <line x1="{x}" y1="{top}" x2="{x}" y2="{bottom}" stroke="{c}" stroke-width="1"/>"#,
            x = MARGIN_LEFT,
            top = MARGIN_TOP,
            bottom = height - MARGIN_BOTTOM,
            c = colors.axis
        );
        let _ = writeln!(
            svg,
            r#"  <line x1="{left}" y1="{y}" x2="{right}" y2="{y}" stroke="{c}" stroke-width="1"/>"#,
            left = MARGIN_LEFT,
            right = width - MARGIN_RIGHT,
            y = height - MARGIN_BOTTOM,
            c = colors.axis
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-size="12" fill="{}">{}</text>"#,
            MARGIN_LEFT + plot_width / 2.0,
            height - 10.0,
            colors.text,
            escape_xml(&chart.x_axis_title)
        );
        let _ = writeln!(
            svg,
            r#"  <text x="15" y="{y}" text-anchor="middle" font-size="12" fill="{c}" transform="rotate(-90 15 {y})">{t}</text>"#,
            y = MARGIN_TOP + plot_height / 2.0,
            c = colors.text,
            t = escape_xml(&chart.y_axis_title)
        );

        let bounds = date_bounds(&chart.series).zip(value_bounds(chart));
        if let Some(((first, last), (y_min, y_max))) = bounds {
            let day_span = (last - first).num_days().max(1) as f64;
            let y_span = (y_max - y_min).max(f64::EPSILON);
            let x_scale =
                |d: NaiveDate| MARGIN_LEFT + ((d - first).num_days() as f64 / day_span) * plot_width;
            let y_scale = |v: f64| MARGIN_TOP + plot_height - ((v - y_min) / y_span) * plot_height;

            for (tick, y) in [(y_max, MARGIN_TOP), (y_min, MARGIN_TOP + plot_height)] {
                let _ = writeln!(
                    svg,
                    r#"  <text x="{}" y="{:.1}" text-anchor="end" font-size="10" fill="{}">{:.2}</text>"#,
                    MARGIN_LEFT - 5.0,
                    y + 4.0,
                    colors.text,
                    tick
                );
            }
            for (d, anchor) in [(first, "start"), (last, "end")] {
                let _ = writeln!(
                    svg,
                    r#"  <text x="{:.1}" y="{}" text-anchor="{}" font-size="10" fill="{}">{}</text>"#,
                    x_scale(d),
                    height - MARGIN_BOTTOM + 15.0,
                    anchor,
                    colors.text,
                    d.format("%Y-%m-%d")
                );
            }

            for series in &chart.series {
                let path = path_data(series, &x_scale, &y_scale);
                if path.is_empty() {
                    continue;
                }
                let dash = if series.style.dashed {
                    r#" stroke-dasharray="6 4""#
                } else {
                    ""
                };
                let _ = writeln!(
                    svg,
                    r#"  <path d="{}" fill="none" stroke="{}" stroke-width="1.5"{}/>"#,
                    path,
                    series_color(series.style.color, chart.theme),
                    dash
                );
            }
        }

        for (i, series) in chart.series.iter().enumerate() {
            let y = MARGIN_TOP + 12.0 + i as f64 * 14.0;
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{}" text-anchor="end" font-size="11" fill="{}">{}</text>"#,
                width - MARGIN_RIGHT,
                y,
                series_color(series.style.color, chart.theme),
                escape_xml(&series.label)
            );
        }

        for (i, notice) in chart.notices.iter().enumerate() {
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{}" text-anchor="middle" font-size="13" fill="{}">{}</text>"#,
                MARGIN_LEFT + plot_width / 2.0,
                MARGIN_TOP + plot_height / 2.0 + i as f64 * 18.0,
                colors.text,
                escape_xml(notice)
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn date_bounds(series: &[ChartSeries]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = series.iter().flat_map(|s| s.points.iter().map(|(d, _)| *d));
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

fn value_bounds(chart: &ChartSpec) -> Option<(f64, f64)> {
    if chart.y_range.is_some() {
        return chart.y_range;
    }
    let mut values = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().filter_map(|(_, v)| *v));
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

fn path_data(
    series: &ChartSeries,
    x_scale: &dyn Fn(NaiveDate) -> f64,
    y_scale: &dyn Fn(f64) -> f64,
) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (date, value) in &series.points {
        match value {
            Some(v) => {
                let cmd = if pen_down { 'L' } else { 'M' };
                if !path.is_empty() {
                    path.push(' ');
                }
                let _ = write!(path, "{} {:.1} {:.1}", cmd, x_scale(*date), y_scale(*v));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    path
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::LineStyle;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn chart(series: Vec<ChartSeries>, theme: Theme) -> ChartSpec {
        ChartSpec {
            title: "RSI (Relative Strength Index)".into(),
            x_axis_title: "Date".into(),
            y_axis_title: "RSI Value".into(),
            height: 300,
            y_range: None,
            series,
            theme,
            notices: Vec::new(),
        }
    }

    fn line(label: &str, points: Vec<(NaiveDate, Option<f64>)>) -> ChartSeries {
        ChartSeries {
            label: label.into(),
            style: LineStyle::solid(SeriesColor::Rsi),
            points,
        }
    }

    #[test]
    fn renders_svg_with_fixed_height() {
        let svg = SvgChartRenderer::default().render(&chart(
            vec![line("RSI", vec![(date(1), Some(40.0)), (date(2), Some(60.0))])],
            Theme::Light,
        ));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"height="300""#));
        assert!(svg.contains("RSI (Relative Strength Index)"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn undefined_samples_break_the_path() {
        let series = line(
            "RSI",
            vec![
                (date(1), Some(10.0)),
                (date(2), Some(20.0)),
                (date(3), None),
                (date(4), Some(30.0)),
            ],
        );
        let path = path_data(&series, &|_| 0.0, &|_| 0.0);
        assert_eq!(path.matches('M').count(), 2);
        assert_eq!(path.matches('L').count(), 1);
    }

    #[test]
    fn all_undefined_series_draws_no_path() {
        let svg = SvgChartRenderer::default().render(&chart(
            vec![line("RSI", vec![(date(1), None), (date(2), None)])],
            Theme::Light,
        ));
        assert!(!svg.contains("<path"));
        assert!(svg.contains(">RSI</text>"));
    }

    #[test]
    fn empty_chart_still_renders_notice() {
        let mut spec = chart(vec![line("RSI", Vec::new())], Theme::Dark);
        spec.notices.push("No data available for ASELS.IS".into());
        let svg = SvgChartRenderer::default().render(&spec);
        assert!(svg.contains("No data available for ASELS.IS"));
        assert!(svg.contains("#111111"));
    }

    #[test]
    fn theme_changes_palette_only() {
        let series = vec![line("RSI", vec![(date(1), Some(40.0)), (date(5), Some(60.0))])];
        let light = SvgChartRenderer::default().render(&chart(series.clone(), Theme::Light));
        let dark = SvgChartRenderer::default().render(&chart(series, Theme::Dark));

        assert!(light.contains("#ffffff"));
        assert!(dark.contains("#111111"));
        let path_of = |svg: &str| {
            svg.lines()
                .find(|l| l.contains("<path"))
                .and_then(|l| l.split('"').nth(1))
                .map(str::to_string)
        };
        assert!(path_of(&light).is_some());
        assert_eq!(path_of(&light), path_of(&dark));
    }

    #[test]
    fn dashed_series_get_dasharray() {
        let mut reference = line("Overbought", vec![(date(1), Some(70.0)), (date(2), Some(70.0))]);
        reference.style = LineStyle::dashed(SeriesColor::Overbought);
        let mut spec = chart(vec![reference], Theme::Light);
        spec.y_range = Some((0.0, 100.0));
        let svg = SvgChartRenderer::default().render(&spec);
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = SvgChartRenderer::default().render(&chart(
            vec![line("A&B <Co>", vec![(date(1), Some(1.0))])],
            Theme::Light,
        ));
        assert!(svg.contains("A&amp;B &lt;Co&gt;"));
    }
}
