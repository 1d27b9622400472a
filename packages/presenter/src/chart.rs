//! Chart model and SVG drawing.
//!
//! A [`Chart`] is a plain description of what to draw: kind, labels and one
//! point per table row, in table order. [`Chart::to_svg`] draws it with
//! `plotters` as a standalone SVG document.

#![allow(clippy::cast_precision_loss)]

use crime_dashboard_report_models::{ChartKind, ReportTable};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use serde::Serialize;

use crate::PresenterError;

const WIDTH: u32 = 720;
const HEIGHT: u32 = 400;
const ROW_HEIGHT: u32 = 26;
const FRAME_HEIGHT: u32 = 120;
const MAX_LABEL_CHARS: usize = 24;
const FONT: &str = "sans-serif";

const PALETTE: [RGBColor; 10] = [
    RGBColor(0x4e, 0x79, 0xa7),
    RGBColor(0xf2, 0x8e, 0x2b),
    RGBColor(0xe1, 0x57, 0x59),
    RGBColor(0x76, 0xb7, 0xb2),
    RGBColor(0x59, 0xa1, 0x4f),
    RGBColor(0xed, 0xc9, 0x48),
    RGBColor(0xb0, 0x7a, 0xa1),
    RGBColor(0xff, 0x9d, 0xa7),
    RGBColor(0x9c, 0x75, 0x5f),
    RGBColor(0xba, 0xb0, 0xac),
];

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// One plotted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Category label.
    pub label: String,
    /// Count for the category.
    pub value: u64,
}

/// Renderable chart for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    /// How the points are drawn.
    pub kind: ChartKind,
    /// Title drawn above the plot.
    pub title: String,
    /// Axis label for categories.
    pub category_label: String,
    /// Axis label for counts.
    pub count_label: String,
    /// Points in table order.
    pub points: Vec<ChartPoint>,
}

/// Builds the chart for a table.
///
/// Points mirror the table rows exactly; an empty table gives a chart with
/// no points.
#[must_use]
pub fn render(table: &ReportTable, kind: ChartKind, title: &str) -> Chart {
    let definition = table.definition();
    Chart {
        kind,
        title: title.to_string(),
        category_label: definition.category_header.to_string(),
        count_label: definition.count_header.to_string(),
        points: table
            .rows
            .iter()
            .map(|row| ChartPoint {
                label: row.category.clone(),
                value: row.count,
            })
            .collect(),
    }
}

/// Builds the chart for a table using its catalog chart kind and title.
#[must_use]
pub fn render_default(table: &ReportTable) -> Chart {
    let definition = table.definition();
    render(table, definition.chart, definition.title)
}

fn short_label(label: &str) -> String {
    let label = if label.is_empty() { "(blank)" } else { label };
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{head}…")
    } else {
        label.to_string()
    }
}

const fn color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::Exact(index) | SegmentValue::CenterOf(index) => usize::try_from(*index)
            .ok()
            .and_then(|index| labels.get(index))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

fn centered(area_size: u32) -> i32 {
    i32::try_from(area_size / 2).unwrap_or(i32::MAX)
}

impl Chart {
    fn segments(&self) -> u32 {
        u32::try_from(self.points.len()).unwrap_or(u32::MAX)
    }

    /// Upper bound of the count axis, leaving headroom above the tallest mark.
    fn count_ceiling(&self) -> u64 {
        let max = self.points.iter().map(|p| p.value).max().unwrap_or(0);
        max + max / 10 + 1
    }

    fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| short_label(&p.label)).collect()
    }

    fn indexed_values(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.points.iter().zip(0u32..).map(|(p, i)| (i, p.value))
    }

    fn height(&self) -> u32 {
        match self.kind {
            ChartKind::HorizontalBar => self
                .segments()
                .saturating_mul(ROW_HEIGHT)
                .saturating_add(FRAME_HEIGHT)
                .max(HEIGHT),
            ChartKind::Bar | ChartKind::Pie | ChartKind::Line => HEIGHT,
        }
    }

    /// Draws the chart as a standalone SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`PresenterError::Chart`] if `plotters` fails to lay out or
    /// draw the chart.
    pub fn to_svg(&self) -> Result<String, PresenterError> {
        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (WIDTH, self.height())).into_drawing_area();
            self.draw(&root).map_err(|e| PresenterError::Chart(e.to_string()))?;
        }
        Ok(svg)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let area = root.titled(&self.title, (FONT, 22.0))?;

        if self.points.is_empty() {
            let (width, height) = area.dim_in_pixel();
            area.draw(&Text::new(
                "No data",
                (centered(width) - 30, centered(height)),
                (FONT, 18.0),
            ))?;
        } else {
            match self.kind {
                ChartKind::Bar => self.draw_bars(&area)?,
                ChartKind::HorizontalBar => self.draw_horizontal_bars(&area)?,
                ChartKind::Pie => self.draw_pie(&area)?,
                ChartKind::Line => self.draw_line(&area)?,
            }
        }

        root.present()
    }

    fn draw_bars<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        let labels = self.labels();
        let formatter = |value: &SegmentValue<u32>| segment_label(&labels, value);

        let mut chart = ChartBuilder::on(area)
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(56)
            .build_cartesian_2d(
                (0u32..self.segments()).into_segmented(),
                0u64..self.count_ceiling(),
            )?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            // The segmented axis ends with one empty slot.
            .x_labels(self.points.len() + 1)
            .x_label_formatter(&formatter)
            .x_desc(self.category_label.as_str())
            .y_desc(self.count_label.as_str())
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(color(0).filled())
                .margin(8)
                .data(self.indexed_values()),
        )?;

        Ok(())
    }

    fn draw_horizontal_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> DrawResult<DB> {
        // Segment 0 sits at the bottom, so rows are laid out in reverse to
        // keep the first row on top.
        let labels: Vec<String> = self.labels().into_iter().rev().collect();
        let formatter = |value: &SegmentValue<u32>| segment_label(&labels, value);

        let mut chart = ChartBuilder::on(area)
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(190)
            .build_cartesian_2d(
                0u64..self.count_ceiling(),
                (0u32..self.segments()).into_segmented(),
            )?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(self.points.len() + 1)
            .y_label_formatter(&formatter)
            .x_desc(self.count_label.as_str())
            .draw()?;

        chart.draw_series(
            Histogram::horizontal(&chart)
                .style(color(0).filled())
                .margin(4)
                .data(self.points.iter().rev().zip(0u32..).map(|(p, i)| (i, p.value))),
        )?;

        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        let (width, height) = area.dim_in_pixel();
        let center = (centered(width), centered(height));
        let radius = f64::from(width.min(height)) * 0.35;

        let sizes: Vec<f64> = self.points.iter().map(|p| p.value as f64).collect();
        let colors: Vec<RGBColor> = (0..self.points.len()).map(color).collect();
        let labels: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("{} ({})", short_label(&p.label), p.value))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style((FONT, 13.0));
        area.draw(&pie)?;

        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        let labels = self.labels();
        let formatter = |value: &u32| {
            usize::try_from(*value)
                .ok()
                .and_then(|index| labels.get(index))
                .cloned()
                .unwrap_or_default()
        };

        let last = self.segments().saturating_sub(1).max(1);
        let mut chart = ChartBuilder::on(area)
            .margin(24)
            .x_label_area_size(40)
            .y_label_area_size(56)
            .build_cartesian_2d(0u32..last, 0u64..self.count_ceiling())?;

        chart
            .configure_mesh()
            .x_labels(self.points.len())
            .x_label_formatter(&formatter)
            .x_desc(self.category_label.as_str())
            .y_desc(self.count_label.as_str())
            .draw()?;

        chart.draw_series(LineSeries::new(self.indexed_values(), color(0).stroke_width(2)))?;
        chart.draw_series(
            self.indexed_values()
                .map(|point| Circle::new(point, 4, color(0).filled())),
        )?;

        Ok(())
    }
}
