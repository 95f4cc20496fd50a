use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::analysis::correlation::CorrelationMatrix;
use crate::analysis::missing::MissingProfile;
use crate::analysis::profile::{FrequencyTable, Histogram};
use crate::analysis::relationship::Relationship;
use crate::color::{ColorMap, heat_color};

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated heatmap painted cell by cell, labels on the left and top.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    if n == 0 {
        ui.label("No continuous columns: nothing to correlate.");
        return;
    }

    let label_space = 110.0;
    let cell = ((ui.available_width() - label_space) / n as f32).clamp(28.0, 72.0);
    let size = Vec2::splat(label_space + cell * n as f32);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let origin = rect.min + Vec2::splat(label_space);
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    for (i, name) in matrix.columns.iter().enumerate() {
        let offset = i as f32 * cell + cell / 2.0;
        painter.text(
            egui::pos2(origin.x - 6.0, origin.y + offset),
            Align2::RIGHT_CENTER,
            name,
            font.clone(),
            text_color,
        );
        painter.text(
            egui::pos2(origin.x + offset, origin.y - 6.0),
            Align2::CENTER_BOTTOM,
            name,
            font.clone(),
            text_color,
        );
    }

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, &r) in row.iter().enumerate() {
            let min = origin + Vec2::new(j as f32 * cell, i as f32 * cell);
            let cell_rect = Rect::from_min_size(min, Vec2::splat(cell));
            painter.rect_filled(cell_rect.shrink(1.0), 0.0, heat_color(r));
            let label = if r.is_nan() { "NaN".to_string() } else { format!("{r:.2}") };
            painter.text(
                cell_rect.center(),
                Align2::CENTER_CENTER,
                label,
                font.clone(),
                Color32::RED,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

fn labelled_bars(id: &str, ui: &mut Ui, bars: Vec<Bar>, color: Color32, y_label: &str) {
    let chart = BarChart::new(bars).color(color);
    Plot::new(id)
        .height(260.0)
        .y_axis_label(y_label)
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Non-missing fraction per column, like a `missingno` bar chart.
pub fn missing_values_chart(ui: &mut Ui, profile: &MissingProfile) {
    let bars = profile
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new(i as f64, 1.0 - e.fraction)
                .name(format!("{} ({} missing)", e.column, e.missing))
                .width(0.7)
        })
        .collect();
    labelled_bars("missing_chart", ui, bars, Color32::DARK_GRAY, "present fraction");
}

pub fn histogram_chart(ui: &mut Ui, id: &str, hist: &Histogram) {
    let bars = hist
        .counts
        .iter()
        .zip(hist.edges.windows(2))
        .map(|(&count, edge)| {
            let width = edge[1] - edge[0];
            Bar::new(edge[0] + width / 2.0, count as f64)
                .name(format!("[{:.2}, {:.2})", edge[0], edge[1]))
                .width(width)
        })
        .collect();
    let chart = BarChart::new(bars).color(Color32::LIGHT_BLUE);
    Plot::new(id)
        .height(280.0)
        .y_axis_label("count")
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

pub fn frequency_chart(ui: &mut Ui, id: &str, table: &FrequencyTable) {
    if table.is_empty() {
        ui.label("No rows to count.");
        return;
    }
    let bars = table
        .entries
        .iter()
        .enumerate()
        .map(|(i, (label, count))| Bar::new(i as f64, *count as f64).name(label).width(0.7))
        .collect();
    labelled_bars(id, ui, bars, Color32::from_rgb(255, 99, 71), "count");
}

// ---------------------------------------------------------------------------
// Scatter plot (relationship tab)
// ---------------------------------------------------------------------------

/// One point series per group so the legend lists every label.
pub fn scatter_plot(ui: &mut Ui, rel: &Relationship, colors: Option<&ColorMap>) {
    let groups: Vec<Option<&str>> = if rel.group_column.is_some() {
        rel.groups().into_iter().map(Some).collect()
    } else {
        vec![None]
    };

    Plot::new("relationship_plot")
        .legend(Legend::default())
        .x_axis_label(&rel.x_column)
        .y_axis_label(&rel.y_column)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for group in groups {
                let points: PlotPoints = rel
                    .points
                    .iter()
                    .filter(|p| p.group.as_deref() == group)
                    .map(|p| [p.x, p.y])
                    .collect();
                let color = colors.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(group));
                let name = group.unwrap_or(&rel.y_column);

                plot_ui.points(Points::new(points).name(name).color(color).radius(3.0));
            }
        });
}
