//! Point and vector feature rendering.
//!
//! Two render modes are selected from the style flags: single points
//! (dots, discs, symbols, zoomable markers, labels) and vectors (arrows
//! or wind barbs built from paired u/v component data objects). Both
//! modes share projection, station filters and greedy spatial thinning.

use crate::barbs::{barb_glyph, uv_to_speed_direction, MS_TO_KNOTS};
use crate::commands::{self, DrawCommand};
use crate::draw::DrawImage;
use crate::error::RenderError;
use crate::legend::{pixel_color_for_value, LegendTable};
use crate::warper::Warper;
use datasource::{DataObject, DataSource};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};
use wms_common::{Color, RenderMethod, StyleConfiguration};

/// Margin in pixels around the canvas inside which features are still
/// considered; labels of slightly off-canvas points may reach in.
const CANVAS_MARGIN: f64 = 20.0;

/// Thinning radius applied when the style requests thinning without an
/// explicit radius.
const DEFAULT_THINNING_RADIUS: f64 = 25.0;

/// Point draw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Points,
    Discs,
    Symbol,
    Zoomable,
    Vector,
    Barb,
}

impl DrawMode {
    fn parse(token: &str) -> Option<DrawMode> {
        match token.to_ascii_lowercase().as_str() {
            "point" | "points" => Some(DrawMode::Points),
            "disc" | "discs" => Some(DrawMode::Discs),
            "symbol" => Some(DrawMode::Symbol),
            "zoomable" => Some(DrawMode::Zoomable),
            "vector" => Some(DrawMode::Vector),
            "barb" => Some(DrawMode::Barb),
            _ => None,
        }
    }
}

/// Parsed point-rendering settings.
///
/// Built from a `;`-separated `key=value` style string and immutable
/// afterwards; the renderer rebuilds it only when the string changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSettings {
    pub mode: DrawMode,
    pub thinning_radius: Option<f64>,
    pub font_size: f32,
    pub font_file: Option<PathBuf>,
    pub disc_radius: i32,
    /// Radius at which fanned-out labels are placed around a point.
    pub text_radius: i32,
    /// Draw a small dot at the exact feature location.
    pub dot: bool,
    pub angle_start: f32,
    pub angle_step: f32,
    pub use_angles: bool,
    pub plot_station_id: bool,
    pub plot_value: bool,
    pub text_format: String,
    /// Label color; derived from the legend when absent.
    pub text_color: Option<Color>,
    /// Marker fill; derived from the legend when absent.
    pub fill_color: Option<Color>,
    pub line_color: Color,
    pub vector_line_color: Color,
    pub vector_line_width: f32,
    pub vector_scale: f32,
    pub vector_text_format: String,
    pub vector_plot_station_id: bool,
    pub vector_plot_value: bool,
    /// Station allow-list; empty means all stations.
    pub use_points: BTreeSet<String>,
    /// Station deny-list.
    pub skip_points: BTreeSet<String>,
}

impl Default for PointSettings {
    fn default() -> Self {
        Self {
            mode: DrawMode::Points,
            thinning_radius: None,
            font_size: 10.0,
            font_file: None,
            disc_radius: 8,
            text_radius: 12,
            dot: false,
            angle_start: 90.0,
            angle_step: 180.0,
            use_angles: false,
            plot_station_id: false,
            plot_value: true,
            text_format: "%0.1f".to_string(),
            text_color: None,
            fill_color: None,
            line_color: Color::black(),
            vector_line_color: Color::black(),
            vector_line_width: 1.0,
            vector_scale: 1.0,
            vector_text_format: "%0.1f".to_string(),
            vector_plot_station_id: false,
            vector_plot_value: false,
            use_points: BTreeSet::new(),
            skip_points: BTreeSet::new(),
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, RenderError> {
    value.parse().map_err(|_| RenderError::InvalidSetting {
        key: key.to_string(),
        message: format!("'{}' is not a number", value),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, RenderError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(RenderError::InvalidSetting {
            key: key.to_string(),
            message: format!("'{}' is not a boolean", value),
        }),
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, RenderError> {
    Color::from_hex(value).ok_or_else(|| RenderError::InvalidSetting {
        key: key.to_string(),
        message: format!("'{}' is not a hex color", value),
    })
}

fn parse_name_set(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl PointSettings {
    /// Parse a settings string such as
    /// `"mode=disc;discradius=10;thinningradius=25;skippoints=DBL33"`.
    ///
    /// Unknown keys are logged and ignored; malformed values for known
    /// keys are errors.
    pub fn parse(settings: &str) -> Result<PointSettings, RenderError> {
        let mut parsed = PointSettings::default();
        for raw in settings.split(';') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key.trim().to_ascii_lowercase(), value.trim()),
                None => (token.to_ascii_lowercase(), ""),
            };
            match key.as_str() {
                "mode" | "pointstyle" => {
                    parsed.mode =
                        DrawMode::parse(value).ok_or_else(|| RenderError::InvalidSetting {
                            key: key.clone(),
                            message: format!("'{}' is not a draw mode", value),
                        })?;
                }
                "thinningradius" => {
                    parsed.thinning_radius = Some(parse_number::<f64>(&key, value)?);
                }
                "fontsize" => parsed.font_size = parse_number(&key, value)?,
                "fontfile" => parsed.font_file = Some(PathBuf::from(value)),
                "discradius" => parsed.disc_radius = parse_number(&key, value)?,
                "textradius" => parsed.text_radius = parse_number(&key, value)?,
                "dot" => parsed.dot = parse_bool(&key, value)?,
                "anglestart" => {
                    parsed.angle_start = parse_number(&key, value)?;
                    parsed.use_angles = true;
                }
                "anglestep" => {
                    parsed.angle_step = parse_number(&key, value)?;
                    parsed.use_angles = true;
                }
                "plotstationid" => parsed.plot_station_id = parse_bool(&key, value)?,
                "plotvalue" => parsed.plot_value = parse_bool(&key, value)?,
                "textformat" => parsed.text_format = value.to_string(),
                "textcolor" => parsed.text_color = Some(parse_color(&key, value)?),
                "fillcolor" => parsed.fill_color = Some(parse_color(&key, value)?),
                "linecolor" => parsed.line_color = parse_color(&key, value)?,
                "vectorlinecolor" => parsed.vector_line_color = parse_color(&key, value)?,
                "vectorlinewidth" => parsed.vector_line_width = parse_number(&key, value)?,
                "vectorscale" => parsed.vector_scale = parse_number(&key, value)?,
                "vectortextformat" => parsed.vector_text_format = value.to_string(),
                "vectorplotstationid" => {
                    parsed.vector_plot_station_id = parse_bool(&key, value)?
                }
                "vectorplotvalue" => parsed.vector_plot_value = parse_bool(&key, value)?,
                "usepoints" => parsed.use_points = parse_name_set(value),
                "skippoints" => parsed.skip_points = parse_name_set(value),
                _ => warn!(key = %key, "ignoring unknown point style setting"),
            }
        }
        Ok(parsed)
    }

    /// Whether a station id passes the allow/deny filters.
    fn passes_filter(&self, id: Option<&str>) -> bool {
        match id {
            Some(id) => {
                if self.skip_points.contains(id) {
                    return false;
                }
                self.use_points.is_empty() || self.use_points.contains(id)
            }
            // Unnamed features only pass when no allow-list is active.
            None => self.use_points.is_empty(),
        }
    }
}

/// Format a value with a printf-style `%0.1f`/`%d` pattern; text around
/// the specifier is preserved.
fn format_value(format: &str, value: f64) -> String {
    if let Some(start) = format.find('%') {
        let spec = &format[start..];
        if spec.starts_with("%d") {
            return format.replacen("%d", &format!("{}", value.round() as i64), 1);
        }
        if let Some(f_pos) = spec.find('f') {
            let precision = spec[1..f_pos]
                .split('.')
                .nth(1)
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(1);
            let token = &format[start..start + f_pos + 1];
            return format.replacen(token, &format!("{:.*}", precision, value), 1);
        }
    }
    format!("{:.1}", value)
}

/// Greedy input-order thinning: a candidate is accepted only when it is
/// at least `radius` pixels from every already-accepted point. No global
/// optimum is sought.
fn thin_accepts(accepted: &[(f64, f64)], candidate: (f64, f64), radius: f64) -> bool {
    accepted.iter().all(|(ax, ay)| {
        let dx = ax - candidate.0;
        let dy = ay - candidate.1;
        dx * dx + dy * dy >= radius * radius
    })
}

/// Renders point and vector feature styles.
#[derive(Debug, Default)]
pub struct PointRenderer {
    settings: PointSettings,
    settings_source: String,
}

impl PointRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &PointSettings {
        &self.settings
    }

    /// Update the renderer from a settings string. The settings are
    /// rebuilt only when the string differs from the current one.
    pub fn set(&mut self, settings: &str) -> Result<(), RenderError> {
        if settings == self.settings_source {
            return Ok(());
        }
        self.settings = PointSettings::parse(settings)?;
        self.settings_source = settings.to_string();
        Ok(())
    }

    /// Render the data source's features onto the canvas.
    pub fn render(
        &self,
        warper: &dyn Warper,
        source: &DataSource,
        image: &mut DrawImage,
    ) -> Result<(), RenderError> {
        if let Some(font_file) = &self.settings.font_file {
            if !image.has_font() {
                image.load_font(font_file)?;
            }
        }
        let plan = self.plan(warper, source, image.width(), image.height())?;
        commands::execute(&plan, image);
        Ok(())
    }

    /// Plan the draw commands for the data source without painting.
    pub fn plan(
        &self,
        warper: &dyn Warper,
        source: &DataSource,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Vec<DrawCommand>, RenderError> {
        if !source.is_geometry_resolved() {
            return Err(RenderError::UnresolvedDataSource(source.variable.clone()));
        }
        let style = source.style.clone().unwrap_or_default();

        let vector_mode = matches!(self.settings.mode, DrawMode::Vector | DrawMode::Barb)
            || style.render_method.contains(RenderMethod::VECTOR)
            || style.render_method.contains(RenderMethod::BARB);

        if vector_mode {
            self.plan_vector_points(warper, source, &style, canvas_width, canvas_height)
        } else {
            self.plan_single_points(warper, source, &style, canvas_width, canvas_height)
        }
    }

    /// Legend class index for a value, using the source's style.
    pub fn pixel_index_for_value(&self, source: &DataSource, value: f64) -> usize {
        let style = source.style.clone().unwrap_or_default();
        crate::legend::pixel_index_for_value(&style, value)
    }

    /// Legend color for a value, using the source's style.
    pub fn pixel_color_for_value(&self, source: &DataSource, value: f64) -> Color {
        let style = source.style.clone().unwrap_or_default();
        let legend = LegendTable::from_style(&style);
        pixel_color_for_value(&legend, &style, value)
    }

    fn thinning_radius(&self, style: &StyleConfiguration) -> Option<f64> {
        self.settings.thinning_radius.or_else(|| {
            style
                .render_method
                .contains(RenderMethod::THIN)
                .then_some(DEFAULT_THINNING_RADIUS)
        })
    }

    fn on_canvas(px: f64, py: f64, width: u32, height: u32) -> bool {
        px >= -CANVAS_MARGIN
            && py >= -CANVAS_MARGIN
            && px <= width as f64 + CANVAS_MARGIN
            && py <= height as f64 + CANVAS_MARGIN
    }

    /// Single-point mode: one marker per feature, with optional station
    /// id and value labels.
    fn plan_single_points(
        &self,
        warper: &dyn Warper,
        source: &DataSource,
        style: &StyleConfiguration,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Vec<DrawCommand>, RenderError> {
        let settings = &self.settings;
        let Some(object) = source.data_objects.first() else {
            debug!(variable = %source.variable, "no data objects to render");
            return Ok(Vec::new());
        };
        let legend = LegendTable::from_style(style);
        let thinning = self.thinning_radius(style);

        let mut commands = Vec::new();
        let mut accepted: Vec<(f64, f64)> = Vec::new();

        for (index, feature) in object.points.iter().enumerate() {
            if !settings.passes_filter(feature.id.as_deref()) {
                continue;
            }
            let Some((px, py)) = warper.geo_to_pixel(feature.x, feature.y) else {
                continue;
            };
            if !Self::on_canvas(px, py, canvas_width, canvas_height) {
                continue;
            }
            if let Some(radius) = thinning {
                if !thin_accepts(&accepted, (px, py), radius) {
                    continue;
                }
            }
            accepted.push((px, py));

            if let Some((low, high)) = style.legend_value_range {
                if feature.value < low || feature.value > high {
                    continue;
                }
            }
            if feature.value.is_nan()
                || object.nodata.map(|n| feature.value == n).unwrap_or(false)
            {
                continue;
            }

            let (x, y) = (px.round() as i32, py.round() as i32);
            let fill = settings
                .fill_color
                .unwrap_or_else(|| pixel_color_for_value(&legend, style, feature.value));

            match settings.mode {
                DrawMode::Points => {
                    if settings.dot {
                        commands.push(DrawCommand::Dot {
                            x,
                            y,
                            color: settings.line_color,
                        });
                    } else {
                        commands.push(DrawCommand::Disc {
                            x,
                            y,
                            radius: 2,
                            fill,
                            outline: settings.line_color,
                        });
                    }
                }
                DrawMode::Discs => {
                    commands.push(DrawCommand::Disc {
                        x,
                        y,
                        radius: settings.disc_radius,
                        fill,
                        outline: settings.line_color,
                    });
                }
                DrawMode::Symbol => match style.symbol_for_value(feature.value) {
                    Some(interval) => commands.push(DrawCommand::Symbol {
                        x: x + interval.offset_x.round() as i32,
                        y: y + interval.offset_y.round() as i32,
                        size: settings.font_size * 1.5,
                        symbol: interval.symbol.clone(),
                        color: fill,
                    }),
                    None => commands.push(DrawCommand::Dot {
                        x,
                        y,
                        color: settings.line_color,
                    }),
                },
                DrawMode::Zoomable => {
                    // Marker size follows the zoom level: more pixels per
                    // source cell means a closer view.
                    let pixels_per_cell = warper.pixel_density() * source.cell_size_x.abs();
                    if pixels_per_cell < 4.0 {
                        commands.push(DrawCommand::Dot {
                            x,
                            y,
                            color: settings.line_color,
                        });
                    } else {
                        let radius = ((pixels_per_cell / 2.0) as i32)
                            .clamp(2, settings.disc_radius * 4);
                        commands.push(DrawCommand::Disc {
                            x,
                            y,
                            radius,
                            fill,
                            outline: settings.line_color,
                        });
                    }
                }
                DrawMode::Vector | DrawMode::Barb => unreachable!("handled by vector mode"),
            }

            self.plan_labels(source, index, feature.value, x, y, &mut commands);
        }
        Ok(commands)
    }

    /// Station id and value labels for one accepted point.
    fn plan_labels(
        &self,
        source: &DataSource,
        feature_index: usize,
        value: f64,
        x: i32,
        y: i32,
        commands: &mut Vec<DrawCommand>,
    ) {
        let settings = &self.settings;
        let text_color = settings.text_color.unwrap_or_else(Color::black);

        if settings.plot_station_id {
            if let Some(id) = source.data_objects[0].points[feature_index].id.as_deref() {
                commands.push(DrawCommand::Text {
                    x: x - settings.disc_radius,
                    y: y - settings.disc_radius - settings.font_size.round() as i32 - 2,
                    size: settings.font_size,
                    text: id.to_string(),
                    color: text_color,
                });
            }
        }
        if !settings.plot_value {
            return;
        }

        let fan_out = settings.use_angles || source.data_objects.len() > 1;
        if fan_out {
            // Values of co-located data objects fan out around the point
            // at angle_start + i * angle_step.
            for (object_index, object) in source.data_objects.iter().enumerate() {
                let Some(feature) = object.points.get(feature_index) else {
                    continue;
                };
                if feature.value.is_nan() {
                    continue;
                }
                let angle = (settings.angle_start
                    + object_index as f32 * settings.angle_step)
                    .to_radians();
                let dx = angle.cos() * settings.text_radius as f32;
                let dy = -angle.sin() * settings.text_radius as f32;
                commands.push(DrawCommand::Text {
                    x: x + dx.round() as i32,
                    y: y + dy.round() as i32,
                    size: settings.font_size,
                    text: format_value(&settings.text_format, feature.value),
                    color: text_color,
                });
            }
        } else {
            let (label_x, label_y) = match settings.mode {
                // Centered inside the disc.
                DrawMode::Discs => (
                    x - settings.disc_radius / 2,
                    y - settings.font_size.round() as i32 / 2,
                ),
                _ => (x + settings.disc_radius / 2 + 2, y + 2),
            };
            commands.push(DrawCommand::Text {
                x: label_x,
                y: label_y,
                size: settings.font_size,
                text: format_value(&settings.text_format, value),
                color: text_color,
            });
        }
    }

    /// Vector mode: magnitude/direction from paired u/v data objects,
    /// drawn as arrows or wind barbs.
    fn plan_vector_points(
        &self,
        warper: &dyn Warper,
        source: &DataSource,
        style: &StyleConfiguration,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Vec<DrawCommand>, RenderError> {
        let settings = &self.settings;
        if source.data_objects.len() < 2 {
            return Err(RenderError::MissingVectorComponents(
                source.data_objects.len(),
            ));
        }
        let (u_object, v_object) = (&source.data_objects[0], &source.data_objects[1]);
        let barb_mode = settings.mode == DrawMode::Barb
            || style.render_method.contains(RenderMethod::BARB);
        let knots_input = unit_is_knots(u_object);
        let thinning = self.thinning_radius(style);

        let mut commands = Vec::new();
        let mut accepted: Vec<(f64, f64)> = Vec::new();

        for (u_feature, v_feature) in u_object.points.iter().zip(&v_object.points) {
            if !settings.passes_filter(u_feature.id.as_deref()) {
                continue;
            }
            let Some((px, py)) = warper.geo_to_pixel(u_feature.x, u_feature.y) else {
                continue;
            };
            if !Self::on_canvas(px, py, canvas_width, canvas_height) {
                continue;
            }
            if let Some(radius) = thinning {
                if !thin_accepts(&accepted, (px, py), radius) {
                    continue;
                }
            }
            accepted.push((px, py));

            let (u, v) = (u_feature.value, v_feature.value);
            if u.is_nan() || v.is_nan() {
                continue;
            }
            let (speed, direction) = uv_to_speed_direction(u, v);

            if barb_mode {
                let speed_knots = if knots_input {
                    speed
                } else {
                    speed * MS_TO_KNOTS
                };
                let glyph = barb_glyph(speed_knots, direction, 24.0 * settings.vector_scale);
                push_barb(
                    &glyph,
                    px,
                    py,
                    settings.vector_line_width,
                    settings.vector_line_color,
                    &mut commands,
                );
            } else {
                push_arrow(
                    u,
                    v,
                    speed * settings.vector_scale as f64,
                    px,
                    py,
                    settings.vector_line_width,
                    settings.vector_line_color,
                    &mut commands,
                );
            }

            let text_color = settings.text_color.unwrap_or_else(Color::black);
            if settings.vector_plot_station_id {
                if let Some(id) = u_feature.id.as_deref() {
                    commands.push(DrawCommand::Text {
                        x: px.round() as i32 + 6,
                        y: py.round() as i32 - settings.font_size.round() as i32 - 4,
                        size: settings.font_size,
                        text: id.to_string(),
                        color: text_color,
                    });
                }
            }
            if settings.vector_plot_value {
                commands.push(DrawCommand::Text {
                    x: px.round() as i32 + 6,
                    y: py.round() as i32 + 4,
                    size: settings.font_size,
                    text: format_value(&settings.vector_text_format, speed),
                    color: text_color,
                });
            }
        }
        Ok(commands)
    }
}

fn unit_is_knots(object: &DataObject) -> bool {
    object
        .units
        .as_deref()
        .map(|u| u.to_ascii_lowercase().contains("knot") || u == "kt")
        .unwrap_or(false)
}

/// Translate a barb glyph to the station position.
fn push_barb(
    glyph: &crate::barbs::BarbGlyph,
    px: f64,
    py: f64,
    line_width: f32,
    color: Color,
    commands: &mut Vec<DrawCommand>,
) {
    let (fx, fy) = (px as f32, py as f32);
    if let Some(radius) = glyph.calm_radius {
        commands.push(DrawCommand::Circle {
            x: px.round() as i32,
            y: py.round() as i32,
            radius: radius.round() as i32,
            color,
        });
        return;
    }
    for [start, end] in &glyph.segments {
        commands.push(DrawCommand::Line {
            x0: fx + start.0,
            y0: fy + start.1,
            x1: fx + end.0,
            y1: fy + end.1,
            width: line_width,
            color,
        });
    }
    for triangle in &glyph.pennants {
        commands.push(DrawCommand::Polygon {
            points: triangle
                .iter()
                .map(|(tx, ty)| ((fx + tx).round() as i32, (fy + ty).round() as i32))
                .collect(),
            color,
        });
    }
}

/// An arrow centered on the station, pointing where the flow goes.
#[allow(clippy::too_many_arguments)]
fn push_arrow(
    u: f64,
    v: f64,
    length: f64,
    px: f64,
    py: f64,
    line_width: f32,
    color: Color,
    commands: &mut Vec<DrawCommand>,
) {
    let magnitude = u.hypot(v);
    if magnitude == 0.0 || length == 0.0 {
        commands.push(DrawCommand::Dot {
            x: px.round() as i32,
            y: py.round() as i32,
            color,
        });
        return;
    }
    // Screen direction of the flow; Y is inverted.
    let dx = u / magnitude * length;
    let dy = -v / magnitude * length;
    let (tail_x, tail_y) = ((px - dx / 2.0) as f32, (py - dy / 2.0) as f32);
    let (head_x, head_y) = ((px + dx / 2.0) as f32, (py + dy / 2.0) as f32);
    commands.push(DrawCommand::Line {
        x0: tail_x,
        y0: tail_y,
        x1: head_x,
        y1: head_y,
        width: line_width,
        color,
    });

    // Arrowhead: two short strokes swept back from the tip.
    let barb_length = (length * 0.3).min(8.0);
    let angle = dy.atan2(dx);
    for sweep in [2.6, -2.6] {
        let ax = head_x + (barb_length * (angle + sweep).cos()) as f32;
        let ay = head_y + (barb_length * (angle + sweep).sin()) as f32;
        commands.push(DrawCommand::Line {
            x0: head_x,
            y0: head_y,
            x1: ax,
            y1: ay,
            width: line_width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_parse_known_keys() {
        let settings = PointSettings::parse(
            "mode=disc;discradius=12;thinningradius=30;plotstationid=true;\
             fillcolor=#FF0000;skippoints=DBL33,DBL34",
        )
        .unwrap();
        assert_eq!(settings.mode, DrawMode::Discs);
        assert_eq!(settings.disc_radius, 12);
        assert_eq!(settings.thinning_radius, Some(30.0));
        assert!(settings.plot_station_id);
        assert_eq!(settings.fill_color, Some(Color::rgb(255, 0, 0)));
        assert!(settings.skip_points.contains("DBL33"));
    }

    #[test]
    fn test_settings_unknown_key_is_ignored() {
        let settings = PointSettings::parse("mode=point;glitter=lots").unwrap();
        assert_eq!(settings.mode, DrawMode::Points);
    }

    #[test]
    fn test_settings_bad_value_for_known_key_fails() {
        assert!(matches!(
            PointSettings::parse("discradius=big"),
            Err(RenderError::InvalidSetting { .. })
        ));
        assert!(matches!(
            PointSettings::parse("mode=hologram"),
            Err(RenderError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_filters() {
        let mut settings = PointSettings::default();
        settings.skip_points.insert("A".to_string());
        assert!(!settings.passes_filter(Some("A")));
        assert!(settings.passes_filter(Some("B")));
        assert!(settings.passes_filter(None));

        settings.use_points.insert("B".to_string());
        assert!(settings.passes_filter(Some("B")));
        assert!(!settings.passes_filter(Some("C")));
        assert!(!settings.passes_filter(None));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value("%0.1f", 3.14159), "3.1");
        assert_eq!(format_value("%.0f", 3.6), "4");
        assert_eq!(format_value("%d", 3.6), "4");
        assert_eq!(format_value("%0.2f hPa", 1013.249), "1013.25 hPa");
        assert_eq!(format_value("plain", 1.0), "1.0");
    }

    #[test]
    fn test_thinning_is_greedy_input_order() {
        let radius = 10.0;
        let mut accepted: Vec<(f64, f64)> = Vec::new();
        let candidates = [(0.0, 0.0), (5.0, 0.0), (20.0, 0.0), (25.0, 0.0)];
        for candidate in candidates {
            if thin_accepts(&accepted, candidate, radius) {
                accepted.push(candidate);
            }
        }
        // (5,0) falls inside the radius of (0,0); (25,0) inside (20,0).
        assert_eq!(accepted, vec![(0.0, 0.0), (20.0, 0.0)]);
    }

    #[test]
    fn test_set_rebuilds_only_on_change() {
        let mut renderer = PointRenderer::new();
        renderer.set("mode=disc").unwrap();
        let before = renderer.settings().clone();
        renderer.set("mode=disc").unwrap();
        assert_eq!(renderer.settings(), &before);
        renderer.set("mode=barb").unwrap();
        assert_eq!(renderer.settings().mode, DrawMode::Barb);
    }
}
