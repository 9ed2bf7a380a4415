//! Plotting of planning scenes with gnuplot
//!
//! A scene is the navigable area, the obstacle outlines, the planned path and
//! its endpoints. Rendering needs a `gnuplot` binary on the PATH.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{NavigationError, NavigationResult, Obstacle, Path2D, Point2D, Rectangle};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";

    pub const AREA: &str = GRAY;
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// One batch of plotted data
#[derive(Debug, Clone)]
enum Layer {
    Lines { x: Vec<f64>, y: Vec<f64>, style: PathStyle },
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
}

/// Collects layers and renders them into a single set of axes
#[derive(Debug, Clone)]
pub struct Visualizer {
    layers: Vec<Layer>,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            title: String::new(),
            x_label: "X [m]".to_string(),
            y_label: "Y [m]".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Draw the border of the navigable area and fit both axes around it
    pub fn plot_area(&mut self, area: &Rectangle) -> &mut Self {
        let (x, y) = closed_outline(&area.corners());
        let style = PathStyle::new(colors::AREA, "Navigable area").with_line_width(1.0);
        self.layers.push(Layer::Lines { x, y, style });

        let margin = 0.05 * area.x_length().max(area.y_length());
        let (min, max) = (area.min_corner(), area.max_corner());
        self.set_x_range(min.x - margin, max.x + margin);
        self.set_y_range(min.y - margin, max.y + margin)
    }

    /// Draw the outline of every obstacle. Only the first one is captioned
    /// so the legend holds a single entry.
    pub fn plot_obstacles<O>(&mut self, obstacles: &[O]) -> &mut Self
    where
        O: AsRef<dyn Obstacle>,
    {
        for (i, obstacle) in obstacles.iter().enumerate() {
            let (x, y) = obstacle.as_ref().outline().iter().map(|p| (p.x, p.y)).unzip();
            let caption = if i == 0 { "Obstacles" } else { "" };
            let style = PathStyle::new(colors::OBSTACLE, caption).with_line_width(1.5);
            self.layers.push(Layer::Lines { x, y, style });
        }
        self
    }

    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.layers.push(Layer::Lines {
            x: path.x_coords(),
            y: path.y_coords(),
            style: style.clone(),
        });
        self
    }

    /// Plot the waypoints of a path as markers
    pub fn plot_waypoints(&mut self, path: &Path2D, style: &PointStyle) -> &mut Self {
        self.plot_points(&path.points, style)
    }

    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.plot_points(&[point], style)
    }

    pub fn plot_points(&mut self, points: &[Point2D], style: &PointStyle) -> &mut Self {
        let (x, y) = points.iter().map(|p| (p.x, p.y)).unzip();
        self.layers.push(Layer::Points {
            x,
            y,
            style: style.clone(),
        });
        self
    }

    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Finalize and show the plot
    pub fn show(&self) -> NavigationResult<()> {
        self.render()
            .show()
            .map(|_| ())
            .map_err(|e| NavigationError::Plot(e.to_string()))
    }

    pub fn save_png(&self, path: &str, width: u32, height: u32) -> NavigationResult<()> {
        self.render()
            .save_to_png(path, width, height)
            .map_err(|e| NavigationError::Plot(e.to_string()))
    }

    pub fn save_svg(&self, path: &str) -> NavigationResult<()> {
        self.render()
            .save_to_svg(path, 800, 600)
            .map_err(|e| NavigationError::Plot(e.to_string()))
    }

    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        let axes = figure.axes2d();

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, style } => {
                    axes.lines(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            LineWidth(style.line_width),
                        ],
                    );
                }
                Layer::Points { x, y, style } => {
                    axes.points(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            PointSymbol(style.symbol),
                            PointSize(style.size),
                        ],
                    );
                }
            }
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
        figure
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinates of a polygon with its first vertex repeated at the end
fn closed_outline(vertices: &[Point2D]) -> (Vec<f64>, Vec<f64>) {
    vertices
        .iter()
        .chain(vertices.first())
        .map(|p| (p.x, p.y))
        .unzip()
}

/// Area, obstacles, path and endpoints in one figure
pub fn plot_scene<O>(
    area: &Rectangle,
    obstacles: &[O],
    path: Option<&Path2D>,
    start: Point2D,
    goal: Point2D,
    title: &str,
) -> Visualizer
where
    O: AsRef<dyn Obstacle>,
{
    let mut vis = Visualizer::new();
    vis.set_title(title);
    vis.plot_area(area);
    vis.plot_obstacles(obstacles);
    if let Some(path) = path {
        vis.plot_path(path, &PathStyle::default());
    }
    vis.plot_start(start);
    vis.plot_goal(goal);
    vis
}
