// Theta* replanning demo
//
// A robot crosses a field with a few robots standing in the way. Their
// positions wobble between control ticks, the planner gets a fresh snapshot
// every tick, and the last plan is written to theta_star.png.
//
// usage: theta_star [config.toml]

use std::error::Error;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use rust_navigation::common::{CircleObstacle, ObstaclePtr, Point2D, PolygonObstacle, Rectangle};
use rust_navigation::path_planning::theta_star::{PlanOutcome, ThetaStarConfig, ThetaStarPlanner};
use rust_navigation::utils::plot_scene;

const TICKS: usize = 10;
const ROBOT_RADIUS: f64 = 0.09;
const POSITION_NOISE: f64 = 0.05;

fn obstacle_snapshot(
    centers: &[Point2D],
    noise: &Normal<f64>,
    rng: &mut StdRng,
) -> Result<Vec<ObstaclePtr>, Box<dyn Error>> {
    let mut obstacles: Vec<ObstaclePtr> = centers
        .iter()
        .map(|c| {
            let jittered = Point2D::new(c.x + noise.sample(rng), c.y + noise.sample(rng));
            CircleObstacle::new(jittered, 2.0 * ROBOT_RADIUS).into_ptr()
        })
        .collect();

    // Goal area wall
    let wall = PolygonObstacle::new(vec![
        Point2D::new(3.6, -1.2),
        Point2D::new(3.8, -1.2),
        Point2D::new(3.8, 1.2),
        Point2D::new(3.6, 1.2),
    ])?;
    obstacles.push(wall.into_ptr());
    Ok(obstacles)
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("Theta* planning start!!");

    let config = match std::env::args().nth(1) {
        Some(path) => ThetaStarConfig::from_toml_file(path)?,
        None => ThetaStarConfig::default(),
    };
    let mut planner = ThetaStarPlanner::new(config)?;

    let field = Rectangle::from_center(Point2D::origin(), 9.0, 6.0);
    let start = Point2D::new(-4.0, -2.0);
    let goal = Point2D::new(4.2, 0.3);
    let centers = [
        Point2D::new(-2.5, -1.5),
        Point2D::new(-1.0, -0.5),
        Point2D::new(0.0, 0.0),
        Point2D::new(0.5, -1.0),
        Point2D::new(1.5, 0.5),
        Point2D::new(2.5, -0.2),
    ];

    let noise = Normal::new(0.0, POSITION_NOISE)?;
    let mut rng = StdRng::seed_from_u64(7);

    let mut last = None;
    for tick in 0..TICKS {
        let obstacles = obstacle_snapshot(&centers, &noise, &mut rng)?;
        let report = planner.plan_detailed(start, goal, &field, &obstacles);

        match (&report.path, report.outcome) {
            (Some(path), outcome) => println!(
                "tick {}: {:?}, {} waypoints, {:.3} m, {} cells expanded",
                tick,
                outcome,
                path.len(),
                path.total_length(),
                report.stats.expanded
            ),
            (None, PlanOutcome::NoPath(reason)) => println!("tick {}: no path ({:?})", tick, reason),
            (None, outcome) => println!("tick {}: no path ({:?})", tick, outcome),
        }
        last = Some((obstacles, report.path));
    }

    if let Some((obstacles, path)) = last {
        let vis = plot_scene(&field, &obstacles, path.as_ref(), start, goal, "Theta* path planning");
        vis.save_png("theta_star.png", 800, 600)?;
        println!("Plot saved to theta_star.png");
    }

    println!("Done!!");
    Ok(())
}
