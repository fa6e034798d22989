//! Corridor construction.
//!
//! A city template, when one exists, always wins over the heuristic
//! synthesizer; the heuristic keeps the compiler total over any city id.

use plan_schema::{Coordinate, PlanInput, RouteAlternative};

use crate::city_templates::{CityTemplate, CityTemplates};

pub const HEURISTIC_INTENT: &str = "base heuristic corridor";

/// Latitude/longitude offsets of DP1..DP3 from the start point.
pub const HEURISTIC_DELTAS: [(f64, f64); 3] = [(0.02, -0.02), (0.05, -0.03), (0.08, -0.04)];

const ROUTE_SEPARATOR: &str = " → ";

/// Ordered waypoints from start to objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Corridor {
    pub points: Vec<Coordinate>,
    pub decision_points: Vec<Coordinate>,
    pub alts: Vec<RouteAlternative>,
    pub intent: String,
}

impl Corridor {
    /// Point labels joined by arrows. Unlabelled points get positional names.
    pub fn summary(&self) -> String {
        let last = self.points.len().saturating_sub(1);
        self.points
            .iter()
            .enumerate()
            .map(|(idx, point)| match point.display_label() {
                Some(label) => label.to_string(),
                None if idx == 0 => "Start".to_string(),
                None if idx == last && self.points.len() > self.decision_points.len() + 1 => {
                    "Destination".to_string()
                }
                None => format!("DP{idx}"),
            })
            .collect::<Vec<_>>()
            .join(ROUTE_SEPARATOR)
    }

    /// Label of the final corridor point.
    pub fn objective(&self) -> String {
        self.points
            .last()
            .and_then(Coordinate::display_label)
            .unwrap_or("Destination")
            .to_string()
    }
}

pub trait CorridorStrategy {
    fn name(&self) -> &'static str;

    fn build(&self, input: &PlanInput) -> Corridor;
}

/// Corridor copied from authored city geography.
pub struct TemplateCorridor<'a> {
    template: &'a CityTemplate,
}

impl<'a> TemplateCorridor<'a> {
    pub fn new(template: &'a CityTemplate) -> Self {
        Self { template }
    }

    /// Template start with the caller's coordinates; the template label
    /// stays unless the caller supplied a non-blank one.
    fn effective_start(&self, input: &PlanInput) -> Coordinate {
        let default = &self.template.defaults.start;
        let label = input
            .start
            .display_label()
            .or_else(|| default.display_label())
            .map(str::to_string);
        Coordinate {
            lat: input.start.lat,
            lng: input.start.lng,
            label,
        }
    }
}

impl CorridorStrategy for TemplateCorridor<'_> {
    fn name(&self) -> &'static str {
        "template"
    }

    fn build(&self, input: &PlanInput) -> Corridor {
        let decision_points: Vec<Coordinate> = self
            .template
            .decision_points
            .iter()
            .map(|dp| dp.point.clone())
            .collect();

        let mut points = Vec::with_capacity(decision_points.len() + 2);
        points.push(self.effective_start(input));
        points.extend(decision_points.iter().cloned());
        points.push(self.template.objectives.primary.clone());

        Corridor {
            points,
            decision_points,
            alts: self.template.corridor.alts.clone(),
            intent: self.template.corridor.intent.clone(),
        }
    }
}

/// Generic corridor from fixed offsets off the start point.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicCorridor;

impl CorridorStrategy for HeuristicCorridor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn build(&self, input: &PlanInput) -> Corridor {
        let start = &input.start;
        let decision_points: Vec<Coordinate> = HEURISTIC_DELTAS
            .iter()
            .enumerate()
            .map(|(idx, (d_lat, d_lng))| {
                Coordinate::labelled(
                    start.lat + d_lat,
                    start.lng + d_lng,
                    format!("DP{}", idx + 1),
                )
            })
            .collect();

        let mut points = Vec::with_capacity(decision_points.len() + 1);
        points.push(Coordinate::labelled(
            start.lat,
            start.lng,
            start.display_label().unwrap_or("Start"),
        ));
        points.extend(decision_points.iter().cloned());

        Corridor {
            points,
            decision_points,
            alts: Vec::new(),
            intent: HEURISTIC_INTENT.to_string(),
        }
    }
}

/// Pick the strategy for `city`: its template if registered, otherwise the heuristic.
pub fn strategy_for<'a>(templates: &'a CityTemplates, city: &str) -> Box<dyn CorridorStrategy + 'a> {
    match templates.lookup(city) {
        Some(template) => Box::new(TemplateCorridor::new(template)),
        None => Box::new(HeuristicCorridor),
    }
}

pub fn build_corridor(templates: &CityTemplates, input: &PlanInput) -> Corridor {
    let strategy = strategy_for(templates, &input.city);
    tracing::debug!(
        target: "plan72::compiler",
        city = %input.city,
        strategy = strategy.name(),
        "corridor.strategy"
    );
    strategy.build(input)
}
