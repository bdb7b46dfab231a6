//! Estimates of the remaining cost between two points. All variants scale their raw
//! distance by a multiplier; a multiplier above the cheapest cell cost trades path
//! optimality for fewer expansions.
use crate::point::Point;
use crate::DEFAULT_HEURISTIC_ESTIMATE;

pub trait Heuristic {
    fn heuristic_estimate_multiplier(&self) -> u32;
    fn set_heuristic_estimate_multiplier(&mut self, multiplier: u32);
    fn calculate_heuristic_distance(&self, location: Point, target: Point) -> u32;
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn heuristic_estimate_multiplier(&self) -> u32 {
        (**self).heuristic_estimate_multiplier()
    }
    fn set_heuristic_estimate_multiplier(&mut self, multiplier: u32) {
        (**self).set_heuristic_estimate_multiplier(multiplier)
    }
    fn calculate_heuristic_distance(&self, location: Point, target: Point) -> u32 {
        (**self).calculate_heuristic_distance(location, target)
    }
}

macro_rules! multiplier_heuristic {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name {
            pub multiplier: u32,
        }

        impl $name {
            pub fn new(multiplier: u32) -> $name {
                $name { multiplier }
            }
        }

        impl Default for $name {
            fn default() -> $name {
                $name::new(DEFAULT_HEURISTIC_ESTIMATE)
            }
        }
    };
}

multiplier_heuristic!(ManhattanHeuristic);
multiplier_heuristic!(EuclideanHeuristic);
multiplier_heuristic!(MaxAxisHeuristic);

/// |dx| + |dy|, suited to 4-directional movement.
impl Heuristic for ManhattanHeuristic {
    fn heuristic_estimate_multiplier(&self) -> u32 {
        self.multiplier
    }
    fn set_heuristic_estimate_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier;
    }
    fn calculate_heuristic_distance(&self, location: Point, target: Point) -> u32 {
        let (dx, dy) = location.axis_deltas(&target);
        self.multiplier * (dx + dy)
    }
}

/// Straight-line distance, rounded to the nearest integer after scaling.
impl Heuristic for EuclideanHeuristic {
    fn heuristic_estimate_multiplier(&self) -> u32 {
        self.multiplier
    }
    fn set_heuristic_estimate_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier;
    }
    fn calculate_heuristic_distance(&self, location: Point, target: Point) -> u32 {
        (self.multiplier as f64 * location.euclidean_distance_to(&target)).round() as u32
    }
}

/// max(|dx|, |dy|). Exact on an open uniform-cost grid with 8-directional movement,
/// where a diagonal step costs as much as a straight one.
impl Heuristic for MaxAxisHeuristic {
    fn heuristic_estimate_multiplier(&self) -> u32 {
        self.multiplier
    }
    fn set_heuristic_estimate_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier;
    }
    fn calculate_heuristic_distance(&self, location: Point, target: Point) -> u32 {
        let (dx, dy) = location.axis_deltas(&target);
        self.multiplier * dx.max(dy)
    }
}

/// Always zero, which turns the search into Dijkstra's algorithm. The multiplier is
/// kept only so the heuristic can be swapped without losing configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoHeuristic {
    pub multiplier: u32,
}

impl Heuristic for NoHeuristic {
    fn heuristic_estimate_multiplier(&self) -> u32 {
        self.multiplier
    }
    fn set_heuristic_estimate_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier;
    }
    fn calculate_heuristic_distance(&self, _: Point, _: Point) -> u32 {
        0
    }
}

/// Selects a [Heuristic] from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeuristicKind {
    Manhattan,
    Euclidean,
    MaxAxis,
    #[default]
    None,
}

impl HeuristicKind {
    pub fn build(self, multiplier: u32) -> Box<dyn Heuristic + Send> {
        match self {
            HeuristicKind::Manhattan => Box::new(ManhattanHeuristic::new(multiplier)),
            HeuristicKind::Euclidean => Box::new(EuclideanHeuristic::new(multiplier)),
            HeuristicKind::MaxAxis => Box::new(MaxAxisHeuristic::new(multiplier)),
            HeuristicKind::None => Box::new(NoHeuristic { multiplier }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROM: Point = Point::new(2, 10);
    const TO: Point = Point::new(5, 6);

    #[test]
    fn unit_multiplier_distances() {
        assert_eq!(ManhattanHeuristic::new(1).calculate_heuristic_distance(FROM, TO), 7);
        assert_eq!(EuclideanHeuristic::new(1).calculate_heuristic_distance(FROM, TO), 5);
        assert_eq!(MaxAxisHeuristic::new(1).calculate_heuristic_distance(FROM, TO), 4);
        assert_eq!(NoHeuristic::default().calculate_heuristic_distance(FROM, TO), 0);
    }

    #[test]
    fn multiplier_scales_estimate() {
        let mut heuristic = HeuristicKind::Manhattan.build(1);
        assert_eq!(heuristic.calculate_heuristic_distance(FROM, TO), 7);
        heuristic.set_heuristic_estimate_multiplier(3);
        assert_eq!(heuristic.heuristic_estimate_multiplier(), 3);
        assert_eq!(heuristic.calculate_heuristic_distance(FROM, TO), 21);
        // sqrt(2) * 2 = 2.83
        let euclid = EuclideanHeuristic::default();
        assert_eq!(
            euclid.calculate_heuristic_distance(Point::new(0, 0), Point::new(1, 1)),
            3
        );
    }

    #[test]
    fn symmetric() {
        for kind in [
            HeuristicKind::Manhattan,
            HeuristicKind::Euclidean,
            HeuristicKind::MaxAxis,
            HeuristicKind::None,
        ] {
            let heuristic = kind.build(2);
            assert_eq!(
                heuristic.calculate_heuristic_distance(FROM, TO),
                heuristic.calculate_heuristic_distance(TO, FROM)
            );
            assert_eq!(heuristic.calculate_heuristic_distance(FROM, FROM), 0);
        }
    }
}
