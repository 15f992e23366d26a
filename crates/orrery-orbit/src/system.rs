//! The solar system aggregate: a flat body array updated parents-first.

use std::collections::VecDeque;

use orrery_math::{DQuat, DVec3};
use tracing::debug;

use crate::body::{Body, BodyIndex};
use crate::error::ConfigLoadError;
use crate::kepler::kepler_state_at_time;

/// Every body of the simulation plus the order they must be updated in.
#[derive(Clone, Debug)]
pub struct SolarSystem {
    bodies: Vec<Body>,
    update_order: Vec<BodyIndex>,
    time: f64,
}

impl SolarSystem {
    /// Build a system from bodies whose parent links are already resolved to
    /// indices. Computes the update order and the state at `t = 0`.
    ///
    /// # Errors
    ///
    /// [`ConfigLoadError::DanglingParent`] if a parent index is out of range,
    /// [`ConfigLoadError::ParentCycle`] if parent links loop back on themselves.
    pub fn new(bodies: Vec<Body>) -> Result<Self, ConfigLoadError> {
        for body in &bodies {
            if let Some(BodyIndex(index)) = body.parent()
                && index >= bodies.len()
            {
                return Err(ConfigLoadError::DanglingParent {
                    body: body.name().to_owned(),
                    index,
                    count: bodies.len(),
                });
            }
        }

        let update_order = topological_order(&bodies)?;
        let mut system = Self {
            bodies,
            update_order,
            time: 0.0,
        };
        system.update(0.0);
        Ok(system)
    }

    /// Recompute every body's global state at absolute simulated time `time`.
    pub fn update(&mut self, time: f64) {
        self.time = time;

        for &BodyIndex(index) in &self.update_order {
            let (parent_position, parent_velocity) = match self.bodies[index].parent() {
                Some(BodyIndex(parent)) => {
                    let parent = &self.bodies[parent];
                    (parent.position(), parent.velocity())
                }
                None => (DVec3::ZERO, DVec3::ZERO),
            };

            let body = &mut self.bodies[index];
            let state = kepler_state_at_time(body.elements(), time);
            if !state.solution.converged {
                debug!(
                    body = body.name(),
                    time,
                    iterations = state.solution.iterations,
                    "Kepler solver did not converge, using best estimate"
                );
            }
            let orientation = body
                .spin()
                .map_or(DQuat::IDENTITY, |spin| spin.orientation_at(time));

            body.set_state(
                parent_position + state.position,
                parent_velocity + state.velocity,
                orientation,
            );
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies in load order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: BodyIndex) -> Option<&Body> {
        self.bodies.get(index.0)
    }

    pub fn find(&self, name: &str) -> Option<BodyIndex> {
        self.bodies
            .iter()
            .position(|b| b.name() == name)
            .map(BodyIndex)
    }

    /// Simulated time of the last update, seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Parents always precede their children.
    pub fn update_order(&self) -> &[BodyIndex] {
        &self.update_order
    }

    /// Position of `index` relative to its parent (or the origin for roots).
    pub fn relative_position(&self, index: BodyIndex) -> Option<DVec3> {
        let body = self.body(index)?;
        let origin = body
            .parent()
            .and_then(|p| self.body(p))
            .map_or(DVec3::ZERO, Body::position);
        Some(body.position() - origin)
    }
}

/// Kahn's algorithm seeded in insertion order, so ties keep load order.
fn topological_order(bodies: &[Body]) -> Result<Vec<BodyIndex>, ConfigLoadError> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); bodies.len()];
    let mut ready = VecDeque::new();
    for (index, body) in bodies.iter().enumerate() {
        match body.parent() {
            Some(BodyIndex(parent)) => children[parent].push(index),
            None => ready.push_back(index),
        }
    }

    let mut order = Vec::with_capacity(bodies.len());
    while let Some(index) = ready.pop_front() {
        order.push(BodyIndex(index));
        ready.extend(children[index].iter().copied());
    }

    if order.len() < bodies.len() {
        let mut placed = vec![false; bodies.len()];
        for &BodyIndex(index) in &order {
            placed[index] = true;
        }
        // An unplaced body may only hang below a cycle. Its parents are all
        // unplaced too, so following them must revisit a cycle member.
        let mut current = placed.iter().position(|&p| !p).unwrap_or_default();
        let mut seen = vec![false; bodies.len()];
        while !seen[current] {
            seen[current] = true;
            match bodies[current].parent() {
                Some(BodyIndex(parent)) => current = parent,
                None => break,
            }
        }
        return Err(ConfigLoadError::ParentCycle {
            body: bodies[current].name().to_owned(),
        });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementSet, OrbitalElements};
    use crate::kepler::kepler_position_at_time;

    fn circular(radius: f64, period: f64) -> OrbitalElements {
        OrbitalElements::new(ElementSet::circular(radius, period)).unwrap()
    }

    fn sample_system() -> SolarSystem {
        // The moon is listed before its planet on purpose.
        let bodies = vec![
            Body::new("Sun", circular(0.0, 1.0), 7.0e8),
            Body::new("Moon", circular(4.0e8, 27.0), 1.7e6).with_parent(BodyIndex(2)),
            Body::new("Earth", circular(1.5e11, 365.0), 6.4e6).with_parent(BodyIndex(0)),
        ];
        SolarSystem::new(bodies).unwrap()
    }

    #[test]
    fn test_update_order_puts_parents_first() {
        let system = sample_system();
        assert_eq!(
            system.update_order(),
            &[BodyIndex(0), BodyIndex(2), BodyIndex(1)]
        );
    }

    #[test]
    fn test_update_keeps_body_order() {
        let mut system = sample_system();
        system.update(10.0);
        let names: Vec<_> = system.bodies().iter().map(Body::name).collect();
        assert_eq!(names, ["Sun", "Moon", "Earth"]);
        assert_eq!(system.time(), 10.0);
    }

    #[test]
    fn test_child_adds_parent_position() {
        let mut system = sample_system();
        system.update(100.0);
        let earth = system.body(BodyIndex(2)).unwrap();
        let moon = system.body(BodyIndex(1)).unwrap();

        let expected = earth.position() + kepler_position_at_time(moon.elements(), 100.0);
        assert!((moon.position() - expected).length() < 1e-3);
    }

    #[test]
    fn test_relative_position_ignores_parent_motion() {
        let mut system = sample_system();
        let moon = system.find("Moon").unwrap();
        system.update(5.0);
        let rel = system.relative_position(moon).unwrap();
        let own = kepler_position_at_time(system.body(moon).unwrap().elements(), 5.0);
        assert!((rel - own).length() < 1e-3);
    }

    #[test]
    fn test_velocity_includes_parent() {
        let mut system = sample_system();
        system.update(50.0);
        let earth = system.body(BodyIndex(2)).unwrap().velocity();
        let moon = system.body(BodyIndex(1)).unwrap().velocity();
        let own = kepler_state_at_time(system.bodies()[1].elements(), 50.0).velocity;
        assert!((moon - (earth + own)).length() < 1e-6);
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let bodies = vec![Body::new("Lost", circular(1.0, 1.0), 1.0).with_parent(BodyIndex(7))];
        let err = SolarSystem::new(bodies).unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::DanglingParent {
                index: 7,
                count: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let bodies = vec![
            Body::new("Root", circular(0.0, 1.0), 1.0),
            Body::new("A", circular(1.0, 1.0), 1.0).with_parent(BodyIndex(2)),
            Body::new("B", circular(1.0, 1.0), 1.0).with_parent(BodyIndex(1)),
        ];
        let err = SolarSystem::new(bodies).unwrap_err();
        assert!(matches!(err, ConfigLoadError::ParentCycle { ref body } if body == "A"));
    }

    #[test]
    fn test_cycle_reported_at_member_not_descendant() {
        let bodies = vec![
            Body::new("Root", circular(0.0, 1.0), 1.0),
            Body::new("C", circular(1.0, 1.0), 1.0).with_parent(BodyIndex(2)),
            Body::new("A", circular(1.0, 1.0), 1.0).with_parent(BodyIndex(3)),
            Body::new("B", circular(1.0, 1.0), 1.0).with_parent(BodyIndex(2)),
        ];
        let err = SolarSystem::new(bodies).unwrap_err();
        assert!(matches!(err, ConfigLoadError::ParentCycle { ref body } if body == "A"));
        assert!(err.to_string().contains("'A'"));
    }

    #[test]
    fn test_self_parent_rejected() {
        let bodies = vec![Body::new("Ouroboros", circular(1.0, 1.0), 1.0).with_parent(BodyIndex(0))];
        assert!(matches!(
            SolarSystem::new(bodies),
            Err(ConfigLoadError::ParentCycle { .. })
        ));
    }

    #[test]
    fn test_empty_system() {
        let mut system = SolarSystem::new(Vec::new()).unwrap();
        system.update(1.0);
        assert!(system.is_empty());
        assert_eq!(system.len(), 0);
        assert!(system.find("Sun").is_none());
    }
}
