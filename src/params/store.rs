//! Current/default parameter store.
//!
//! Current values live behind a single `RwLock` and are swapped whole, so a
//! reader never observes a partially written group. Defaults are plain
//! fields written once in [`ParameterStore::new`].

use parking_lot::RwLock;

use super::{
    BlendingParameters, DetectionParameters, GroupValue, ParameterGroup, ScanParameters,
};

/// One value for every parameter group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    pub robot_scan: ScanParameters,
    pub surface_detection: DetectionParameters,
    pub blending_plan: BlendingParameters,
}

impl ParameterSet {
    fn get(&self, group: ParameterGroup) -> GroupValue {
        match group {
            ParameterGroup::Scan => GroupValue::Scan(self.robot_scan.clone()),
            ParameterGroup::Detection => GroupValue::Detection(self.surface_detection.clone()),
            ParameterGroup::Blending => GroupValue::Blending(self.blending_plan.clone()),
        }
    }

    fn set(&mut self, value: GroupValue) {
        match value {
            GroupValue::Scan(v) => self.robot_scan = v,
            GroupValue::Detection(v) => self.surface_detection = v,
            GroupValue::Blending(v) => self.blending_plan = v,
        }
    }
}

/// Current and default configuration of all parameter groups.
#[derive(Debug)]
pub struct ParameterStore {
    current: RwLock<ParameterSet>,
    defaults: ParameterSet,
}

impl ParameterStore {
    /// Create a store whose current and default values both start from `initial`.
    pub fn new(initial: ParameterSet) -> Self {
        Self {
            current: RwLock::new(initial.clone()),
            defaults: initial,
        }
    }

    /// Current value of one group.
    pub fn get_current(&self, group: ParameterGroup) -> GroupValue {
        self.current.read().get(group)
    }

    /// Default value of one group.
    pub fn get_default(&self, group: ParameterGroup) -> GroupValue {
        self.defaults.get(group)
    }

    /// Replace the current value of the group `value` belongs to.
    pub fn set_current(&self, value: GroupValue) {
        self.current.write().set(value);
    }

    /// Reset one group's current value to its default.
    pub fn reset_current_to_default(&self, group: ParameterGroup) {
        let value = self.defaults.get(group);
        self.current.write().set(value);
    }

    /// Consistent snapshot of all current groups.
    pub fn current(&self) -> ParameterSet {
        self.current.read().clone()
    }

    /// All default groups.
    pub fn defaults(&self) -> &ParameterSet {
        &self.defaults
    }

    /// Current scan parameters.
    pub fn scan(&self) -> ScanParameters {
        self.current.read().robot_scan.clone()
    }

    /// Current detection parameters.
    pub fn detection(&self) -> DetectionParameters {
        self.current.read().surface_detection.clone()
    }

    /// Current blending parameters.
    pub fn blending(&self) -> BlendingParameters {
        self.current.read().blending_plan.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn initial() -> ParameterSet {
        ParameterSet {
            robot_scan: ScanParameters {
                num_scan_points: 12,
                ..Default::default()
            },
            surface_detection: DetectionParameters {
                curvature_threshold: 0.1,
                ..Default::default()
            },
            blending_plan: BlendingParameters {
                tool_radius: 0.5,
                margin: 0.1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let store = ParameterStore::new(initial());
        let updated = DetectionParameters {
            curvature_threshold: 0.02,
            ..Default::default()
        };
        store.set_current(GroupValue::Detection(updated.clone()));

        assert_eq!(
            store.get_current(ParameterGroup::Detection),
            GroupValue::Detection(updated)
        );
        // Other groups untouched
        assert_eq!(store.scan().num_scan_points, 12);
    }

    #[test]
    fn test_defaults_unchanged_by_writes() {
        let store = ParameterStore::new(initial());
        store.set_current(GroupValue::Blending(BlendingParameters::default()));

        assert_eq!(store.blending().tool_radius, 0.0);
        assert_eq!(store.defaults().blending_plan.tool_radius, 0.5);
    }

    #[test]
    fn test_reset_single_group() {
        let store = ParameterStore::new(initial());
        store.set_current(GroupValue::Scan(ScanParameters::default()));
        store.set_current(GroupValue::Detection(DetectionParameters::default()));

        store.reset_current_to_default(ParameterGroup::Scan);

        assert_eq!(store.scan().num_scan_points, 12);
        assert_eq!(store.detection().curvature_threshold, 0.0);
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_group() {
        let store = Arc::new(ParameterStore::new(initial()));
        let a = ScanParameters {
            num_scan_points: 1,
            cam_to_obj_zoffset: 1.0,
            ..Default::default()
        };
        let b = ScanParameters {
            num_scan_points: 2,
            cam_to_obj_zoffset: 2.0,
            ..Default::default()
        };

        let writer = {
            let store = Arc::clone(&store);
            let (a, b) = (a.clone(), b.clone());
            thread::spawn(move || {
                for i in 0..2000 {
                    let v = if i % 2 == 0 { a.clone() } else { b.clone() };
                    store.set_current(GroupValue::Scan(v));
                }
            })
        };

        for _ in 0..2000 {
            let s = store.scan();
            let initial_value = s.num_scan_points == 12 && s.cam_to_obj_zoffset == 0.0;
            let written_value = f64::from(s.num_scan_points) == s.cam_to_obj_zoffset;
            assert!(initial_value || written_value, "torn read: {:?}", s);
        }
        writer.join().unwrap();
    }
}
