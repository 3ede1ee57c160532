//! Fixed-size step checklist attached to each phase record

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::status::Phase;
use crate::errors::{PrintShopError, Result};

/// Boolean step flags for one phase, numbered from 1
///
/// The shape is fixed by the phase ([`Phase::checklist_len`]). Stored JSON is
/// merged over the phase defaults, so missing keys read as "not done" and
/// keys the phase does not know are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    phase: Phase,
    steps: Vec<bool>,
}

impl Checklist {
    /// Fresh checklist with every step pending
    pub fn new(phase: Phase) -> Self {
        Self { phase, steps: vec![false; phase.checklist_len()] }
    }

    /// Merge a stored JSON object over the defaults for `phase`.
    ///
    /// Accepts `"1"`-style keys as well as legacy `"paso1"` keys.
    pub fn from_json(phase: Phase, value: &Value) -> Self {
        let mut checklist = Self::new(phase);
        if let Value::Object(map) = value {
            for (key, flag) in map {
                let digits = key.strip_prefix("paso").unwrap_or(key);
                let Ok(step) = digits.parse::<usize>() else { continue };
                if let (Some(slot), Some(done)) =
                    (checklist.steps.get_mut(step.wrapping_sub(1)), flag.as_bool())
                {
                    *slot = done;
                }
            }
        }
        checklist
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .steps
            .iter()
            .enumerate()
            .map(|(idx, done)| ((idx + 1).to_string(), Value::Bool(*done)))
            .collect();
        Value::Object(map)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Flag for `step` (1-based); `None` when out of range
    pub fn get(&self, step: usize) -> Option<bool> {
        step.checked_sub(1).and_then(|idx| self.steps.get(idx)).copied()
    }

    /// Set one step flag
    ///
    /// # Errors
    /// `InvalidInput` when `step` is outside `1..=len`.
    pub fn set(&mut self, step: usize, done: bool) -> Result<()> {
        let len = self.steps.len();
        let slot = step.checked_sub(1).and_then(|idx| self.steps.get_mut(idx)).ok_or_else(|| {
            PrintShopError::InvalidInput(format!(
                "{} checklist has steps 1 to {len}, got {step}",
                self.phase.title()
            ))
        })?;
        *slot = done;
        Ok(())
    }

    /// Clear `step` and every later step
    pub fn reset_from(&mut self, step: usize) {
        let start = step.saturating_sub(1);
        for flag in self.steps.iter_mut().skip(start) {
            *flag = false;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|done| *done)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|done| **done).count()
    }
}

impl Serialize for Checklist {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.steps.len()))?;
        for (idx, done) in self.steps.iter().enumerate() {
            map.serialize_entry(&(idx + 1).to_string(), done)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn shapes_follow_the_phase() {
        assert_eq!(Checklist::new(Phase::PrePress).len(), 4);
        assert_eq!(Checklist::new(Phase::Press).len(), 2);
        assert_eq!(Checklist::new(Phase::PostPress).len(), 3);
    }

    #[test]
    fn stored_values_override_defaults_and_unknown_keys_are_ignored() {
        let stored = json!({ "1": true, "3": true, "9": true, "notes": "x" });
        let checklist = Checklist::from_json(Phase::PrePress, &stored);
        assert_eq!(checklist.get(1), Some(true));
        assert_eq!(checklist.get(2), Some(false));
        assert_eq!(checklist.get(3), Some(true));
        assert_eq!(checklist.get(4), Some(false));
        assert_eq!(checklist.get(9), None);
    }

    #[test]
    fn legacy_paso_keys_are_accepted() {
        let stored = json!({ "paso1": true, "paso2": false, "paso3": true });
        let checklist = Checklist::from_json(Phase::PostPress, &stored);
        assert_eq!(checklist.completed_steps(), 2);
    }

    #[test]
    fn non_object_json_yields_defaults() {
        let checklist = Checklist::from_json(Phase::Press, &Value::Null);
        assert_eq!(checklist, Checklist::new(Phase::Press));
    }

    #[test]
    fn set_rejects_out_of_range_steps() {
        let mut checklist = Checklist::new(Phase::Press);
        assert!(checklist.set(0, true).is_err());
        assert!(checklist.set(3, true).is_err());
        checklist.set(2, true).unwrap();
        assert_eq!(checklist.get(2), Some(true));
    }

    #[test]
    fn reset_from_clears_tail() {
        let mut checklist = Checklist::from_json(
            Phase::PrePress,
            &json!({ "1": true, "2": true, "3": true, "4": true }),
        );
        checklist.reset_from(3);
        assert_eq!(checklist.completed_steps(), 2);
        assert!(!checklist.is_complete());
    }

    #[test]
    fn serializes_as_numbered_map() {
        let mut checklist = Checklist::new(Phase::Press);
        checklist.set(1, true).unwrap();
        assert_eq!(serde_json::to_value(&checklist).unwrap(), json!({ "1": true, "2": false }));
        assert_eq!(checklist.to_json(), json!({ "1": true, "2": false }));
    }
}
