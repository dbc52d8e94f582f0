//! Batched transitions handed over by the sample preprocessing stage.

use crate::error::{DdpgError, Result};

/// One batch of transitions, aligned by index.
///
/// Field order matches the preprocessing output: state, action, reward,
/// next state, next action, terminal, possible next actions, time diff.
/// `next_actions` and `possible_next_actions` are carried for other
/// trainers and may be left empty.
#[derive(Debug, Clone, Default)]
pub struct TransitionBatch {
    pub states: Vec<Vec<f32>>,
    /// Continuous actions or one-hot encoded discrete actions
    pub actions: Vec<Vec<f32>>,
    pub rewards: Vec<f32>,
    pub next_states: Vec<Vec<f32>>,
    pub next_actions: Vec<Vec<f32>>,
    pub terminals: Vec<bool>,
    pub possible_next_actions: Vec<Vec<f32>>,
    /// Decision steps elapsed between state and next state
    pub time_diffs: Vec<f32>,
}

impl TransitionBatch {
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Check that every field is aligned with the rewards and that rows
    /// have the environment's widths. Returns the batch size.
    pub fn validate(&self, state_dim: usize, action_dim: usize) -> Result<usize> {
        let len = self.len();
        if len == 0 {
            return Err(DdpgError::Shape("empty batch".to_string()));
        }

        check_len("states", self.states.len(), len)?;
        check_len("actions", self.actions.len(), len)?;
        check_len("next_states", self.next_states.len(), len)?;
        check_len("terminals", self.terminals.len(), len)?;
        check_len("time_diffs", self.time_diffs.len(), len)?;
        if !self.next_actions.is_empty() {
            check_len("next_actions", self.next_actions.len(), len)?;
        }
        if !self.possible_next_actions.is_empty() {
            check_len("possible_next_actions", self.possible_next_actions.len(), len)?;
        }

        check_rows("states", &self.states, state_dim)?;
        check_rows("actions", &self.actions, action_dim)?;
        check_rows("next_states", &self.next_states, state_dim)?;

        Ok(len)
    }
}

fn check_len(field: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(DdpgError::Shape(format!(
            "{field} has {actual} entries, expected {expected}"
        )));
    }
    Ok(())
}

pub(crate) fn check_rows(field: &str, rows: &[Vec<f32>], width: usize) -> Result<()> {
    match rows.iter().position(|row| row.len() != width) {
        Some(i) => Err(DdpgError::Shape(format!(
            "{field}[{i}] has width {}, expected {width}",
            rows[i].len()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> TransitionBatch {
        TransitionBatch {
            states: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            actions: vec![vec![0.5], vec![-0.5]],
            rewards: vec![1.0, 0.0],
            next_states: vec![vec![1.0, 0.0], vec![0.0, 0.0]],
            next_actions: vec![],
            terminals: vec![false, true],
            possible_next_actions: vec![],
            time_diffs: vec![1.0, 2.0],
        }
    }

    #[test]
    fn test_valid_batch() {
        assert_eq!(batch().validate(2, 1).unwrap(), 2);
    }

    #[test]
    fn test_empty_batch() {
        assert!(TransitionBatch::default().validate(2, 1).is_err());
    }

    #[test]
    fn test_misaligned_fields() {
        let mut batch = batch();
        batch.terminals.pop();

        let err = batch.validate(2, 1).unwrap_err();
        assert!(matches!(err, DdpgError::Shape(ref msg) if msg.contains("terminals")));
    }

    #[test]
    fn test_wrong_state_width() {
        let err = batch().validate(3, 1).unwrap_err();
        assert!(matches!(err, DdpgError::Shape(ref msg) if msg.contains("states[0]")));
    }

    #[test]
    fn test_wrong_action_width() {
        let mut batch = batch();
        batch.actions[1] = vec![0.0, 1.0];

        let err = batch.validate(2, 1).unwrap_err();
        assert!(matches!(err, DdpgError::Shape(ref msg) if msg.contains("actions[1]")));
    }
}
