use crate::config::EmotionConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const NEUTRAL: &str = "neutral";

const SWITCH_THRESHOLD: f32 = 0.25;
const NEUTRAL_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionTrigger {
    pub emotion: String,
    pub weight: f32,
    pub timestamp: DateTime<Utc>,
}

/// Read-only view returned to callers: base label and intensity rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSnapshot {
    pub base: String,
    pub intensity: f32,
}

impl EmotionSnapshot {
    pub fn new(base: impl Into<String>, intensity: f32) -> Self {
        Self {
            base: base.into(),
            intensity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionState {
    base: String,
    intensity: f32,
    decay_rate: f32,
    nudge_weight: f32,
    recent_triggers: VecDeque<EmotionTrigger>,
    trigger_capacity: usize,
}

impl EmotionState {
    pub fn new(config: &EmotionConfig) -> Self {
        Self {
            base: NEUTRAL.to_string(),
            intensity: config.initial_intensity.clamp(0.0, 1.0),
            decay_rate: config.decay_rate.max(0.0),
            nudge_weight: config.nudge_weight,
            recent_triggers: VecDeque::new(),
            trigger_capacity: config.trigger_capacity,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn recent_triggers(&self) -> &VecDeque<EmotionTrigger> {
        &self.recent_triggers
    }

    /// Moves the mood toward `emotion`.
    ///
    /// A matching base is reinforced. A different emotion replaces a weak base
    /// (intensity under 0.25) outright; either way the intensity is blended as
    /// `0.6 * old + 0.4 * weight`, so a strong base keeps its label while losing
    /// strength.
    pub fn nudge(&mut self, emotion: &str, weight: f32) {
        self.recent_triggers.push_back(EmotionTrigger {
            emotion: emotion.to_string(),
            weight,
            timestamp: Utc::now(),
        });

        if self.base == emotion {
            self.intensity = (self.intensity + weight).clamp(0.0, 1.0);
        } else {
            if self.intensity < SWITCH_THRESHOLD {
                self.base = emotion.to_string();
            }
            self.intensity = (self.intensity * 0.6 + weight * 0.4).clamp(0.0, 1.0);
        }

        while self.recent_triggers.len() > self.trigger_capacity {
            self.recent_triggers.pop_front();
        }
    }

    pub fn tick(&mut self) {
        self.intensity = (self.intensity - self.decay_rate).max(0.0);
        if self.intensity < NEUTRAL_THRESHOLD {
            self.base = NEUTRAL.to_string();
        }
    }

    pub fn get_state(&self) -> EmotionSnapshot {
        EmotionSnapshot::new(self.base.clone(), (self.intensity * 100.0).round() / 100.0)
    }

    /// Nudges each detected emotion in order with the configured turn weight,
    /// then decays once.
    pub fn apply_turn<S: AsRef<str>>(&mut self, emotions: &[S]) -> EmotionSnapshot {
        for emotion in emotions {
            self.nudge(emotion.as_ref(), self.nudge_weight);
        }
        self.tick();
        self.get_state()
    }
}

impl Default for EmotionState {
    fn default() -> Self {
        Self::new(&EmotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{EmotionState, NEUTRAL};
    use crate::config::EmotionConfig;

    #[test]
    fn test_emotion_state_default() {
        let state = EmotionState::default();
        assert_eq!(state.base(), NEUTRAL);
        assert_eq!(state.intensity(), 0.1);
        assert!(state.recent_triggers().is_empty());
    }

    #[test]
    fn test_nudge_switches_weak_base() {
        let mut state = EmotionState::default();
        state.nudge("happy", 0.25);
        assert_eq!(state.base(), "happy");
        assert!((state.intensity() - 0.16).abs() < 1e-6);
    }

    #[test]
    fn test_nudge_reinforces_same_base() {
        let mut state = EmotionState::default();
        state.nudge("happy", 0.25);
        state.nudge("happy", 0.25);
        assert_eq!(state.base(), "happy");
        assert!((state.intensity() - 0.41).abs() < 1e-6);
    }

    #[test]
    fn test_strong_base_resists_replacement() {
        let mut state = EmotionState::default();
        state.nudge("happy", 0.25);
        state.nudge("happy", 0.25);
        state.nudge("sad", 0.25);
        assert_eq!(state.base(), "happy");
        assert!((state.intensity() - 0.346).abs() < 1e-6);
    }

    #[test]
    fn test_tick_decays_to_neutral() {
        let mut state = EmotionState::new(&EmotionConfig::new(0.05));
        state.nudge("angry", 0.25);
        state.nudge("angry", 0.25);
        assert_eq!(state.base(), "angry");

        while state.intensity() >= 0.1 {
            state.tick();
        }
        assert_eq!(state.base(), NEUTRAL);

        state.tick();
        assert!(state.intensity() >= 0.0);
    }

    #[test]
    fn test_trigger_buffer_is_capped() {
        let mut state = EmotionState::default();
        for index in 0..150 {
            state.nudge(if index % 2 == 0 { "happy" } else { "sad" }, 0.25);
        }
        assert_eq!(state.recent_triggers().len(), 100);
        assert_eq!(state.recent_triggers().back().unwrap().emotion, "sad");
    }

    #[test]
    fn test_get_state_rounds_and_is_idempotent() {
        let mut state = EmotionState::default();
        state.nudge("bored", 0.333);
        let first = state.get_state();
        let second = state.get_state();
        assert_eq!(first, second);
        assert_eq!(first.intensity, 0.19);
    }

    #[test]
    fn test_apply_turn_nudges_then_ticks_once() {
        let mut state = EmotionState::default();
        let snapshot = state.apply_turn(&["happy", "flirty"]);
        assert_eq!(snapshot.base, "flirty");
        assert_eq!(state.recent_triggers().len(), 2);
        // 0.1 -> 0.16 (switch to happy) -> 0.196 (switch to flirty) -> 0.186 (tick)
        assert_eq!(snapshot.intensity, 0.19);
    }
}
