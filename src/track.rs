//! Per-fingertip trail state.
//!
//! State is keyed by (hand side, fingertip). The key space is fixed at
//! 2 × 5 slots, so the store is a plain array and nothing is ever evicted:
//! a slot keeps its trail while its fingertip is missing from the input.

use crate::config::TrailConfig;
use crate::geom::{remap, Point};
use crate::hands::{Fingertip, Handedness};

/// Trail bookkeeping for one tracked fingertip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackState {
    /// Smoothed positions, oldest first.
    pub trail: Vec<Point>,
    /// Last raw observation; `None` until the first update.
    pub last: Option<Point>,
    /// Whether the previous reading for this key counted as pinched.
    pub pinch_prev: bool,
}

impl TrackState {
    /// Fold one observation into the trail and return the fingertip speed
    /// in pixels per frame.
    pub fn update(&mut self, observed: Point, config: &TrailConfig) -> f32 {
        let speed = self.last.map_or(0.0, |last| last.distance(observed));

        let smoothed = match self.trail.last() {
            Some(&tip) => tip.lerp(observed, config.smoothing),
            None => observed,
        };
        self.trail.push(smoothed);

        let max_len = max_trail_len(speed, config);
        if self.trail.len() > max_len {
            let excess = self.trail.len() - max_len;
            self.trail.drain(..excess);
        }

        self.last = Some(observed);
        speed
    }
}

/// Longest trail allowed at `speed`: faster movement keeps more history.
pub fn max_trail_len(speed: f32, config: &TrailConfig) -> usize {
    let ceiling = config.speed_ceiling;
    let speed = if speed.is_nan() { 0.0 } else { speed.clamp(0.0, ceiling) };
    let len = remap(
        speed,
        0.0,
        ceiling,
        config.min_len as f32,
        config.max_len as f32,
    )
    .floor() as usize;
    len.clamp(config.min_len, config.max_len)
}

/// Fixed-size store of [`TrackState`]s, one slot per (side, fingertip).
#[derive(Debug, Clone, Default)]
pub struct TrackStore {
    slots: [[Option<TrackState>; 5]; 2],
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Handedness, tip: Fingertip) -> Option<&TrackState> {
        self.slots[side.index()][tip.index()].as_ref()
    }

    pub fn get_or_create(&mut self, side: Handedness, tip: Fingertip) -> &mut TrackState {
        self.slots[side.index()][tip.index()].get_or_insert_with(|| {
            log::trace!("tracking {side} {tip}");
            TrackState::default()
        })
    }

    /// Every existing state with its key.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handedness, Fingertip, &mut TrackState)> {
        Handedness::ALL
            .into_iter()
            .zip(self.slots.iter_mut())
            .flat_map(|(side, row)| {
                Fingertip::ALL
                    .into_iter()
                    .zip(row.iter_mut())
                    .filter_map(move |(tip, slot)| slot.as_mut().map(|state| (side, tip, state)))
            })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrailConfig {
        TrailConfig::default()
    }

    #[test]
    fn first_update_uses_raw_point_and_zero_speed() {
        let mut state = TrackState::default();
        let speed = state.update(Point::new(5.0, 7.0), &config());
        assert_eq!(speed, 0.0);
        assert_eq!(state.trail, vec![Point::new(5.0, 7.0)]);
        assert_eq!(state.last, Some(Point::new(5.0, 7.0)));
    }

    #[test]
    fn later_updates_are_smoothed_toward_observation() {
        let mut state = TrackState::default();
        state.update(Point::new(0.0, 0.0), &config());
        let speed = state.update(Point::new(10.0, 0.0), &config());
        assert_eq!(speed, 10.0);
        assert_eq!(state.trail.len(), 2);
        assert!((state.trail[1].x - 6.0).abs() < 1e-5);
        assert_eq!(state.last, Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn max_len_spans_twelve_to_forty_eight() {
        let config = config();
        assert_eq!(max_trail_len(0.0, &config), 12);
        assert_eq!(max_trail_len(10.0, &config), 21);
        assert_eq!(max_trail_len(40.0, &config), 48);
        assert_eq!(max_trail_len(400.0, &config), 48);
        assert_eq!(max_trail_len(-3.0, &config), 12);
        assert_eq!(max_trail_len(f32::INFINITY, &config), 48);
        assert_eq!(max_trail_len(f32::NAN, &config), 12);
    }

    #[test]
    fn trail_never_exceeds_speed_cap() {
        let config = config();
        let mut state = TrackState::default();
        let mut x = 0.0;
        for step in 0..200 {
            // alternate slow and fast movement
            x += if step % 7 == 0 { 35.0 } else { 1.0 };
            let speed = state.update(Point::new(x, 0.0), &config);
            assert!(state.trail.len() <= max_trail_len(speed, &config));
            assert!(!state.trail.is_empty());
        }
    }

    #[test]
    fn slowing_down_evicts_oldest_points() {
        let config = config();
        let mut state = TrackState::default();
        let mut x = 0.0;
        for _ in 0..60 {
            x += 40.0;
            state.update(Point::new(x, 0.0), &config);
        }
        assert_eq!(state.trail.len(), 48);
        let newest = state.trail[47];
        state.update(Point::new(x, 0.0), &config);
        assert_eq!(state.trail.len(), 12);
        assert_eq!(state.trail[10], newest);
    }

    #[test]
    fn store_creates_lazily_and_keeps_state() {
        let mut store = TrackStore::new();
        assert!(store.is_empty());
        assert!(store.get(Handedness::Left, Fingertip::Index).is_none());

        store
            .get_or_create(Handedness::Left, Fingertip::Index)
            .update(Point::new(1.0, 1.0), &config());
        assert_eq!(store.len(), 1);

        let state = store.get_or_create(Handedness::Left, Fingertip::Index);
        assert_eq!(state.trail.len(), 1);
        assert!(!state.pinch_prev);
        assert!(store.get(Handedness::Right, Fingertip::Index).is_none());
    }

    #[test]
    fn store_is_bounded_to_ten_keys() {
        let mut store = TrackStore::new();
        for _ in 0..3 {
            for side in Handedness::ALL {
                for tip in Fingertip::ALL {
                    store.get_or_create(side, tip);
                }
            }
        }
        assert_eq!(store.len(), 10);
        assert_eq!(store.iter_mut().count(), 10);
        store.clear();
        assert!(store.is_empty());
    }
}
