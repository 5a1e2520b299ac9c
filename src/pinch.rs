use crate::config::PinchConfig;
use crate::geom::Point;
use crate::hands::Fingertip;

/// True when `target` lies strictly within `threshold` pixels of
/// `reference`.
pub fn detect(reference: Point, target: Point, threshold: f32) -> bool {
    reference.distance(target) < threshold
}

/// Pinch state of one fingertip for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchReading {
    /// Fingertip is away from the anchor.
    Open,
    /// Fingertip touches the anchor.
    Closed,
    /// No meaningful measurement: the fingertip is the anchor itself, the
    /// anchor is missing, or the fingertip was not observed. Counts as
    /// pinched for edge tracking but never triggers.
    Held,
}

impl PinchReading {
    pub fn is_pinched(self) -> bool {
        !matches!(self, PinchReading::Open)
    }
}

/// Record `reading` as the new previous state and report whether this
/// frame is an open-to-closed transition.
pub fn rising_edge(pinch_prev: &mut bool, reading: PinchReading) -> bool {
    let fired = reading == PinchReading::Closed && !*pinch_prev;
    *pinch_prev = reading.is_pinched();
    fired
}

/// Measures every fingertip of a hand against one anchor fingertip.
#[derive(Debug, Clone)]
pub struct PinchDetector {
    anchor: Fingertip,
    threshold: f32,
}

impl PinchDetector {
    pub fn new(anchor: Fingertip, threshold: f32) -> Self {
        Self { anchor, threshold }
    }

    pub fn from_config(config: &PinchConfig) -> Self {
        Self::new(config.anchor, config.threshold)
    }

    pub fn anchor(&self) -> Fingertip {
        self.anchor
    }

    pub fn read(&self, anchor_point: Option<Point>, tip: Fingertip, tip_point: Point) -> PinchReading {
        if tip == self.anchor {
            return PinchReading::Held;
        }
        match anchor_point {
            Some(anchor) if detect(anchor, tip_point, self.threshold) => PinchReading::Closed,
            Some(_) => PinchReading::Open,
            None => PinchReading::Held,
        }
    }
}
