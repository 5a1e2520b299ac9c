//! Per-frame hand input as delivered by a landmark detector.
//!
//! The detector itself is an external collaborator; this module only fixes
//! the shape of its output ([`HandDetection`]) and the [`HandSource`] trait
//! the host loop polls once per frame.

use std::fmt;
use std::str::FromStr;

use crate::error::FxError;
use crate::geom::Point;

// ============================================================================
// HAND SIDE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    /// Map a detector label to a side. Anything that is not clearly
    /// "left" is treated as the right hand.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("left") {
            Handedness::Left
        } else {
            Handedness::Right
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TRACKED FINGERTIPS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fingertip {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Fingertip {
    /// Processing order within a hand.
    pub const ALL: [Fingertip; 5] = [
        Fingertip::Thumb,
        Fingertip::Index,
        Fingertip::Middle,
        Fingertip::Ring,
        Fingertip::Pinky,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Fingertip::Thumb => "thumb_tip",
            Fingertip::Index => "index_finger_tip",
            Fingertip::Middle => "middle_finger_tip",
            Fingertip::Ring => "ring_finger_tip",
            Fingertip::Pinky => "pinky_finger_tip",
        }
    }

    /// Position of this tip in the 21-point hand landmark layout.
    pub const fn landmark(self) -> usize {
        match self {
            Fingertip::Thumb => THUMB_TIP,
            Fingertip::Index => INDEX_TIP,
            Fingertip::Middle => MIDDLE_TIP,
            Fingertip::Ring => RING_TIP,
            Fingertip::Pinky => PINKY_TIP,
        }
    }
}

impl fmt::Display for Fingertip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fingertip {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fingertip::ALL
            .into_iter()
            .find(|tip| tip.name() == s)
            .ok_or_else(|| FxError::Parse(format!("unknown fingertip {s:?}")))
    }
}

// ============================================================================
// HAND LANDMARK LAYOUT
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// Bone connectivity used by the skeleton debug overlay: the 21-landmark
/// MediaPipe hand topology, with the palm closed along the knuckles.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

// ============================================================================
// HAND DETECTION
// ============================================================================

/// One detected hand for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    pub handedness: Handedness,
    /// Fingertip positions indexed by [`Fingertip::index`]; `None` when the
    /// detector did not report that tip this frame.
    pub tips: [Option<Point>; 5],
    /// Full landmark list for the skeleton overlay. May be empty.
    pub keypoints: Vec<Option<Point>>,
}

impl HandDetection {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            tips: [None; 5],
            keypoints: Vec::new(),
        }
    }

    /// Build a detection from a full landmark list, taking the fingertips
    /// from their standard landmark slots.
    pub fn from_keypoints(handedness: Handedness, keypoints: Vec<Option<Point>>) -> Self {
        let mut hand = Self {
            handedness,
            tips: [None; 5],
            keypoints,
        };
        hand.fill_tips_from_keypoints();
        hand
    }

    pub fn with_tip(mut self, tip: Fingertip, point: Point) -> Self {
        self.tips[tip.index()] = Some(point);
        self
    }

    pub fn tip(&self, tip: Fingertip) -> Option<Point> {
        self.tips[tip.index()]
    }

    pub fn keypoint(&self, index: usize) -> Option<Point> {
        self.keypoints.get(index).copied().flatten()
    }

    fn fill_tips_from_keypoints(&mut self) {
        for tip in Fingertip::ALL {
            if self.tips[tip.index()].is_none() {
                self.tips[tip.index()] = self.keypoint(tip.landmark());
            }
        }
    }
}

/// Anything that can hand the render loop the current frame's detections.
///
/// Sources that are driven by window input (pointer simulation) receive the
/// raw pointer events through the default-no-op hooks.
pub trait HandSource {
    /// Detections for the frame about to be rendered.
    fn poll(&mut self) -> &[HandDetection];

    fn pointer_moved(&mut self, _position: Point) {}

    fn pointer_pressed(&mut self, _pressed: bool) {}

    fn view_resized(&mut self, _width: usize, _height: usize) {}

    /// False once a source fed by an outside producer has lost it.
    fn is_connected(&self) -> bool {
        true
    }
}

// ============================================================================
// TEXT FRAME FORMAT
// ============================================================================

/// Parse one frame of the line-oriented landmark format:
///
/// ```text
/// Left thumb_tip=120,300 index_finger_tip=140,310 | Right kp0=10,10 kp4=30,12
/// ```
///
/// Hands are separated by `|`. A hand optionally starts with its label;
/// `kpN=x,y` sets landmark `N`. A blank line is a frame without hands.
pub fn parse_frame(line: &str) -> Result<Vec<HandDetection>, FxError> {
    line.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_hand)
        .collect()
}

fn parse_hand(segment: &str) -> Result<HandDetection, FxError> {
    let mut tokens = segment.split_whitespace().peekable();
    let handedness = match tokens.peek() {
        Some(token) if !token.contains('=') => {
            let label = Handedness::from_label(token);
            tokens.next();
            label
        }
        _ => Handedness::Right,
    };

    let mut hand = HandDetection::new(handedness);
    for token in tokens {
        let (name, coords) = token
            .split_once('=')
            .ok_or_else(|| FxError::Parse(format!("expected name=x,y, got {token:?}")))?;
        let point = parse_point(coords)?;
        if let Some(index) = name.strip_prefix("kp") {
            let index: usize = index
                .parse()
                .map_err(|_| FxError::Parse(format!("bad keypoint index in {token:?}")))?;
            if index >= LANDMARK_COUNT {
                return Err(FxError::Parse(format!("keypoint {index} out of range")));
            }
            if hand.keypoints.len() <= index {
                hand.keypoints.resize(index + 1, None);
            }
            hand.keypoints[index] = Some(point);
        } else {
            let tip: Fingertip = name.parse()?;
            hand.tips[tip.index()] = Some(point);
        }
    }
    hand.fill_tips_from_keypoints();
    Ok(hand)
}

fn parse_point(coords: &str) -> Result<Point, FxError> {
    let (x, y) = coords
        .split_once(',')
        .ok_or_else(|| FxError::Parse(format!("expected x,y, got {coords:?}")))?;
    let x: f32 = x
        .trim()
        .parse()
        .map_err(|_| FxError::Parse(format!("bad x coordinate {x:?}")))?;
    let y: f32 = y
        .trim()
        .parse()
        .map_err(|_| FxError::Parse(format!("bad y coordinate {y:?}")))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(FxError::Parse(format!("non-finite coordinate {coords:?}")));
    }
    Ok(Point::new(x, y))
}
