//! Concrete [`HandSource`]s for the viewer.
//!
//! * [`PointerHands`] fakes a left hand that follows the pointer (press to
//!   pinch) and a right hand that circles on its own.
//! * [`PipeHands`] reads landmark frames, one per line, on a background
//!   thread and hands the newest one to the render loop.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::geom::Point;
use crate::hands::{parse_frame, Fingertip, HandDetection, HandSource, Handedness, LANDMARK_COUNT};

// ============================================================================
// POINTER SIMULATION
// ============================================================================

/// Tip offsets from the pointer for an open hand, thumb first.
const OPEN_TIPS: [(f32, f32); 5] = [(-70.0, 45.0), (0.0, 0.0), (28.0, -6.0), (54.0, 6.0), (76.0, 28.0)];
/// Thumb offset while the pointer button is held; inside the pinch radius.
const PINCHED_THUMB: (f32, f32) = (-10.0, 8.0);
const WRIST_OFFSET: (f32, f32) = (20.0, 150.0);

pub struct PointerHands {
    width: f32,
    height: f32,
    pointer: Option<Point>,
    pressed: bool,
    frame: u64,
    hands: Vec<HandDetection>,
}

impl PointerHands {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            pointer: None,
            pressed: false,
            frame: 0,
            hands: Vec::with_capacity(2),
        }
    }

    fn pointer_hand(&self, pointer: Point) -> HandDetection {
        let mut tips = OPEN_TIPS.map(|(dx, dy)| Point::new(pointer.x + dx, pointer.y + dy));
        if self.pressed {
            tips[Fingertip::Thumb.index()] =
                Point::new(pointer.x + PINCHED_THUMB.0, pointer.y + PINCHED_THUMB.1);
        }
        let wrist = Point::new(pointer.x + WRIST_OFFSET.0, pointer.y + WRIST_OFFSET.1);
        synth_hand(Handedness::Left, wrist, tips)
    }

    /// Right hand circling the right half of the view, pinching its middle
    /// finger now and then.
    fn orbiting_hand(&self) -> HandDetection {
        let t = self.frame as f32;
        let center = Point::new(self.width * 0.72, self.height * 0.5);
        let radius = self.width.min(self.height) * 0.18;
        let angle = t * 0.025;
        let pointer = Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());

        let mut tips = OPEN_TIPS.map(|(dx, dy)| Point::new(pointer.x - dx, pointer.y + dy));
        if (t * 0.04).sin() > 0.7 {
            let middle = tips[Fingertip::Middle.index()];
            tips[Fingertip::Thumb.index()] = Point::new(middle.x + 6.0, middle.y + 10.0);
        }
        let wrist = Point::new(pointer.x - WRIST_OFFSET.0, pointer.y + WRIST_OFFSET.1);
        synth_hand(Handedness::Right, wrist, tips)
    }
}

impl HandSource for PointerHands {
    fn poll(&mut self) -> &[HandDetection] {
        self.frame += 1;
        self.hands.clear();
        if let Some(pointer) = self.pointer {
            let hand = self.pointer_hand(pointer);
            self.hands.push(hand);
        }
        let orbit = self.orbiting_hand();
        self.hands.push(orbit);
        &self.hands
    }

    fn pointer_moved(&mut self, position: Point) {
        self.pointer = Some(position);
    }

    fn pointer_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    fn view_resized(&mut self, width: usize, height: usize) {
        self.width = width as f32;
        self.height = height as f32;
    }
}

/// Lay out a plausible 21-point hand between `wrist` and the five tips.
fn synth_hand(side: Handedness, wrist: Point, tips: [Point; 5]) -> HandDetection {
    let mut keypoints = vec![None; LANDMARK_COUNT];
    keypoints[0] = Some(wrist);
    for tip in Fingertip::ALL {
        let end = tips[tip.index()];
        let joints: [f32; 3] = match tip {
            Fingertip::Thumb => [0.25, 0.5, 0.75],
            _ => [0.45, 0.65, 0.82],
        };
        let first = tip.landmark() - 3;
        for (offset, t) in joints.into_iter().enumerate() {
            keypoints[first + offset] = Some(wrist.lerp(end, t));
        }
        keypoints[tip.landmark()] = Some(end);
    }
    HandDetection::from_keypoints(side, keypoints)
}

// ============================================================================
// LINE STREAM
// ============================================================================

pub struct PipeHands {
    rx: Receiver<Vec<HandDetection>>,
    latest: Vec<HandDetection>,
    connected: bool,
}

impl PipeHands {
    /// Read frames from standard input.
    pub fn stdin() -> Self {
        Self::spawn(io::BufReader::new(io::stdin()))
    }

    /// Read frames from `reader` on a background thread.
    pub fn spawn<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for (number, line) in reader.lines().enumerate() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        log::warn!("landmark stream read failed: {err}");
                        break;
                    }
                };
                match parse_frame(&line) {
                    Ok(hands) => {
                        if tx.send(hands).is_err() {
                            break;
                        }
                    }
                    Err(err) => log::warn!("skipping landmark line {}: {err}", number + 1),
                }
            }
            log::info!("landmark stream closed");
        });
        Self::from_receiver(rx)
    }

    pub fn from_receiver(rx: Receiver<Vec<HandDetection>>) -> Self {
        Self {
            rx,
            latest: Vec::new(),
            connected: true,
        }
    }
}

impl HandSource for PipeHands {
    /// Newest frame received so far; the previous frame is repeated while
    /// the producer is slower than the render loop.
    fn poll(&mut self) -> &[HandDetection] {
        loop {
            match self.rx.try_recv() {
                Ok(hands) => self.latest = hands,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.connected = false;
                    break;
                }
            }
        }
        &self.latest
    }

    /// False once the producer has gone away and every frame was consumed.
    fn is_connected(&self) -> bool {
        self.connected
    }
}
