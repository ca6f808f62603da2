//! Simulated camera.
//!
//! Produces a minimal JPEG-framed payload per still: SOI, one COM segment
//! naming the frame, EOI. Not a decodable picture, but it carries the
//! markers clients sniff for and is distinct per capture.

use gantry_motion::{CaptureDevice, CaptureError};

const SOI: [u8; 2] = [0xFF, 0xD8];
const COM: [u8; 2] = [0xFF, 0xFE];
const EOI: [u8; 2] = [0xFF, 0xD9];

#[derive(Debug)]
pub struct SimulatedCamera {
    width: u32,
    height: u32,
    frames: u64,
}

impl SimulatedCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: 0,
        }
    }

    /// Stills produced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl CaptureDevice for SimulatedCamera {
    fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.frames += 1;
        let comment = format!(
            "gantry simulated frame {} {}x{}",
            self.frames, self.width, self.height
        );
        // segment length counts its own two bytes
        let len = u16::try_from(comment.len() + 2)
            .map_err(|_| CaptureError::EncodeFailed("comment too long".to_string()))?;

        let mut out = Vec::with_capacity(comment.len() + 8);
        out.extend_from_slice(&SOI);
        out.extend_from_slice(&COM);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(comment.as_bytes());
        out.extend_from_slice(&EOI);
        Ok(out)
    }
}
