// SPDX-License-Identifier: GPL-3.0-only

//! Direct V4L2 capture
//!
//! Uses the v4l crate to open `/dev/video<index>`, negotiate MJPEG (or YUYV as
//! a fallback) and pull single frames from a memory-mapped stream.

use super::format_converters;
use super::types::*;
use super::{CameraBackend, CameraHandle};
use crate::constants::capture;
use std::time::Instant;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// Backend for V4L2 video capture devices
#[derive(Debug, Clone, Copy, Default)]
pub struct V4l2Backend;

impl V4l2Backend {
    pub fn new() -> Self {
        Self
    }
}

/// Open a device and check it is a video capture node
///
/// UVC cameras also expose metadata nodes which open fine but cannot stream.
fn open_capture_device(index: u32) -> BackendResult<(Device, String)> {
    let dev = Device::new(index as usize).map_err(|e| {
        BackendError::DeviceNotFound(format!("/dev/video{}: {}", index, e))
    })?;

    let caps = dev.query_caps()?;
    if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
        return Err(BackendError::DeviceNotFound(format!(
            "/dev/video{} is not a capture device",
            index
        )));
    }

    Ok((dev, caps.card))
}

/// Negotiate the first supported wire format
fn negotiate_format(dev: &Device) -> BackendResult<(SourceFormat, u32, u32)> {
    let current = dev.format()?;

    for wanted in SourceFormat::PREFERRED {
        let mut format = current.clone();
        format.fourcc = v4l::FourCC::new(&wanted.fourcc());

        match dev.set_format(&format) {
            Ok(applied) => {
                if let Some(got) = SourceFormat::from_fourcc(&applied.fourcc.repr) {
                    debug!(
                        width = applied.width,
                        height = applied.height,
                        fourcc = %got,
                        "Negotiated V4L2 format"
                    );
                    return Ok((got, applied.width, applied.height));
                }
            }
            Err(e) => {
                debug!(fourcc = %wanted, error = %e, "Device rejected format");
            }
        }
    }

    Err(BackendError::FormatNotSupported(format!(
        "device offers {:?}, need MJPG or YUYV",
        current.fourcc
    )))
}

impl CameraBackend for V4l2Backend {
    fn open(&self, index: u32) -> BackendResult<Box<dyn CameraHandle>> {
        let (dev, card) = open_capture_device(index)?;
        let (format, width, height) = negotiate_format(&dev)?;

        let mut stream: MmapStream<'static> =
            MmapStream::with_buffers(&dev, Type::VideoCapture, capture::STREAM_BUFFERS)
                .map_err(|e| {
                    BackendError::DeviceNotFound(format!("Failed to create buffer stream: {}", e))
                })?;
        stream.set_timeout(capture::READ_TIMEOUT);

        info!(index, card = %card, width, height, fourcc = %format, "V4L2 stream ready");

        Ok(Box::new(V4l2Handle {
            stream,
            _device: dev,
            index,
            format,
            width,
            height,
        }))
    }

    fn probe(&self, index: u32) -> Option<CameraDevice> {
        let (dev, card) = open_capture_device(index).ok()?;
        let format = match dev.format() {
            Ok(format) => format,
            Err(e) => {
                debug!(index, error = %e, "Could not read format while probing");
                return None;
            }
        };

        // Device closes when `dev` drops here
        Some(CameraDevice::new(index, format.width, format.height).with_card(card))
    }

    fn name(&self) -> &'static str {
        "V4L2"
    }
}

/// Open V4L2 device with a running mmap stream
///
/// Field order matters: the stream unmaps its buffers before the device
/// file descriptor is closed.
struct V4l2Handle {
    stream: MmapStream<'static>,
    _device: Device,
    index: u32,
    format: SourceFormat,
    width: u32,
    height: u32,
}

impl CameraHandle for V4l2Handle {
    fn index(&self) -> u32 {
        self.index
    }

    fn is_opened(&self) -> bool {
        true
    }

    fn read_frame(&mut self) -> BackendResult<CameraFrame> {
        let start = Instant::now();
        let (buf, meta) = self
            .stream
            .next()
            .map_err(|e| BackendError::CaptureFailed(e.to_string()))?;

        // MJPEG buffers carry a variable-length image
        let used = (meta.bytesused as usize).min(buf.len());
        let payload = if used > 0 { &buf[..used] } else { buf };

        let rgb = format_converters::to_rgb(self.format, payload, self.width, self.height)?;
        if rgb.dimensions() != (self.width, self.height) {
            warn!(
                expected = ?(self.width, self.height),
                got = ?rgb.dimensions(),
                "Frame size differs from negotiated format"
            );
        }

        let mut frame = CameraFrame::from_rgb(rgb);
        frame.captured_at = start;
        Ok(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
