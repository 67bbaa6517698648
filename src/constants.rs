// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Scan cooldown defaults
pub mod cooldown {
    /// Seconds a successful decode blocks further reporting
    pub const DEFAULT_DURATION_SECS: f64 = 5.0;
}

/// Camera capture constants
pub mod capture {
    use std::time::Duration;

    /// Device index opened when a start request names none
    pub const DEFAULT_CAMERA_INDEX: u32 = 0;

    /// Device indices probed by camera enumeration
    pub const DEFAULT_MAX_PROBE: u32 = 5;

    /// Memory-mapped buffers per V4L2 stream
    ///
    /// Kept small so a polled read returns a recent frame rather than a
    /// queued one from seconds ago.
    pub const STREAM_BUFFERS: u32 = 2;

    /// Longest a single frame read may block
    pub const READ_TIMEOUT: Duration = Duration::from_secs(2);
}

/// Symbol detection constants
pub mod detection {
    /// Frames are downscaled to this maximum dimension before detection
    pub const DEFAULT_MAX_DIMENSION: u32 = 640;

    /// Kind tag reported for QR codes
    pub const QR_KIND: &str = "QRCODE";
}

/// Overlay rendering constants
pub mod overlay {
    /// Symbol outline color (RGB)
    pub const OUTLINE_COLOR: [u8; 3] = [0, 255, 0];

    /// Symbol outline thickness in pixels
    pub const OUTLINE_THICKNESS: i32 = 3;

    /// Symbol label color (RGB)
    pub const LABEL_COLOR: [u8; 3] = [0, 255, 0];

    /// Symbol label glyph scale (8x8 glyphs)
    pub const LABEL_SCALE: u32 = 1;

    /// Gap between a symbol's first vertex and the bottom of its label
    pub const LABEL_OFFSET: i32 = 10;

    /// Countdown label color (RGB)
    pub const COUNTDOWN_COLOR: [u8; 3] = [255, 0, 0];

    /// Countdown label glyph scale
    pub const COUNTDOWN_SCALE: u32 = 2;

    /// Countdown label baseline position (left, bottom)
    pub const COUNTDOWN_ORIGIN: (i32, i32) = (10, 30);
}

/// Encoding constants
pub mod encoding {
    /// Default JPEG quality (1-100)
    pub const DEFAULT_JPEG_QUALITY: u8 = 80;

    /// MIME type of the encoded frame
    pub const FRAME_MIME: &str = "image/jpeg";
}

/// HTTP server constants
pub mod server {
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default listening port
    pub const DEFAULT_PORT: u16 = 5001;

    /// Liveness message returned by `GET /`
    pub const SERVICE_MESSAGE: &str = "Barcode Scanner API";

    /// Error returned when a scan finds no frame
    pub const CAMERA_NOT_AVAILABLE: &str = "Camera not available";
}

/// Supported file formats for the virtual camera image source
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Application version, from git when available
pub const APP_VERSION: &str = env!("GIT_VERSION");
