use smol_str::SmolStr;

/// Failures raised by a [`crate::backend::GpuBackend`]. All of them are fatal
/// for the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("shader compilation failed for {identity}: {message}")]
    ShaderCompile { identity: SmolStr, message: String },

    #[error("pipeline handle is not known to this backend")]
    PipelineMissing,

    #[error("uniform region handle is not known to this backend")]
    RegionMissing,

    #[error("frame index {frame} is out of range for {frames_in_flight} frames in flight")]
    FrameOutOfRange {
        frame: usize,
        frames_in_flight: usize,
    },

    #[error("failed to load image {key}: {message}")]
    Image { key: SmolStr, message: String },

    #[error("device error: {0}")]
    Device(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TauError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("config error: {0}")]
    Config(String),

    #[error("no root element is mounted")]
    NotMounted,
}

pub type Result<T> = std::result::Result<T, TauError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_out_of_range_display() {
        let e = BackendError::FrameOutOfRange {
            frame: 3,
            frames_in_flight: 2,
        };
        assert_eq!(
            format!("{e}"),
            "frame index 3 is out of range for 2 frames in flight"
        );
    }

    #[test]
    fn backend_error_converts_into_tau_error() {
        let e: TauError = BackendError::PipelineMissing.into();
        assert_eq!(
            format!("{e}"),
            "backend error: pipeline handle is not known to this backend"
        );
    }
}
