//! Start-up errors for the platform layer
//!
//! The simulation itself cannot fail; only acquiring the window, canvas and
//! GPU can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no browser window available")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("element #{0} not found or not a canvas")]
    NoCanvas(String),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            StartupError::NoCanvas("canvas".into()).to_string(),
            "element #canvas not found or not a canvas"
        );
        assert_eq!(
            StartupError::NoWindow.to_string(),
            "no browser window available"
        );
    }
}
