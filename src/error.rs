//! Error types for rendering, GPU setup and the frame loop.

use thiserror::Error;

/// A frame could not be drawn.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("the render surface was lost")]
    SurfaceLost,
    #[error("the GPU ran out of memory")]
    OutOfMemory,
    #[error("timed out acquiring the next surface texture")]
    Timeout,
    #[error("render failed: {0}")]
    Other(String),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            wgpu::SurfaceError::Timeout => RenderError::Timeout,
            other => RenderError::Other(other.to_string()),
        }
    }
}

/// GPU initialization failed.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create a surface for the window")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create the GPU device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("the surface reports no supported formats")]
    NoSurfaceFormat,
}

/// The frame loop could not run a tick.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("the frame loop has already stopped")]
    Stopped,
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors from the windowed host.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Loop(#[from] LoopError),
    #[error("unknown demo `{0}`")]
    UnknownDemo(String),
}
