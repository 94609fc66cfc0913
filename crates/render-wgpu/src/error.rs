/// Errors from the wgpu backend. Every variant is fatal for the viewer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
    #[error("shader failed to compile: {0}")]
    ShaderCompilation(String),
    #[error("render pipeline failed to link: {0}")]
    PipelineLink(String),
    #[error("device error during {stage}: {message}")]
    Device { stage: &'static str, message: String },
}

/// Run `f` inside a validation error scope and report anything it raised.
pub(crate) fn validated<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
    on_error: impl FnOnce(String) -> RenderError,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(value),
        Some(err) => Err(on_error(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_names_stage() {
        let err = RenderError::Device {
            stage: "uniform upload",
            message: "buffer too small".into(),
        };
        assert_eq!(
            err.to_string(),
            "device error during uniform upload: buffer too small"
        );
    }

    #[test]
    fn shader_error_carries_diagnostic() {
        let err = RenderError::ShaderCompilation("unknown identifier `foo`".into());
        assert!(err.to_string().contains("unknown identifier"));
    }
}
