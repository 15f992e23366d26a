//! WGSL validation and shader module creation.
//!
//! Sources are parsed and validated with `naga` before they reach the device,
//! so a broken shader is reported as a [`ShaderError`] with the compiler's
//! diagnostic instead of a device-lost panic later.

use log::{debug, info};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Error types for shader compilation.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: String, message: String },
}

/// Parse and validate a WGSL source, returning the checked IR.
pub fn validate_wgsl(name: &str, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        ShaderError::CompilationFailed {
            name: name.to_owned(),
            message: e.emit_to_string(source),
        }
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::CompilationFailed {
        name: name.to_owned(),
        message: e.emit_to_string(source),
    })?;

    debug!(
        "Shader '{}' validated: {} entry points",
        name,
        module.entry_points.len()
    );
    Ok(module)
}

/// Validate `source` and create a shader module from it.
pub fn create_shader_module(
    device: &wgpu::Device,
    name: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    validate_wgsl(name, source)?;
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(name),
        source: ShaderSource::Wgsl(source.into()),
    });
    info!("Loaded shader '{}'", name);
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SHADER: &str = r#"
        @vertex
        fn vs_main(@builtin(vertex_index) idx: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(f32(idx), 0.0, 0.0, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    const UNDECLARED_SHADER: &str = r#"
        @vertex
        fn vs_main() -> @builtin(position) vec4<f32> {
            return undeclared_variable;
        }
    "#;

    const TYPE_ERROR_SHADER: &str = r#"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec3<f32>(1.0, 0.0, 0.0);
        }
    "#;

    #[test]
    fn test_valid_shader_passes() {
        let module = validate_wgsl("valid", VALID_SHADER).unwrap();
        assert_eq!(module.entry_points.len(), 2);
    }

    #[test]
    fn test_parse_error_reports_name() {
        let err = validate_wgsl("broken", UNDECLARED_SHADER).unwrap_err();
        let ShaderError::CompilationFailed { name, message } = err;
        assert_eq!(name, "broken");
        assert!(message.contains("undeclared_variable"), "{message}");
    }

    #[test]
    fn test_type_error_rejected() {
        assert!(validate_wgsl("mismatch", TYPE_ERROR_SHADER).is_err());
    }

    #[test]
    fn test_create_module_on_device() {
        let Some((device, _queue)) = crate::depth::tests::headless_device() else {
            return;
        };
        assert!(create_shader_module(&device, "valid", VALID_SHADER).is_ok());
        assert!(create_shader_module(&device, "broken", UNDECLARED_SHADER).is_err());
    }
}
