pub mod image;
pub mod impl_fake;
#[cfg(feature = "onnx")]
pub mod impl_tract_onnx;
pub mod interface;
#[cfg(feature = "onnx")]
pub mod model_config;
