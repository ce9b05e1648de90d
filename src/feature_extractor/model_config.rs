#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    /// (height, width)
    pub input_shape: (u32, u32),
    /// Length of the pooled output the backbone is truncated at.
    pub embedding_dim: usize,
}
