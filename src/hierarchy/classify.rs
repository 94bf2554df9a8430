//! Static lookup tables mapping a module class to its layer category and to
//! the configuration keys worth showing for it.

use crate::model::{LayerType, Params};

/// Category for a known module class, `None` when the class is not in the table.
pub fn known_layer_type(module_class: &str) -> Option<LayerType> {
    let layer_type = match module_class {
        "Linear" => LayerType::Linear,
        "Conv1d" | "Conv2d" | "Conv3d" | "ConvTranspose1d" | "ConvTranspose2d"
        | "ConvTranspose3d" => LayerType::Conv,
        "BatchNorm1d" | "BatchNorm2d" | "BatchNorm3d" | "LayerNorm" | "GroupNorm"
        | "InstanceNorm1d" | "InstanceNorm2d" => LayerType::Normalization,
        "Dropout" | "Dropout2d" | "Dropout3d" => LayerType::Dropout,
        "ReLU" | "LeakyReLU" | "PReLU" | "ELU" | "SELU" | "GELU" | "Sigmoid" | "Tanh"
        | "Softmax" | "LogSoftmax" => LayerType::Activation,
        "MaxPool1d" | "MaxPool2d" | "MaxPool3d" | "AvgPool1d" | "AvgPool2d" | "AvgPool3d"
        | "AdaptiveMaxPool1d" | "AdaptiveMaxPool2d" | "AdaptiveAvgPool1d"
        | "AdaptiveAvgPool2d" => LayerType::Pooling,
        "Flatten" | "Unflatten" => LayerType::Reshape,
        "LSTM" | "GRU" | "RNN" => LayerType::Recurrent,
        "Embedding" => LayerType::Embedding,
        "MultiheadAttention" => LayerType::Attention,
        "Sequential" | "ModuleList" | "ModuleDict" => LayerType::Container,
        _ => return None,
    };
    Some(layer_type)
}

/// Category for any module class. Unknown classes that own submodules are
/// containers, everything else is a plain module.
pub fn classify(module_class: &str, has_children: bool) -> LayerType {
    match known_layer_type(module_class) {
        Some(layer_type) => layer_type,
        None if has_children => LayerType::Container,
        None => LayerType::Module,
    }
}

fn param_keys(module_class: &str) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match module_class {
        "Linear" => &["in_features", "out_features", "bias"],
        "Conv1d" | "Conv2d" | "Conv3d" => &[
            "in_channels",
            "out_channels",
            "kernel_size",
            "stride",
            "padding",
            "bias",
        ],
        "BatchNorm1d" | "BatchNorm2d" | "BatchNorm3d" => &["num_features", "eps", "momentum"],
        "LayerNorm" => &["normalized_shape", "eps"],
        "Dropout" | "Dropout2d" => &["p"],
        "Embedding" => &["num_embeddings", "embedding_dim"],
        "MultiheadAttention" => &["embed_dim", "num_heads", "dropout"],
        "LSTM" | "GRU" => &["input_size", "hidden_size", "num_layers", "bidirectional"],
        _ if known_layer_type(module_class).is_some() => &[],
        _ => return None,
    };
    Some(keys)
}

/// Select the configuration shown for a layer from the raw attributes the
/// producer reported. Known classes keep only their documented keys; classes
/// outside the table keep everything.
pub fn extract_params(module_class: &str, raw: &Params) -> Params {
    match param_keys(module_class) {
        Some(keys) => keys
            .iter()
            .filter_map(|key| raw.get(*key).map(|value| (key.to_string(), value.clone())))
            .collect(),
        None => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_known_classes() {
        assert_eq!(classify("Linear", false), LayerType::Linear);
        assert_eq!(classify("ConvTranspose2d", false), LayerType::Conv);
        assert_eq!(classify("GroupNorm", false), LayerType::Normalization);
        assert_eq!(classify("GELU", false), LayerType::Activation);
        assert_eq!(classify("AdaptiveAvgPool2d", false), LayerType::Pooling);
        assert_eq!(classify("Unflatten", false), LayerType::Reshape);
        assert_eq!(classify("GRU", false), LayerType::Recurrent);
        assert_eq!(classify("MultiheadAttention", false), LayerType::Attention);
        // Table entries win even without children
        assert_eq!(classify("ModuleList", false), LayerType::Container);
    }

    #[test]
    fn test_unknown_class_fallback() {
        assert_eq!(classify("ResidualBlock", true), LayerType::Container);
        assert_eq!(classify("ResidualBlock", false), LayerType::Module);
    }

    #[test]
    fn test_extract_linear_params() {
        let attrs = raw(json!({
            "in_features": 10,
            "out_features": 20,
            "bias": true,
            "training": true
        }));

        let params = extract_params("Linear", &attrs);
        assert_eq!(params.len(), 3);
        assert_eq!(params["in_features"], json!(10));
        assert!(!params.contains_key("training"));
    }

    #[test]
    fn test_extract_skips_missing_keys() {
        let attrs = raw(json!({ "in_channels": 3, "out_channels": 32 }));
        let params = extract_params("Conv2d", &attrs);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_known_class_without_rule_has_no_params() {
        let attrs = raw(json!({ "inplace": false }));
        assert!(extract_params("ReLU", &attrs).is_empty());
    }

    #[test]
    fn test_unknown_class_passes_through() {
        let attrs = raw(json!({ "scale": 0.5, "heads": 4 }));
        assert_eq!(extract_params("ScaledBlock", &attrs), attrs);
    }
}
