use serde::{Serialize, Deserialize};
use crate::activation::activation::ActivationFunction;
use crate::data::Dataset;
use crate::error::{HarnessError, Result};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`      : number of neurons in this layer
/// - `input_size`: number of neurons feeding into this layer (i.e. the output
///                  size of the previous layer, or the raw input dimension for
///                  the first layer)
/// - `activation`: activation function applied after the linear transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a classifier architecture.
///
/// The last layer's `size` is the number of scored classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used in log lines.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    /// Inverted-dropout probability applied to hidden activations in training mode.
    #[serde(default)]
    pub dropout: f64,
}

impl NetworkSpec {
    /// Checks that the layers chain and the dropout probability is usable.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(HarnessError::Config(format!("network '{}' has no layers", self.name)));
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[1].input_size != pair[0].size {
                return Err(HarnessError::Config(format!(
                    "layer {} expects {} inputs but layer {} produces {}",
                    i + 1, pair[1].input_size, i, pair[0].size
                )));
            }
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(HarnessError::Config(format!(
                "dropout must be in [0, 1), got {}", self.dropout
            )));
        }
        Ok(())
    }

    pub fn num_classes(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Feature width the first layer expects.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size)
    }

    /// Fails unless every example in `data` has `input_size()` features.
    pub fn check_dataset(&self, data: &Dataset<Vec<f64>>) -> Result<()> {
        data.check_width(self.input_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(layers: Vec<(usize, usize)>, dropout: f64) -> NetworkSpec {
        NetworkSpec {
            name: "t".into(),
            layers: layers.into_iter()
                .map(|(size, input_size)| LayerSpec { size, input_size, activation: ActivationFunction::ReLU })
                .collect(),
            dropout,
        }
    }

    #[test]
    fn validate_rejects_broken_chain() {
        assert!(spec(vec![(8, 4), (3, 8)], 0.0).validate().is_ok());
        assert!(matches!(spec(vec![(8, 4), (3, 7)], 0.0).validate(), Err(HarnessError::Config(_))));
        assert!(spec(vec![], 0.0).validate().is_err());
        assert!(spec(vec![(3, 4)], 1.0).validate().is_err());
    }

    #[test]
    fn parses_from_json() {
        let json = r#"{
            "name": "tiny",
            "layers": [
                {"size": 8, "input_size": 4, "activation": "ReLU"},
                {"size": 3, "input_size": 8, "activation": "Identity"}
            ]
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.num_classes(), 3);
        assert_eq!(spec.dropout, 0.0);
    }

    #[test]
    fn check_dataset_rejects_wrong_feature_width() {
        let net = spec(vec![(8, 2), (3, 8)], 0.0);
        assert_eq!(net.input_size(), 2);

        let fits = Dataset::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]], vec![0, 1]).unwrap();
        assert!(net.check_dataset(&fits).is_ok());

        let too_wide = Dataset::new(vec![vec![0.0, 1.0, 2.0]], vec![0]).unwrap();
        assert!(matches!(net.check_dataset(&too_wide), Err(HarnessError::Config(_))));
    }
}
