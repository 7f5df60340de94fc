//! Per-block analysis produced by the block analyzer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::BlockId;

/// Argumentative analysis of a single demand block.
///
/// Used only to enrich question generation; never surfaced in the
/// consolidated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAnalysis {
    pub bloque_id: BlockId,
    #[serde(default)]
    pub argumentos_clave: Vec<String>,
    #[serde(default)]
    pub puntos_debiles: Vec<String>,
    #[serde(default)]
    pub prueba_implicita: Vec<String>,
    #[serde(default)]
    pub sugerencias_defensa: Vec<String>,
}

impl BlockAnalysis {
    /// Creates an empty analysis for a block.
    pub fn empty(bloque_id: impl Into<BlockId>) -> Self {
        Self {
            bloque_id: bloque_id.into(),
            argumentos_clave: Vec::new(),
            puntos_debiles: Vec::new(),
            prueba_implicita: Vec::new(),
            sugerencias_defensa: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_analysis() {
        let analysis = BlockAnalysis::empty("bloque_1");
        assert_eq!(analysis.bloque_id.as_str(), "bloque_1");
        assert!(analysis.argumentos_clave.is_empty());
        assert!(analysis.sugerencias_defensa.is_empty());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let analysis: BlockAnalysis =
            serde_json::from_str(r#"{"bloque_id":"bloque_1"}"#).unwrap();
        assert!(analysis.puntos_debiles.is_empty());
        assert!(analysis.prueba_implicita.is_empty());
    }
}
