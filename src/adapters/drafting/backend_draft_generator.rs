//! Backend Draft Generator - renders contestación prose through the
//! generative backend.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::drafting::prompts;
use crate::ports::{
    Draft, DraftError, DraftGenerator, DraftRequest, GenerativeBackend, TextRequest,
};

/// Default DraftGenerator: one free-text completion per draft.
pub struct BackendDraftGenerator {
    backend: Arc<dyn GenerativeBackend>,
    max_tokens: u32,
}

impl BackendDraftGenerator {
    /// Creates a generator over the given backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            max_tokens: 8192,
        }
    }

    /// Sets the completion budget per draft.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_generation_prompt(request: &DraftRequest) -> String {
        let mut prompt = String::new();
        if !request.variante.is_empty() {
            prompt.push_str(&format!("Variante de plantilla: {}\n", request.variante));
        }
        if let Some(categoria) = &request.categoria {
            prompt.push_str(&format!("Categoría de la demanda: {}\n", categoria));
        }
        if let Some(partes) = &request.partes {
            prompt.push_str(&format!(
                "\nPARTES:\nCliente: {}\nContraparte: {}\n",
                partes.cliente_texto, partes.contraparte_texto
            ));
        }

        prompt.push_str(&format!(
            "\nSECCIONES CONSOLIDADAS:\n\
             HECHOS ADMITIDOS:\n{}\n\n\
             HECHOS NEGADOS:\n{}\n\n\
             DEFENSAS:\n{}\n\n\
             EXCEPCIONES:\n{}\n\n\
             PRUEBA:\n{}\n",
            request.datos.hechos_admitidos,
            request.datos.hechos_negados,
            request.datos.defensas,
            request.datos.excepciones,
            request.datos.prueba
        ));
        prompt
    }
}

#[async_trait]
impl DraftGenerator for BackendDraftGenerator {
    async fn generate(&self, request: DraftRequest) -> Result<Draft, DraftError> {
        if request.datos.is_empty() {
            return Err(DraftError::IncompleteRequest(
                "no consolidated fields to draft from".to_string(),
            ));
        }

        let text_request = TextRequest::new(
            prompts::DRAFT_SYSTEM_PROMPT,
            Self::build_generation_prompt(&request),
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(0.4);

        let contenido = self
            .backend
            .complete_text(text_request)
            .await
            .map_err(|e| DraftError::GenerationFailed(e.to_string()))?;

        Ok(Draft {
            id: Uuid::new_v4().to_string(),
            contenido,
            generado_at: chrono::Utc::now(),
        })
    }

    async fn iterate(&self, draft: &Draft, instrucciones: &str) -> Result<Draft, DraftError> {
        let prompt = format!(
            "BORRADOR ACTUAL:\n{}\n\nINSTRUCCIONES DEL PROFESIONAL:\n{}\n\n\
             Devolvé el borrador completo revisado.",
            draft.contenido, instrucciones
        );

        let text_request = TextRequest::new(prompts::DRAFT_SYSTEM_PROMPT, prompt)
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.4);

        let contenido = self
            .backend
            .complete_text(text_request)
            .await
            .map_err(|e| DraftError::GenerationFailed(e.to_string()))?;

        // The draft id is stable across iterations; only content changes.
        Ok(Draft {
            id: draft.id.clone(),
            contenido,
            generado_at: draft.generado_at,
        })
    }
}
