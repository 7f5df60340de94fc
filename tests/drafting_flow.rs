//! Integration tests for the guided contestación drafting flow.
//!
//! These tests drive the full happy path end-to-end:
//! 1. Parse the demand text into addressable blocks
//! 2. Analyze each block and generate clarifying questions
//! 3. Record the professional's per-block responses
//! 4. Consolidate responses into the canonical form fields
//! 5. Select a template variant, generate and iterate the draft
//!
//! Uses the scripted mock backend, so no external services are involved.
//! Between steps the session state is serialized and reloaded, matching
//! how a real deployment persists the session between invocations.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use contestia::adapters::ai::MockBackend;
use contestia::adapters::drafting::{BackendDraftGenerator, StaticVariantRegistry};
use contestia::domain::demanda::{BlockResponse, Postura};
use contestia::domain::drafting::{
    ContestacionSessionState, DraftingOrchestrator, OrchestratorAction, OrchestratorInput,
    RulePolicy,
};
use contestia::domain::foundation::BlockId;

const DEMAND_TEXT: &str = "\
OBJETO: Promuevo demanda de desalojo contra el locatario.
HECHOS: El demandado adeuda seis meses de alquiler.
PETITORIO: Solicito se ordene el desalojo y el pago de lo adeudado.";

fn scripted_backend() -> Arc<MockBackend> {
    Arc::new(
        MockBackend::new()
            // parse
            .with_structured_response(json!({
                "bloques": [
                    {"id": "bloque_1", "titulo": "Objeto", "contenido": "Promuevo demanda de desalojo contra el locatario.", "tipo": "objeto", "orden": 1},
                    {"id": "bloque_2", "titulo": "Hechos", "contenido": "El demandado adeuda seis meses de alquiler.", "tipo": "hechos", "orden": 2},
                    {"id": "bloque_3", "titulo": "Petitorio", "contenido": "Solicito se ordene el desalojo y el pago de lo adeudado.", "tipo": "petitorio", "orden": 3}
                ],
                "categoria_detectada": "desalojo",
                "pretensiones_principales": ["Desalojo del inmueble", "Cobro de alquileres adeudados"]
            }))
            // analyze
            .with_structured_response(json!({
                "analisis": [
                    {"bloque_id": "bloque_1", "argumentos_clave": ["Relación locativa vigente"]},
                    {"bloque_id": "bloque_2", "puntos_debiles": ["No acompaña intimación previa"],
                     "sugerencias_defensa": ["Acreditar pagos parciales"]},
                    {"bloque_id": "bloque_3", "argumentos_clave": ["Pide desalojo y cobro"]}
                ]
            }))
            // generate_questions
            .with_structured_response(json!({
                "preguntas": [
                    {"bloque_id": "bloque_1", "pregunta": "¿Reconoce la relación locativa?", "tipo": "postura",
                     "opciones_sugeridas": ["Admitir", "Negar"]},
                    {"bloque_id": "bloque_2", "pregunta": "¿Admite la deuda de alquileres?", "tipo": "postura"},
                    {"bloque_id": "bloque_3", "pregunta": "¿Qué prueba ofrece contra el petitorio?", "tipo": "prueba"}
                ]
            }))
            // consolidate
            .with_structured_response(json!({
                "hechos_admitidos": "Se admite la existencia del contrato de locación.",
                "hechos_negados": "Se niega la mora invocada: los períodos reclamados fueron abonados.",
                "defensas": "Pago parcial documentado y falta de intimación previa.",
                "excepciones": "",
                "prueba": "1. Recibos de pago. 2. Pericial contable."
            }))
            // generate_draft
            .with_text_response("CONTESTA DEMANDA. I. PERSONERÍA. II. HECHOS. Niego la mora...")
            // iterate_draft
            .with_text_response("CONTESTA DEMANDA. I. PERSONERÍA. II. HECHOS. Niego la mora... III. EXCEPCIÓN DE PAGO."),
    )
}

fn orchestrator(backend: Arc<MockBackend>) -> DraftingOrchestrator {
    let registry = Arc::new(StaticVariantRegistry::new(
        "contestacion",
        vec!["desalojo".to_string(), "cobro_de_pesos".to_string()],
    ));
    let draft_generator = Arc::new(BackendDraftGenerator::new(backend.clone()));
    DraftingOrchestrator::new(backend, Arc::new(RulePolicy::new()), registry, draft_generator)
}

/// Serializes and reloads the session, as a real caller would between steps.
fn persist_round_trip(state: &ContestacionSessionState) -> ContestacionSessionState {
    let blob = serde_json::to_string(state).expect("session must serialize");
    serde_json::from_str(&blob).expect("session must deserialize")
}

#[tokio::test]
async fn test_full_drafting_flow() {
    let backend = scripted_backend();
    let orchestrator = orchestrator(backend.clone());

    // Step 0: with no session and no text, the policy asks for the text.
    let action = orchestrator.decide(None, &OrchestratorInput::default()).await;
    assert!(matches!(action, OrchestratorAction::WaitUser { .. }));

    // Step 1: with text available the policy starts the parse.
    let input = OrchestratorInput::with_text(DEMAND_TEXT);
    let action = orchestrator.decide(None, &input).await;
    assert_eq!(action, OrchestratorAction::Parse);

    let state = orchestrator.execute_action(&action, None, &input).await;
    assert_eq!(state.bloques.len(), 3);
    assert_eq!(state.categoria_detectada.as_deref(), Some("desalojo"));
    assert_eq!(state.bloques_sin_respuesta.len(), 3);
    let state = persist_round_trip(&state);

    // Step 2: analyze every block.
    let state = orchestrator
        .execute_action(&OrchestratorAction::Analyze, Some(&state), &input)
        .await;
    assert_eq!(state.analisis_por_bloque.len(), 3);
    let analysis = &state.analisis_por_bloque[&BlockId::new("bloque_2")];
    assert_eq!(analysis.puntos_debiles, vec!["No acompaña intimación previa"]);
    let state = persist_round_trip(&state);

    // Step 3: generate questions for all blocks.
    let state = orchestrator
        .execute_action(
            &OrchestratorAction::GenerateQuestions { bloque_ids: None },
            Some(&state),
            &input,
        )
        .await;
    assert_eq!(state.preguntas_generadas.len(), 3);
    let state = persist_round_trip(&state);

    // Step 4: the professional answers block by block.
    let mut responses = HashMap::new();
    responses.insert(
        BlockId::new("bloque_1"),
        BlockResponse::new("bloque_1", Postura::Admitir),
    );
    responses.insert(
        BlockId::new("bloque_2"),
        BlockResponse::new("bloque_2", Postura::Negar)
            .with_fundamentacion("Los alquileres fueron abonados en efectivo")
            .with_prueba(vec!["Recibos de pago".to_string()]),
    );
    responses.insert(
        BlockId::new("bloque_3"),
        BlockResponse::new("bloque_3", Postura::NegarConMatices),
    );
    let state = orchestrator
        .record_responses(&state, responses)
        .expect("all responses target known blocks");
    assert!(state.bloques_sin_respuesta.is_empty());
    assert!(state.all_blocks_answered());
    let state = persist_round_trip(&state);

    // Step 5: consolidate into the canonical fields.
    let state = orchestrator
        .execute_action(&OrchestratorAction::ReadyForRedaction, Some(&state), &input)
        .await;
    assert!(state.listo_para_redaccion);
    let datos = state.datos_consolidados.as_ref().expect("consolidated data");
    assert!(datos.hechos_negados.contains("Se niega la mora"));
    assert_eq!(datos.excepciones, "");
    let state = persist_round_trip(&state);

    // Step 6: select the template variant (direct category match).
    let state = orchestrator
        .execute_action(&OrchestratorAction::SelectStructure, Some(&state), &input)
        .await;
    assert_eq!(state.variante_seleccionada.as_deref(), Some("desalojo"));
    let state = persist_round_trip(&state);

    // Step 7: generate the first draft.
    let state = orchestrator
        .execute_action(&OrchestratorAction::GenerateDraft, Some(&state), &input)
        .await;
    assert!(state.borrador_id.is_some());
    assert!(state
        .borrador_contenido
        .as_deref()
        .expect("draft content")
        .starts_with("CONTESTA DEMANDA"));
    let state = persist_round_trip(&state);

    // Step 8: iterate following the professional's instructions.
    let state = orchestrator
        .execute_action(
            &OrchestratorAction::IterateDraft {
                instrucciones: Some("Agregá la excepción de pago".to_string()),
            },
            Some(&state),
            &input,
        )
        .await;
    assert!(state
        .borrador_contenido
        .as_deref()
        .expect("iterated content")
        .contains("EXCEPCIÓN DE PAGO"));
    assert!(state.ultima_iteracion_at.is_some());

    // The scripted backend was fully consumed in order.
    assert_eq!(backend.structured_calls().len(), 4);
    assert_eq!(backend.text_calls().len(), 2);
}

#[tokio::test]
async fn test_flow_degrades_when_backend_goes_down_mid_session() {
    // Parse succeeds, then the provider goes down for analysis.
    let backend = Arc::new(
        MockBackend::new()
            .with_structured_response(json!({
                "bloques": [
                    {"id": "bloque_1", "titulo": "Hechos", "contenido": "...", "tipo": "hechos", "orden": 1}
                ]
            }))
            .with_unavailable("provider down"),
    );
    let orchestrator = orchestrator(backend);
    let input = OrchestratorInput::with_text(DEMAND_TEXT);

    let state = orchestrator
        .execute_action(&OrchestratorAction::Parse, None, &input)
        .await;
    assert_eq!(state.bloques.len(), 1);

    // Analysis degrades to no analysis records; the session stays usable.
    let state = orchestrator
        .execute_action(&OrchestratorAction::Analyze, Some(&state), &input)
        .await;
    assert!(state.analisis_por_bloque.is_empty());
    assert_eq!(state.bloques.len(), 1);
    persist_round_trip(&state);
}

#[tokio::test]
async fn test_unparseable_demand_still_yields_a_workable_session() {
    // Backend returns zero blocks; the parser falls back to a single
    // full-content block so the flow can continue.
    let backend = Arc::new(MockBackend::new().with_structured_response(json!({"bloques": []})));
    let orchestrator = orchestrator(backend);
    let input = OrchestratorInput::with_text(DEMAND_TEXT);

    let state = orchestrator
        .execute_action(&OrchestratorAction::Parse, None, &input)
        .await;

    assert_eq!(state.bloques.len(), 1);
    assert_eq!(state.bloques[0].id, BlockId::new("bloque_1"));
    assert_eq!(state.bloques[0].titulo, "Contenido completo");
    assert!(state.bloques[0].contenido.contains("OBJETO"));
}
