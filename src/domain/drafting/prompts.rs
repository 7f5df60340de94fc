//! System prompts and output schemas for the structured backend calls.
//!
//! Each drafting component pairs one domain system prompt with one strict
//! output schema; the backend must return an object conforming to the
//! schema. Prompts are in Spanish because the drafted document is.

use serde_json::{json, Value};

/// System prompt for demand parsing.
pub const PARSER_SYSTEM_PROMPT: &str = "\
Sos un asistente jurídico especializado en derecho procesal civil. \
Recibirás el texto completo de una demanda. Dividila en bloques \
argumentativos direccionables. Reglas estrictas: (1) preservá el contenido \
de cada bloque de forma literal, sin resumir ni reformular; (2) asigná a \
cada bloque un tipo: objeto, hechos, rubros, prueba, petitorio u otro; \
(3) asigná un orden entero estrictamente creciente según la aparición en \
el documento; (4) generá ids únicos con el formato bloque_N. Además \
detectá la categoría de la demanda (por ejemplo incumplimiento_locacion, \
desalojo, cobro_de_pesos, danos_y_perjuicios) y las pretensiones \
principales del actor.";

/// System prompt for per-block analysis.
pub const ANALYZER_SYSTEM_PROMPT: &str = "\
Sos un asistente jurídico que analiza demandas para preparar su \
contestación. Para cada bloque identificá: los argumentos clave del actor, \
los puntos débiles de su posición, la prueba implícita que el bloque \
sugiere, y sugerencias concretas de defensa. Devolvé exactamente un \
registro de análisis por bloque, referenciando su bloque_id.";

/// System prompt for question generation.
pub const QUESTION_SYSTEM_PROMPT: &str = "\
Sos un asistente que prepara preguntas aclaratorias para el abogado que \
contesta una demanda. Para cada bloque generá preguntas concretas que \
permitan fijar postura (admitir, negar, admitir parcialmente, negar con \
matices), reunir prueba y fundamentar. Cada pregunta referencia su \
bloque_id y lleva tipo: postura, prueba, fundamentacion u otro. Cuando \
ayude, incluí opciones sugeridas.";

/// System prompt for response consolidation.
pub const CONSOLIDATOR_SYSTEM_PROMPT: &str = "\
Sos un asistente que redacta las secciones canónicas de una contestación \
de demanda a partir de las respuestas del abogado bloque por bloque. \
Redactá cinco secciones: hechos_admitidos, hechos_negados, defensas \
(defensas de fondo), excepciones (excepciones procesales; cadena vacía si \
no corresponde ninguna) y prueba (un único ofrecimiento de prueba \
unificado y numerado que combine la prueba de todos los bloques). Usá \
lenguaje forense claro y no inventes hechos que no estén en las \
respuestas.";

/// System prompt for adaptive variant selection.
pub const SELECTOR_SYSTEM_PROMPT: &str = "\
Sos un asistente que elige la variante de plantilla de contestación más \
adecuada. Recibirás la categoría detectada de la demanda, los títulos de \
sus bloques y la lista de variantes disponibles. Elegí exactamente una \
variante de la lista; si ninguna encaja, devolvé cadena vacía.";

/// System prompt for the adaptive decision policy.
pub const DECISION_SYSTEM_PROMPT: &str = "\
Sos el orquestador de un flujo guiado de contestación de demanda. Según \
el resumen del estado de la sesión, elegí exactamente una próxima acción \
entre: analyze, generate_questions, wait_user, need_more_info y \
ready_for_redaction. Reglas en orden: (1) si hay bloques pero ningún \
análisis, elegí analyze; (2) si hay análisis pero no hay preguntas \
generadas, elegí generate_questions; (3) si hay preguntas pero faltan \
respuestas, elegí wait_user con un motivo legible; (4) si hay respuestas \
pero quedan sin responder bloques críticos (hechos, objeto o petitorio), \
elegí need_more_info nombrando los bloque_ids pendientes y el motivo; \
(5) si todos los bloques relevantes están suficientemente respondidos, \
elegí ready_for_redaction.";

/// System prompt for draft generation and iteration.
pub const DRAFT_SYSTEM_PROMPT: &str = "\
Sos un asistente que redacta el borrador de una contestación de demanda \
en estilo forense a partir de las secciones consolidadas y la variante de \
plantilla seleccionada. Mantené la estructura procesal habitual: \
encabezado, personería, contestación de los hechos, defensas, \
excepciones, prueba y petitorio.";

/// Schema for the parser's structured output.
pub fn parse_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "bloques": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "titulo": {"type": "string"},
                        "contenido": {"type": "string"},
                        "tipo": {
                            "type": "string",
                            "enum": ["objeto", "hechos", "rubros", "prueba", "petitorio", "otro"]
                        },
                        "orden": {"type": "integer", "minimum": 1}
                    },
                    "required": ["id", "titulo", "contenido", "tipo", "orden"]
                }
            },
            "categoria_detectada": {"type": ["string", "null"]},
            "pretensiones_principales": {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": ["bloques"]
    })
}

/// Schema for the analyzer's structured output.
pub fn analysis_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "analisis": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "bloque_id": {"type": "string"},
                        "argumentos_clave": {"type": "array", "items": {"type": "string"}},
                        "puntos_debiles": {"type": "array", "items": {"type": "string"}},
                        "prueba_implicita": {"type": "array", "items": {"type": "string"}},
                        "sugerencias_defensa": {"type": "array", "items": {"type": "string"}}
                    },
                    "required": ["bloque_id"]
                }
            }
        },
        "required": ["analisis"]
    })
}

/// Schema for the question generator's structured output.
pub fn questions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "preguntas": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "bloque_id": {"type": "string"},
                        "pregunta": {"type": "string"},
                        "tipo": {
                            "type": "string",
                            "enum": ["postura", "prueba", "fundamentacion", "otro"]
                        },
                        "opciones_sugeridas": {
                            "type": "array",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["bloque_id", "pregunta", "tipo"]
                }
            }
        },
        "required": ["preguntas"]
    })
}

/// Schema for the consolidator's structured output.
pub fn consolidation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "hechos_admitidos": {"type": "string"},
            "hechos_negados": {"type": "string"},
            "defensas": {"type": "string"},
            "excepciones": {"type": "string"},
            "prueba": {"type": "string"}
        },
        "required": ["hechos_admitidos", "hechos_negados", "defensas", "excepciones", "prueba"]
    })
}

/// Schema for the selector's structured output.
pub fn selection_schema(available: &[String]) -> Value {
    json!({
        "type": "object",
        "properties": {
            "variante": {
                "type": "string",
                "description": "Una de las variantes disponibles, o cadena vacía",
                "enum": available
                    .iter()
                    .cloned()
                    .chain(std::iter::once(String::new()))
                    .collect::<Vec<_>>()
            }
        },
        "required": ["variante"]
    })
}

/// Schema for the adaptive decision policy's structured output.
pub fn decision_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "accion": {
                "type": "string",
                "enum": [
                    "analyze",
                    "generate_questions",
                    "wait_user",
                    "need_more_info",
                    "ready_for_redaction"
                ]
            },
            "motivo": {"type": "string"},
            "bloque_ids": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["accion"]
    })
}
