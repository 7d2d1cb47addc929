//! Nombres y argumentos renderizados que ve el backend.
//!
//! Funciones puras: no tocan contexto ni sink, así que se testean aisladas.
use log::warn;

use crate::constants::{DEFAULT_EMBEDDING_NAME, DOC_STRING_DECORATOR, HOOK_NAME_PREFIX, TABLE_LINE_BREAK,
                       TABLE_SEPARATOR};
use crate::event::{PickleArgument, PickleStep, Status, TestStep};
use crate::sink::LogLevel;

/// `prefix + infix + text + suffix`, con prefijo y sufijo opcionales.
pub fn build_name(prefix: Option<&str>, infix: &str, text: &str, suffix: Option<&str>) -> String {
    let mut name = String::with_capacity(prefix.map_or(0, str::len) + infix.len() + text.len()
                                         + suffix.map_or(0, str::len));
    name.push_str(prefix.unwrap_or_default());
    name.push_str(infix);
    name.push_str(text);
    name.push_str(suffix.unwrap_or_default());
    name
}

/// Renderiza el argumento multilínea de un step.
///
/// Una tabla se emite como filas `| a | b |` terminadas en CRLF (precedidas
/// de un CRLF inicial); un doc string se envuelve en `"""`. Sin argumento, o
/// con un doc string vacío, el resultado es la cadena vacía.
pub fn render_argument(step: &PickleStep) -> String {
    let mut out = String::new();
    match &step.argument {
        Some(PickleArgument::DataTable { rows }) => {
            out.push_str(TABLE_LINE_BREAK);
            for row in rows {
                out.push_str(TABLE_SEPARATOR);
                for cell in row {
                    out.push(' ');
                    out.push_str(cell);
                    out.push(' ');
                    out.push_str(TABLE_SEPARATOR);
                }
                out.push_str(TABLE_LINE_BREAK);
            }
        }
        Some(PickleArgument::DocString { content, .. }) if !content.is_empty() => {
            out.push_str(DOC_STRING_DECORATOR);
            out.push_str(content);
            out.push_str(DOC_STRING_DECORATOR);
        }
        _ => {}
    }
    out
}

/// Nombre de un step ejecutado: `"Hook: BEFORE"` para hooks, el texto del
/// pickle en otro caso.
pub fn step_display_name(step: &TestStep) -> String {
    match step {
        TestStep::Hook(hook) => format!("{HOOK_NAME_PREFIX}{}", hook.hook_type),
        TestStep::Pickle(pickle) => pickle.step.text.clone(),
    }
}

/// Nivel de log derivado de un estado (sin distinguir mayúsculas).
pub fn map_level(status: &str) -> LogLevel {
    if status.eq_ignore_ascii_case("passed") {
        LogLevel::Info
    } else if status.eq_ignore_ascii_case("skipped") {
        LogLevel::Warn
    } else {
        LogLevel::Error
    }
}

impl Status {
    pub fn level(&self) -> LogLevel {
        map_level(self.as_str())
    }
}

/// Nombre del log de un adjunto: el tipo de primer nivel del media type
/// (`"image"` para `"image/png"`).
///
/// Si el media type no tiene la forma `tipo/subtipo` se usa el nombre
/// genérico y se deja un aviso; nunca falla.
pub fn media_type_name(media_type: &str) -> String {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((top, sub)) if is_token(top) && is_token(sub) => top.to_ascii_lowercase(),
        _ => {
            warn!("embed:media_type unparsable value={media_type:?}, using {DEFAULT_EMBEDDING_NAME:?}");
            DEFAULT_EMBEDDING_NAME.to_string()
        }
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
    && s.chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
}
