//! Constantes del reporter.
//!
//! Agrupa los literales que forman parte del contrato visible: nombres de
//! items, separadores y decoradores de argumentos. Cambiarlos altera el
//! árbol que ve el backend de reporting.

/// Separador entre keyword y nombre (`"Feature: Login"`).
pub const COLON_INFIX: &str = ": ";

/// Nombre del log de un adjunto cuyo media type no se pudo resolver.
pub const DEFAULT_EMBEDDING_NAME: &str = "embedding";

/// Prefijo del nombre de un step de hook.
pub const HOOK_NAME_PREFIX: &str = "Hook: ";

pub const TABLE_SEPARATOR: &str = "|";
pub const TABLE_LINE_BREAK: &str = "\r\n";
pub const DOC_STRING_DECORATOR: &str = "\n\"\"\"\n";

/// Nombre de launch cuando la configuración no define uno.
pub const DEFAULT_LAUNCH_NAME: &str = "cukeport";
