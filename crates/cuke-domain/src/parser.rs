// parser.rs
//! Parser Gherkin orientado a líneas.
//!
//! Cubre el subconjunto que necesita el índice estructural: tags,
//! `Feature`, descripciones libres, `Background`, `Scenario`/`Example`,
//! `Scenario Outline`/`Scenario Template`, `Examples`/`Scenarios`, steps con
//! data tables y doc strings. Sólo keywords en inglés; la cabecera
//! `# language:` se trata como un comentario más.
use crate::error::ParseError;
use crate::feature::{Background, Examples, Feature, FeatureChild, GherkinDocument, Scenario, Tag};
use crate::step::{DocString, Step, StepArgument, TableRow};

const STEP_KEYWORDS: [&str; 6] = ["Given ", "When ", "Then ", "And ", "But ", "* "];
const DOC_STRING_FENCES: [&str; 2] = ["\"\"\"", "```"];
const BLOCK_KEYWORDS: [&str; 9] = ["Feature",
                                   "Background",
                                   "Scenario",
                                   "Example",
                                   "Scenario Outline",
                                   "Scenario Template",
                                   "Examples",
                                   "Scenarios",
                                   "Rule"];

/// Parsea el texto completo de un fichero `.feature`.
///
/// # Errores
/// Devuelve `ParseError` con la línea del primer problema encontrado; no
/// intenta recuperarse.
pub fn parse(source: &str) -> Result<GherkinDocument, ParseError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut parser = LineParser::default();
    for (idx, raw) in source.lines().enumerate() {
        parser.feed(idx + 1, raw)?;
    }
    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Feature,
    Background,
    Scenario,
    Examples,
}

#[derive(Debug)]
struct OpenDocString {
    line: usize,
    delimiter: &'static str,
    indent: usize,
    media_type: Option<String>,
    lines: Vec<String>,
}

#[derive(Debug, Default)]
struct LineParser {
    feature: Option<Feature>,
    section: Option<Section>,
    pending_tags: Vec<Tag>,
    doc_string: Option<OpenDocString>,
}

impl LineParser {
    fn feed(&mut self, line: usize, raw: &str) -> Result<(), ParseError> {
        if self.doc_string.is_some() {
            return self.feed_doc_string(raw);
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        if trimmed.starts_with('@') {
            return self.push_tags(line, trimmed);
        }
        // En la cabecera del feature sólo un keyword de bloque cierra la
        // descripción; steps, filas y fences son prosa.
        if self.section == Some(Section::Feature) && split_block_keyword(trimmed).is_none() {
            return self.push_description(line, trimmed);
        }
        if trimmed.starts_with('|') {
            let cells = parse_row(line, trimmed)?;
            return self.push_row(TableRow::new(line, cells));
        }
        if let Some(fence) = DOC_STRING_FENCES.iter().find(|f| trimmed.starts_with(**f)) {
            return self.open_doc_string(line, raw, *fence);
        }
        if let Some((keyword, name)) = split_block_keyword(trimmed) {
            return self.push_block(line, keyword, name);
        }
        if let Some(keyword) = STEP_KEYWORDS.iter().find(|k| trimmed.starts_with(**k)) {
            return self.push_step(line, keyword, &trimmed[keyword.len()..]);
        }
        self.push_description(line, trimmed)
    }

    fn finish(self) -> Result<GherkinDocument, ParseError> {
        if let Some(doc) = self.doc_string {
            return Err(ParseError::UnterminatedDocString { line: doc.line });
        }
        Ok(GherkinDocument { feature: self.feature })
    }

    fn push_tags(&mut self, line: usize, trimmed: &str) -> Result<(), ParseError> {
        for token in trimmed.split_whitespace() {
            if token.starts_with('#') {
                break;
            }
            if !token.starts_with('@') || token.len() == 1 {
                return Err(ParseError::InvalidTag { line,
                                                    tag: token.to_string() });
            }
            self.pending_tags.push(Tag { line,
                                         name: token.to_string() });
        }
        Ok(())
    }

    fn push_block(&mut self, line: usize, keyword: &str, name: &str) -> Result<(), ParseError> {
        if keyword == "Rule" {
            return Err(ParseError::UnsupportedRule { line });
        }
        if keyword == "Feature" {
            if self.feature.is_some() {
                return Err(ParseError::DuplicateFeature { line });
            }
            self.feature = Some(Feature { line,
                                          keyword: keyword.to_string(),
                                          name: name.to_string(),
                                          description: None,
                                          tags: std::mem::take(&mut self.pending_tags),
                                          children: Vec::new() });
            self.section = Some(Section::Feature);
            return Ok(());
        }

        let tags = std::mem::take(&mut self.pending_tags);
        let section = self.section;
        let feature = self.feature
                          .as_mut()
                          .ok_or_else(|| unexpected(line, keyword))?;

        match keyword {
            "Background" => {
                feature.children.push(FeatureChild::Background(Background { line,
                                                                            keyword: keyword.to_string(),
                                                                            name: name.to_string(),
                                                                            steps: Vec::new() }));
                self.section = Some(Section::Background);
            }
            "Examples" | "Scenarios" => {
                let in_scenario = matches!(section, Some(Section::Scenario | Section::Examples));
                match feature.children.last_mut() {
                    Some(FeatureChild::Scenario(scenario)) if in_scenario => {
                        scenario.examples.push(Examples { line,
                                                          keyword: keyword.to_string(),
                                                          name: name.to_string(),
                                                          tags,
                                                          header: None,
                                                          body: Vec::new() });
                    }
                    _ => return Err(unexpected(line, keyword)),
                }
                self.section = Some(Section::Examples);
            }
            _ => {
                feature.children.push(FeatureChild::Scenario(Scenario { line,
                                                                        keyword: keyword.to_string(),
                                                                        name: name.to_string(),
                                                                        description: None,
                                                                        tags,
                                                                        steps: Vec::new(),
                                                                        examples: Vec::new() }));
                self.section = Some(Section::Scenario);
            }
        }
        Ok(())
    }

    fn push_step(&mut self, line: usize, keyword: &str, text: &str) -> Result<(), ParseError> {
        let steps = match (self.section, self.feature.as_mut().and_then(|f| f.children.last_mut())) {
            (Some(Section::Background), Some(FeatureChild::Background(bg))) => &mut bg.steps,
            (Some(Section::Scenario), Some(FeatureChild::Scenario(s))) => &mut s.steps,
            _ => return Err(unexpected(line, keyword.trim_end())),
        };
        steps.push(Step::new(line, keyword, text.trim()));
        Ok(())
    }

    fn push_row(&mut self, row: TableRow) -> Result<(), ParseError> {
        let line = row.line;
        if self.section == Some(Section::Examples) {
            let examples = match self.feature.as_mut().and_then(|f| f.children.last_mut()) {
                Some(FeatureChild::Scenario(s)) => s.examples.last_mut(),
                _ => None,
            };
            let examples = examples.ok_or_else(|| unexpected(line, "|"))?;
            match examples.header.as_ref().map(|h| h.cells.len()) {
                None => examples.header = Some(row),
                Some(width) => {
                    check_width(width, &row)?;
                    examples.body.push(row);
                }
            }
            return Ok(());
        }

        let step = self.last_step_mut().ok_or_else(|| unexpected(line, "|"))?;
        if step.argument.is_none() {
            step.argument = Some(StepArgument::DataTable(vec![row]));
            return Ok(());
        }
        match &mut step.argument {
            Some(StepArgument::DataTable(rows)) => {
                if let Some(first) = rows.first() {
                    check_width(first.cells.len(), &row)?;
                }
                rows.push(row);
            }
            _ => return Err(unexpected(line, "|")),
        }
        Ok(())
    }

    fn open_doc_string(&mut self, line: usize, raw: &str, fence: &'static str) -> Result<(), ParseError> {
        let free_step = self.last_step_mut().map(|s| s.argument.is_none()).unwrap_or(false);
        if !free_step {
            return Err(unexpected(line, fence));
        }
        let trimmed = raw.trim();
        let media_type = trimmed[fence.len()..].trim();
        self.doc_string = Some(OpenDocString { line,
                                               delimiter: fence,
                                               indent: raw.chars().take_while(|c| c.is_whitespace()).count(),
                                               media_type: (!media_type.is_empty()).then(|| media_type.to_string()),
                                               lines: Vec::new() });
        Ok(())
    }

    fn feed_doc_string(&mut self, raw: &str) -> Result<(), ParseError> {
        let Some(mut doc) = self.doc_string.take() else {
            return Ok(());
        };
        if raw.trim() != doc.delimiter {
            let content = strip_indent(raw, doc.indent);
            let escaped: String = doc.delimiter.chars().flat_map(|c| ['\\', c]).collect();
            doc.lines.push(content.replace(&escaped, doc.delimiter));
            self.doc_string = Some(doc);
            return Ok(());
        }

        let line = doc.line;
        let delimiter = doc.delimiter;
        let argument = StepArgument::DocString(DocString { line,
                                                           delimiter: doc.delimiter.to_string(),
                                                           media_type: doc.media_type,
                                                           content: doc.lines.join("\n") });
        let step = self.last_step_mut().ok_or_else(|| unexpected(line, delimiter))?;
        step.argument = Some(argument);
        Ok(())
    }

    fn push_description(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        let feature = self.feature.as_mut().ok_or_else(|| unexpected(line, text))?;
        match (self.section, feature.children.last_mut()) {
            (Some(Section::Feature), _) => append_line(&mut feature.description, text),
            (Some(Section::Scenario), Some(FeatureChild::Scenario(s))) if s.steps.is_empty() => {
                append_line(&mut s.description, text)
            }
            (Some(Section::Background), Some(FeatureChild::Background(bg))) if bg.steps.is_empty() => {}
            (Some(Section::Examples), Some(FeatureChild::Scenario(s)))
                if s.examples.last().map(|e| e.header.is_none()).unwrap_or(false) => {}
            _ => return Err(unexpected(line, text)),
        }
        Ok(())
    }

    fn last_step_mut(&mut self) -> Option<&mut Step> {
        let section = self.section?;
        match (section, self.feature.as_mut()?.children.last_mut()?) {
            (Section::Background, FeatureChild::Background(bg)) => bg.steps.last_mut(),
            (Section::Scenario, FeatureChild::Scenario(s)) => s.steps.last_mut(),
            _ => None,
        }
    }
}

fn unexpected(line: usize, found: &str) -> ParseError {
    ParseError::UnexpectedLine { line,
                                 found: found.to_string() }
}

fn split_block_keyword(trimmed: &str) -> Option<(&str, &str)> {
    let (keyword, rest) = trimmed.split_once(':')?;
    let keyword = keyword.trim_end();
    BLOCK_KEYWORDS.contains(&keyword).then(|| (keyword, rest.trim()))
}

fn check_width(expected: usize, row: &TableRow) -> Result<(), ParseError> {
    if row.cells.len() != expected {
        return Err(ParseError::InconsistentCells { line: row.line,
                                                   expected,
                                                   found: row.cells.len() });
    }
    Ok(())
}

fn append_line(target: &mut Option<String>, text: &str) {
    match target {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => *target = Some(text.to_string()),
    }
}

fn strip_indent(raw: &str, indent: usize) -> String {
    let skip = raw.chars().take(indent).take_while(|c| c.is_whitespace()).count();
    raw.chars().skip(skip).collect()
}

/// Separa una fila `| a | b |` en celdas, resolviendo los escapes `\|`,
/// `\n` y `\\`.
fn parse_row(line: usize, trimmed: &str) -> Result<Vec<String>, ParseError> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = trimmed.chars().skip(1);
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some('n') => cell.push('\n'),
                Some('\\') => cell.push('\\'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => {
                cells.push(cell.trim().to_string());
                cell.clear();
            }
            _ => cell.push(c),
        }
    }
    if !cell.trim().is_empty() {
        return Err(unexpected(line, trimmed));
    }
    Ok(cells)
}
