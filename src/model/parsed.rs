use serde::{Deserialize, Serialize};
use std::fmt;

/// Language dialect of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    TypeScript,
    TypeScriptReact,
    JavaScript,
    JavaScriptReact,
    JavaScriptModule,
    JavaScriptCommonJs,
}

impl Language {
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with(".tsx") {
            Some(Language::TypeScriptReact)
        } else if path.ends_with(".ts") {
            Some(Language::TypeScript)
        } else if path.ends_with(".jsx") {
            Some(Language::JavaScriptReact)
        } else if path.ends_with(".js") {
            Some(Language::JavaScript)
        } else if path.ends_with(".mjs") {
            Some(Language::JavaScriptModule)
        } else if path.ends_with(".cjs") {
            Some(Language::JavaScriptCommonJs)
        } else {
            None
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Language::TypeScript => "TypeScript",
            Language::TypeScriptReact => "TypeScript React",
            Language::JavaScript => "JavaScript",
            Language::JavaScriptReact => "JavaScript React",
            Language::JavaScriptModule => "JavaScript Module",
            Language::JavaScriptCommonJs => "JavaScript CommonJS",
        };
        write!(f, "{}", label)
    }
}

/// A single imported binding. The variant records how the binding was
/// declared, so edge styling can check for default imports without string
/// sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "binding", content = "name", rename_all = "snake_case")]
pub enum Specifier {
    Default(String),
    Namespace(String),
    Named(String),
}

impl Specifier {
    pub fn name(&self) -> &str {
        match self {
            Specifier::Default(name) | Specifier::Namespace(name) | Specifier::Named(name) => name,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Specifier::Default(_))
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specifier::Namespace(name) => write!(f, "* as {}", name),
            Specifier::Default(name) | Specifier::Named(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Import,
    Require,
}

/// One import statement: `import ... from "source"` or
/// `const x = require("source")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStatement {
    pub source: String,
    pub specifiers: Vec<Specifier>,
    pub kind: ImportKind,
}

impl ImportStatement {
    pub fn has_default_import(&self) -> bool {
        self.specifiers.iter().any(|s| s.is_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Default,
    Named,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStatement {
    pub name: String,
    pub kind: ExportKind,
}

/// Inventory extracted from a successfully parsed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSource {
    pub imports: Vec<ImportStatement>,
    pub exports: Vec<ExportStatement>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseOutcome {
    Parsed(ParsedSource),
    Failed { error: String },
}

/// Result of parsing one file. Created once per fetched file and immutable
/// afterwards; failures carry the parser's error message instead of
/// aborting the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    pub outcome: ParseOutcome,
}

impl ParsedFile {
    pub fn parsed(path: impl Into<String>, source: ParsedSource) -> Self {
        Self {
            path: path.into(),
            outcome: ParseOutcome::Parsed(source),
        }
    }

    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            outcome: ParseOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn source(&self) -> Option<&ParsedSource> {
        match &self.outcome {
            ParseOutcome::Parsed(source) => Some(source),
            ParseOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ParseOutcome::Parsed(_) => None,
            ParseOutcome::Failed { error } => Some(error),
        }
    }
}
