/// parse a task document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values, and turn it into the settings of a polynomial analysis.
///
/// Recognised sections and keys (all optional, defaults in brackets):
/// ```text
/// function    expression: 3x^3-4x^1+2   merge: overwrite|accumulate   derive: 0
/// domain      start: -100   end: 100   step: 0.01   collapse: false
/// refinement  method: none|bisection|newton   tolerance: 1e-10   max_iterations: 100
/// logging     loglevel: off|error|warn|info|debug   logfile: false
/// ```
/// Values end at a comma, whitespace or `;`, so expressions are written without spaces.
/// Lines starting with `//`, `#`, `%` or `;` are comments.
use crate::Utils::logger::level_from_str;
use crate::numerical::bracket_refine::{RefineConfig, Refinement};
use crate::numerical::poly_scan::ScanDomain;
use crate::symbolic::parse_poly::TermMerge;
use log::LevelFilter;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{consumed, map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

pub type SectionMap = HashMap<String, Field>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// values of one key together with the text they were read from
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub raw: String,
    pub values: Vec<Value>,
}

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

/// Error types for reading a task document
#[derive(Debug)]
pub enum TaskError {
    Io(std::io::Error),
    Syntax(String),
    UnknownSection(String),
    UnknownKey {
        section: String,
        key: String,
    },
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
    InvalidDomain(ScanDomain),
}

impl Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Io(e) => write!(f, "cannot read task file: {}", e),
            TaskError::Syntax(msg) => write!(f, "task syntax error: {}", msg),
            TaskError::UnknownSection(title) => write!(f, "unknown section '{}'", title),
            TaskError::UnknownKey { section, key } => {
                write!(f, "unknown key '{}' in section '{}'", key, section)
            }
            TaskError::InvalidValue {
                section,
                key,
                value,
            } => write!(
                f,
                "invalid value '{}' for key '{}' in section '{}'",
                value, key, section
            ),
            TaskError::InvalidDomain(domain) => write!(
                f,
                "invalid scan domain [{}, {}] with step {}",
                domain.start, domain.end, domain.step
            ),
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TaskError {
    fn from(e: std::io::Error) -> Self {
        TaskError::Io(e)
    }
}

/// Parses a title (word characters without spaces)
pub fn parse_title(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

/// Parses a key (word characters without spaces)
pub fn parse_key(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// Parses a single value, trying integer, float and boolean before falling back to a string
pub fn parse_value(input: &str) -> IResult<&str, Value> {
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

/// comma separated values
pub fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// Parses a key-value pair where value is a list
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Field)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, consumed(parse_value_list));
    let (input, (key, (raw, values))) = parser.parse(input)?;
    let field = Field {
        raw: raw.trim().to_string(),
        values,
    };
    Ok((input.trim(), (key, field)))
}

/// Parses a section with a title and multiple key-value pairs
pub fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Filters out comment lines (starting with //, #, %, or ;) and empty lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a HashMap
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;
    Ok((input, sections.into_iter().collect()))
}

/// Parses a whole document (comments removed); leftover text is an error
pub fn parse_task_document(input: &str) -> Result<DocumentMap, TaskError> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Ok(DocumentMap::new());
    }
    match parse_document(filtered.trim_start()) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(TaskError::Syntax(format!(
                    "failed to parse entire document, remaining: '{}'",
                    remaining
                )));
            }
            Ok(parsed)
        }
        Err(e) => Err(TaskError::Syntax(format!("{:?}", e))),
    }
}

/// Settings of one polynomial analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTask {
    pub expression: String,
    pub merge: TermMerge,
    /// how many times the function is differentiated before the analysis
    pub derive: usize,
    pub domain: ScanDomain,
    /// fold runs of adjacent reported points into one
    pub collapse: bool,
    pub refinement: Refinement,
    pub refine_config: RefineConfig,
    pub log_level: LevelFilter,
    pub log_to_file: bool,
}

impl Default for AnalysisTask {
    fn default() -> Self {
        Self {
            expression: "3x^3-4x^1+2".to_string(),
            merge: TermMerge::default(),
            derive: 0,
            domain: ScanDomain::default(),
            collapse: false,
            refinement: Refinement::default(),
            refine_config: RefineConfig::default(),
            log_level: LevelFilter::Info,
            log_to_file: false,
        }
    }
}

struct Entry<'a> {
    section: &'a str,
    key: &'a str,
    raw: &'a str,
    values: &'a [Value],
}

impl Entry<'_> {
    fn invalid(&self) -> TaskError {
        TaskError::InvalidValue {
            section: self.section.to_string(),
            key: self.key.to_string(),
            value: self
                .values
                .iter()
                .map(Value::to_string_value)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn unknown(&self) -> TaskError {
        TaskError::UnknownKey {
            section: self.section.to_string(),
            key: self.key.to_string(),
        }
    }

    fn single(&self) -> Result<&Value, TaskError> {
        match self.values {
            [value] => Ok(value),
            _ => Err(self.invalid()),
        }
    }

    /// the single value exactly as written, without numeric normalisation
    fn raw_text(&self) -> Result<String, TaskError> {
        self.single()?;
        Ok(self.raw.to_string())
    }

    fn text(&self) -> Result<String, TaskError> {
        Ok(self.single()?.to_string_value())
    }

    fn number(&self) -> Result<f64, TaskError> {
        self.single()?.as_float().ok_or_else(|| self.invalid())
    }

    fn count(&self) -> Result<usize, TaskError> {
        self.single()?
            .as_integer()
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| self.invalid())
    }

    fn flag(&self) -> Result<bool, TaskError> {
        self.single()?.as_boolean().ok_or_else(|| self.invalid())
    }

    fn parsed<T: FromStr>(&self) -> Result<T, TaskError> {
        T::from_str(&self.text()?.to_lowercase()).map_err(|_| self.invalid())
    }
}

impl AnalysisTask {
    /// Reads the task from document text; keys not given keep their defaults
    pub fn from_document(input: &str) -> Result<Self, TaskError> {
        let document = parse_task_document(input)?;
        let mut task = Self::default();
        for (section, keys) in &document {
            for (key, field) in keys {
                let entry = Entry {
                    section,
                    key,
                    raw: &field.raw,
                    values: &field.values,
                };
                task.apply(&entry)?;
            }
        }
        if !task.domain.is_valid() {
            return Err(TaskError::InvalidDomain(task.domain));
        }
        Ok(task)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TaskError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_document(&content)
    }

    fn apply(&mut self, entry: &Entry) -> Result<(), TaskError> {
        match (entry.section, entry.key) {
            ("function", "expression") => self.expression = entry.raw_text()?,
            ("function", "merge") => self.merge = entry.parsed()?,
            ("function", "derive") => self.derive = entry.count()?,
            ("domain", "start") => self.domain.start = entry.number()?,
            ("domain", "end") => self.domain.end = entry.number()?,
            ("domain", "step") => self.domain.step = entry.number()?,
            ("domain", "collapse") => self.collapse = entry.flag()?,
            ("refinement", "method") => self.refinement = entry.parsed()?,
            ("refinement", "tolerance") => self.refine_config.tolerance = entry.number()?,
            ("refinement", "max_iterations") => {
                self.refine_config.max_iterations = entry.count()?
            }
            ("logging", "loglevel") => {
                self.log_level = level_from_str(&entry.text()?).ok_or_else(|| entry.invalid())?
            }
            ("logging", "logfile") => self.log_to_file = entry.flag()?,
            ("function" | "domain" | "refinement" | "logging", _) => return Err(entry.unknown()),
            (section, _) => return Err(TaskError::UnknownSection(section.to_string())),
        }
        Ok(())
    }
}
