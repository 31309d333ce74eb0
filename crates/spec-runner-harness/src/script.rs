//! Spec-test script model and loader.
//!
//! Scripts use the JSON layout produced by `wast2json`:
//!
//! ```json
//! {
//!   "source_filename": "i32.wast",
//!   "commands": [
//!     {"type": "module", "line": 3, "filename": "i32.0.wasm"},
//!     {"type": "assert_return", "line": 10,
//!      "action": {"type": "invoke", "field": "add",
//!                 "args": [{"type": "i32", "value": "1"}, {"type": "i32", "value": "1"}]},
//!      "expected": [{"type": "i32", "value": "2"}]}
//!   ]
//! }
//! ```
//!
//! Type tags are kept open: an unknown command or action tag still parses,
//! and only fails once the interpreter reaches it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use spec_runner_common::HarnessError;

/// A parsed test script.
#[derive(Debug, Clone, Deserialize)]
pub struct TestScript {
    /// Name of the `.wast` file the script was generated from.
    #[serde(default)]
    pub source_filename: String,

    /// Commands in file order.
    pub commands: Vec<Command>,

    /// Directory module filenames are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl TestScript {
    /// Load a script from a JSON file.
    ///
    /// Module files named by the script resolve relative to the script's own
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid script.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let raw = std::fs::read(path)
            .map_err(|e| HarnessError::read_file(path.display().to_string(), e))?;

        let mut script = Self::from_slice(&raw)?;
        script.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        info!(
            path = %path.display(),
            source_filename = %script.source_filename,
            commands = script.commands.len(),
            "Script loaded"
        );

        Ok(script)
    }

    /// Parse a script from a JSON string, resolving modules against the
    /// current directory.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        Self::from_slice(json.as_bytes())
    }

    fn from_slice(raw: &[u8]) -> Result<Self, HarnessError> {
        serde_json::from_slice(raw).map_err(|e| HarnessError::invalid_script(e.to_string()))
    }

    /// Replace the directory module filenames are resolved against.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Directory module filenames are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a module filename from the script.
    pub fn module_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }
}

/// One directive from the script.
#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    /// Command type tag.
    #[serde(rename = "type")]
    pub kind: CommandKind,

    /// Line in the source `.wast` file.
    #[serde(default)]
    pub line: u32,

    /// Module bytecode file (module commands).
    #[serde(default)]
    pub filename: Option<String>,

    /// Bind name of a module (module commands).
    #[serde(default)]
    pub name: Option<String>,

    /// Action to perform (action and assertion commands).
    #[serde(default)]
    pub action: Option<Action>,

    /// `binary` or `text` (assertions on modules).
    #[serde(default)]
    pub module_type: Option<String>,

    /// Expected results.
    #[serde(default)]
    pub expected: Vec<ValueInfo>,

    /// Expected failure message (trap and module assertions).
    #[serde(default)]
    pub text: Option<String>,
}

impl Command {
    /// Bind name, treating an empty name as absent.
    pub fn bind_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// The values an action's result is checked against.
    ///
    /// `get` always uses the command's list. `invoke` uses the action's own
    /// list when it carries values and falls back to the command's list
    /// otherwise (`wast2json` leaves only result types on the action).
    pub fn expected_for<'a>(&'a self, action: &'a Action) -> &'a [ValueInfo] {
        let own = &action.expected;
        if action.kind == ActionKind::Invoke
            && !own.is_empty()
            && own.iter().all(|v| v.value.is_some())
        {
            own
        } else {
            &self.expected
        }
    }
}

/// Command type tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CommandKind {
    /// Load a module.
    Module,
    /// Perform an action and check its result.
    AssertReturn,
    /// Perform an action.
    Action,
    /// An assertion category acknowledged but not evaluated.
    Skipped(SkipCategory),
    /// Any other tag.
    Unrecognized(String),
}

impl From<String> for CommandKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "module" => Self::Module,
            "assert_return" => Self::AssertReturn,
            "action" => Self::Action,
            other => match SkipCategory::from_tag(other) {
                Some(category) => Self::Skipped(category),
                None => Self::Unrecognized(tag),
            },
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::AssertReturn => write!(f, "assert_return"),
            Self::Action => write!(f, "action"),
            Self::Skipped(category) => write!(f, "{category}"),
            Self::Unrecognized(tag) => write!(f, "{tag}"),
        }
    }
}

/// Assertion categories the runner acknowledges without evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipCategory {
    Trap,
    Malformed,
    Invalid,
    Exhaustion,
    Unlinkable,
    ReturnCanonicalNan,
    ReturnArithmeticNan,
}

impl SkipCategory {
    /// All skipped categories.
    pub const ALL: [SkipCategory; 7] = [
        Self::Trap,
        Self::Malformed,
        Self::Invalid,
        Self::Exhaustion,
        Self::Unlinkable,
        Self::ReturnCanonicalNan,
        Self::ReturnArithmeticNan,
    ];

    /// Map a command tag to its category.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// The command tag for this category.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Trap => "assert_trap",
            Self::Malformed => "assert_malformed",
            Self::Invalid => "assert_invalid",
            Self::Exhaustion => "assert_exhaustion",
            Self::Unlinkable => "assert_unlinkable",
            Self::ReturnCanonicalNan => "assert_return_canonical_nan",
            Self::ReturnArithmeticNan => "assert_return_arithmetic_nan",
        }
    }
}

impl fmt::Display for SkipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An invoke or get directive.
#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    /// Action type tag.
    #[serde(rename = "type")]
    pub kind: ActionKind,

    /// Target module name; the current module when absent.
    #[serde(default)]
    pub module: Option<String>,

    /// Export name.
    pub field: String,

    /// Arguments (invoke only).
    #[serde(default)]
    pub args: Vec<ValueInfo>,

    /// Expected results attached to the action.
    #[serde(default)]
    pub expected: Vec<ValueInfo>,
}

impl Action {
    /// Target module name, treating an empty name as absent.
    pub fn target(&self) -> Option<&str> {
        self.module.as_deref().filter(|m| !m.is_empty())
    }
}

/// Action type tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ActionKind {
    /// Call an exported function.
    Invoke,
    /// Read an exported global.
    Get,
    /// Any other tag.
    Unrecognized(String),
}

impl From<String> for ActionKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "invoke" => Self::Invoke,
            "get" => Self::Get,
            _ => Self::Unrecognized(tag),
        }
    }
}

/// A typed value kept as its decimal text until used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValueInfo {
    /// Declared type.
    #[serde(rename = "type")]
    pub value_type: ValueType,

    /// Value text; absent for type-only entries.
    #[serde(default)]
    pub value: Option<ValueText>,
}

impl ValueInfo {
    /// Build a value from its type and decimal text.
    pub fn new(value_type: ValueType, value: impl Into<String>) -> Self {
        Self {
            value_type,
            value: Some(ValueText::Scalar(value.into())),
        }
    }
}

/// The textual form of a value.
///
/// `wast2json` writes scalars as one decimal string and `v128` values as an
/// array of lane strings. Both forms load; only scalars decode to a lane.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ValueText {
    Scalar(String),
    Lanes(Vec<String>),
}

impl ValueText {
    /// The decimal text of a scalar value.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            Self::Lanes(_) => None,
        }
    }
}

impl fmt::Display for ValueText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(text) => f.write_str(text),
            Self::Lanes(lanes) => write!(f, "[{}]", lanes.join(" ")),
        }
    }
}

/// Declared value types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
    /// Non-numeric types (`v128`, references); not representable as a lane.
    Other(String),
}

impl From<String> for ValueType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "i32" => Self::I32,
            "i64" => Self::I64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            _ => Self::Other(name),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}
