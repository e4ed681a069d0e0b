//! Contains the common [`ErrorKind`] trait used by all errors of the step-trace engine, and the
//! [`Error`] type that pairs an error kind with the expression text it is about.

// lets `#[derive(ErrorKind)]` refer to `tutor_error::EXPR` from this crate's own tests
extern crate self as tutor_error;

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// The source identifier used in reports.
pub const SRC_ID: &str = "expression";

/// Represents any kind of error that can occur while building a solution.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the error kind as [`Any`], so callers can downcast to the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// Returns the name of this kind of error, such as `MissingBinding`.
    fn name(&self) -> &'static str;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of an expression's rendered text.
///
/// Expressions arrive as trees rather than source code, so the text an error points into is the
/// rendering of the offending expression (or the offending tag, for input errors). Spans are
/// measured in characters, not bytes, since rendered expressions contain superscripts and `√`.
#[derive(Debug)]
pub struct Error {
    /// The text the spans of this error point into.
    pub src: String,

    /// The regions of [`Error::src`] that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given source text, spans, and kind.
    pub fn new(src: impl Into<String>, spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { src: src.into(), spans, kind: Box::new(kind) }
    }

    /// Creates a new error whose single span covers the whole source text.
    pub fn whole(src: impl Into<String>, kind: impl ErrorKind + 'static) -> Self {
        let src = src.into();
        let len = src.chars().count();
        Self::new(src, vec![0..len], kind)
    }

    /// Returns the name of the error kind.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns true if the error is of the given kind.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<K>()
    }

    /// Returns a reference to the error kind if it is of the given kind.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Build a report from this error kind.
    pub fn build_report(&self) -> Report<(&'static str, Range<usize>)> {
        self.kind.build_report(SRC_ID, &self.spans)
    }

    /// Writes the report of this error into a string. The string contains ANSI color codes.
    pub fn report_to_string(&self) -> String {
        let mut buf = Vec::new();
        // writing into a `Vec` cannot fail
        let _ = self.build_report().write((SRC_ID, Source::from(&self.src)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type does not implement `Display`, so the report is
    /// printed through its `eprint` method.
    pub fn report_to_stderr(&self) {
        if let Err(err) = self.build_report().eprint((SRC_ID, Source::from(&self.src))) {
            eprintln!("{}: {}", self, err);
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} in `{}`", self.kind.name(), self.src)
    }
}

impl std::error::Error for Error {}
