//! Region marker syntaxes the annotator can emit.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A paired open/close marker syntax.
///
/// `open` and `close` for the same region must be mirror images: emphasis
/// wraps outside the color marker on open and is closed after it.
pub trait Dialect {
    fn open(&self, out: &mut String, color: Color, emphasized: bool);
    fn close(&self, out: &mut String, color: Color, emphasized: bool);

    /// Writes one character of base text.
    fn push_char(&self, out: &mut String, c: char) {
        out.push(c);
    }
}

/// `\textcolor{#RRGGBB}{…}` with `\underline{…}` emphasis, for math renderers.
///
/// Base text is already LaTeX and passes through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latex;

impl Dialect for Latex {
    fn open(&self, out: &mut String, color: Color, emphasized: bool) {
        if emphasized {
            out.push_str("\\underline{");
        }
        out.push_str("\\textcolor{");
        out.push_str(&color.to_string());
        out.push_str("}{");
    }

    fn close(&self, out: &mut String, _color: Color, emphasized: bool) {
        out.push('}');
        if emphasized {
            out.push('}');
        }
    }
}

/// `<span style="color:…">` with `<u>` emphasis; base text is escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html;

impl Dialect for Html {
    fn open(&self, out: &mut String, color: Color, emphasized: bool) {
        if emphasized {
            out.push_str("<u>");
        }
        out.push_str("<span style=\"color:");
        out.push_str(&color.to_string());
        out.push_str("\">");
    }

    fn close(&self, out: &mut String, _color: Color, emphasized: bool) {
        out.push_str("</span>");
        if emphasized {
            out.push_str("</u>");
        }
    }

    fn push_char(&self, out: &mut String, c: char) {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Configurable choice of dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Latex,
    Html,
}

impl Dialect for DialectKind {
    fn open(&self, out: &mut String, color: Color, emphasized: bool) {
        match self {
            DialectKind::Latex => Latex.open(out, color, emphasized),
            DialectKind::Html => Html.open(out, color, emphasized),
        }
    }

    fn close(&self, out: &mut String, color: Color, emphasized: bool) {
        match self {
            DialectKind::Latex => Latex.close(out, color, emphasized),
            DialectKind::Html => Html.close(out, color, emphasized),
        }
    }

    fn push_char(&self, out: &mut String, c: char) {
        match self {
            DialectKind::Latex => Latex.push_char(out, c),
            DialectKind::Html => Html.push_char(out, c),
        }
    }
}
