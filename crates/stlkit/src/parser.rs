//! Recursive-descent parser for the ASCII STL grammar.
//!
//! ```text
//! document  := solid*
//! solid     := "solid" name? facet* "endsolid" name?
//! facet     := "facet" "normal" vector "outer" "loop" vertex+ "endloop" "endfacet"
//! vector    := float float float
//! vertex    := "vertex" vector
//! ```
//!
//! Every read operation returns a tagged result: `Ok(Some(_))` for a value,
//! `Ok(None)` when an optional lookahead did not match (the end of a
//! repetition), and `Err(_)` for a genuine grammar error. Parsing stops at the
//! first error. Progress is recorded as [`ParseEvent`]s instead of printed.

use std::fmt;

use tracing::{debug, trace};

use crate::error::{Result, StlError};
use crate::lexer::{Cursor, Lexer};
use crate::model::{Document, Facet, Solid, Vector3};

/// Grammar keywords; never part of a solid name.
const KEYWORDS: [&str; 9] = [
    "solid", "endsolid", "facet", "endfacet", "normal", "outer", "loop", "vertex", "endloop",
];

/// How many vertices a facet loop may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexPolicy {
    /// Exactly three `vertex` entries, each required.
    Triangle,
    /// Any number of `vertex` entries (including none) up to `endloop`.
    #[default]
    UntilEndloop,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Vertex loop policy.
    pub vertex_policy: VertexPolicy,
}

/// Progress reported while parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// A complete `solid ... endsolid` block was read.
    SolidRead {
        /// Position of the solid in the document (0-indexed).
        index: usize,
        /// Solid name, if any.
        name: Option<String>,
        /// Number of facets in the solid.
        facets: usize,
    },
    /// The whole document was read.
    DocumentRead {
        /// Number of solids in the document.
        solids: usize,
    },
}

impl fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseEvent::SolidRead { facets, .. } => {
                write!(f, "Read Solid with {facets} facets")
            }
            ParseEvent::DocumentRead { solids } => {
                let plural = if *solids == 1 { "" } else { "s" };
                write!(f, "Read {solids} Solid{plural}")
            }
        }
    }
}

/// Result of parsing a whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The parsed solids.
    pub document: Document,
    /// Progress events in the order they occurred.
    pub events: Vec<ParseEvent>,
}

/// Parser for ASCII STL text.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    options: ParseOptions,
    events: Vec<ParseEvent>,
    solids_read: usize,
}

impl<'a> Parser<'a> {
    /// Parse a complete document with default options.
    pub fn parse(input: &'a str) -> Result<Parsed> {
        Self::parse_with(input, ParseOptions::default())
    }

    /// Parse a complete document.
    pub fn parse_with(input: &'a str, options: ParseOptions) -> Result<Parsed> {
        let mut parser = Parser::new(input, options);
        let document = parser.read_document()?;
        Ok(Parsed {
            document,
            events: parser.events,
        })
    }

    /// Create a parser positioned at the start of `input`.
    pub fn new(input: &'a str, options: ParseOptions) -> Self {
        Self::resume(input, Cursor::default(), options)
    }

    /// Create a parser that continues from a cursor returned by
    /// [`cursor`](Self::cursor) on an earlier parser over the same input.
    pub fn resume(input: &'a str, cursor: Cursor, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::with_cursor(input, cursor),
            options,
            events: Vec::new(),
            solids_read: 0,
        }
    }

    /// Current position.
    pub fn cursor(&self) -> Cursor {
        self.lexer.cursor()
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }

    /// Read one token and compare it with `expected`.
    ///
    /// On a mismatch the cursor is restored. An optional match returns
    /// `Ok(false)`; a required one fails with [`StlError::TokenMismatch`]
    /// carrying the line of the token actually read.
    pub fn expect(&mut self, expected: &str, required: bool) -> Result<bool> {
        let saved = self.lexer.cursor();
        let token = self.lexer.next_token();
        if token == expected {
            return Ok(true);
        }
        let line = self.lexer.line();
        self.lexer.rewind(saved);
        if required {
            return Err(StlError::token_mismatch(expected, token, line));
        }
        Ok(false)
    }

    /// Match a multi-word phrase such as `outer loop`, token by token.
    ///
    /// All or nothing: on any mismatch the cursor returns to where the
    /// phrase started.
    pub fn expect_compound(&mut self, phrase: &str, required: bool) -> Result<bool> {
        let start = self.lexer.cursor();
        for expected in Lexer::new(phrase).tokenize() {
            match self.expect(expected, required) {
                Ok(true) => {}
                Ok(false) => {
                    self.lexer.rewind(start);
                    return Ok(false);
                }
                Err(e) => {
                    self.lexer.rewind(start);
                    return Err(e);
                }
            }
        }
        Ok(true)
    }

    /// Read a floating point number. `Ok(None)` at end of content.
    pub fn read_float(&mut self) -> Result<Option<f64>> {
        let token = self.lexer.next_token();
        if token.is_empty() {
            return Ok(None);
        }
        token
            .parse::<f64>()
            .map(Some)
            .map_err(|_| StlError::NumericMismatch {
                token: token.to_string(),
                line: self.lexer.line(),
            })
    }

    /// Read `keyword` followed by three numbers.
    ///
    /// Returns `Ok(None)` without consuming anything when an optional
    /// keyword is absent.
    pub fn read_vector(&mut self, keyword: &str, required: bool) -> Result<Option<Vector3>> {
        if !self.expect(keyword, required)? {
            return Ok(None);
        }
        self.read_coordinates().map(Some)
    }

    /// Read one facet. `Ok(None)` when the next token is not `facet`.
    pub fn read_facet(&mut self) -> Result<Option<Facet>> {
        if !self.expect("facet", false)? {
            return Ok(None);
        }
        self.require("normal")?;
        let normal = self.read_coordinates()?;
        self.expect_compound("outer loop", true)?;

        let mut vertices = Vec::with_capacity(3);
        match self.options.vertex_policy {
            VertexPolicy::Triangle => {
                for _ in 0..3 {
                    self.require("vertex")?;
                    vertices.push(self.read_coordinates()?);
                }
            }
            VertexPolicy::UntilEndloop => {
                while let Some(vertex) = self.read_vector("vertex", false)? {
                    vertices.push(vertex);
                }
            }
        }

        self.require("endloop")?;
        self.require("endfacet")?;
        trace!(line = self.lexer.line(), vertices = vertices.len(), "read facet");
        Ok(Some(Facet { normal, vertices }))
    }

    /// Read one solid. `Ok(None)` when the next token is not `solid`.
    pub fn read_solid(&mut self) -> Result<Option<Solid>> {
        if !self.expect("solid", false)? {
            return Ok(None);
        }
        let (parts, _) = self.scan_name();
        let name = (!parts.is_empty()).then(|| parts.join(" "));

        let mut facets = Vec::new();
        while let Some(facet) = self.read_facet()? {
            facets.push(facet);
        }
        self.require("endsolid")?;
        self.skip_end_name(name.as_deref())?;

        let index = self.solids_read;
        self.solids_read += 1;
        debug!(index, name = ?name, facets = facets.len(), "read solid");
        self.events.push(ParseEvent::SolidRead {
            index,
            name: name.clone(),
            facets: facets.len(),
        });
        Ok(Some(Solid { name, facets }))
    }

    /// Read solids until the content is exhausted.
    ///
    /// Anything left over that does not start a solid is reported as a
    /// mismatch against `solid`.
    pub fn read_document(&mut self) -> Result<Document> {
        let mut solids = Vec::new();
        while let Some(solid) = self.read_solid()? {
            solids.push(solid);
        }

        let saved = self.lexer.cursor();
        let trailing = self.lexer.next_token();
        if !trailing.is_empty() {
            let line = self.lexer.line();
            self.lexer.rewind(saved);
            return Err(StlError::token_mismatch("solid", trailing, line));
        }

        debug!(solids = solids.len(), "read document");
        self.events.push(ParseEvent::DocumentRead {
            solids: solids.len(),
        });
        Ok(Document { solids })
    }

    fn require(&mut self, keyword: &str) -> Result<()> {
        self.expect(keyword, true).map(|_| ())
    }

    fn read_coordinates(&mut self) -> Result<Vector3> {
        let mut xyz = [0.0; 3];
        for value in &mut xyz {
            *value = self.read_float()?.ok_or(StlError::UnexpectedEof {
                expected: "number",
                line: self.lexer.line(),
            })?;
        }
        Ok(Vector3::new(xyz[0], xyz[1], xyz[2]))
    }

    /// Collect the non-keyword tokens that follow `solid`/`endsolid` on the
    /// same line. Also returns whether they run to the end of that line.
    fn scan_name(&mut self) -> (Vec<&'a str>, bool) {
        let line = self.lexer.line();
        let mut parts = Vec::new();
        loop {
            let saved = self.lexer.cursor();
            let token = self.lexer.next_token();
            let ends_line = token.is_empty() || self.lexer.line() != line;
            if ends_line || KEYWORDS.contains(&token) {
                self.lexer.rewind(saved);
                return (parts, ends_line);
            }
            parts.push(token);
        }
    }

    /// Consume the name after `endsolid`: either the rest of the line, or the
    /// header name when more content follows on the same line.
    fn skip_end_name(&mut self, name: Option<&str>) -> Result<()> {
        let start = self.lexer.cursor();
        let (_, ends_line) = self.scan_name();
        if ends_line {
            return Ok(());
        }
        self.lexer.rewind(start);
        if let Some(name) = name {
            self.expect_compound(name, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRIANGLE: &str = "solid s facet normal 0 0 1 outer loop vertex 0 0 0 vertex 1 0 0 vertex 0 1 0 endloop endfacet endsolid";

    const CUBE_SIDE: &str = "solid side
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 1 0
      vertex 1 0 0
    endloop
  endfacet
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 0 1 0
      vertex 1 1 0
    endloop
  endfacet
endsolid side
";

    fn triangle_policy() -> ParseOptions {
        ParseOptions {
            vertex_policy: VertexPolicy::Triangle,
        }
    }

    fn facet_with(vertices: usize) -> String {
        let mut s = String::from("solid q\nfacet normal 0 0 1\nouter loop\n");
        for i in 0..vertices {
            s.push_str(&format!("vertex {i} 0 0\n"));
        }
        s.push_str("endloop\nendfacet\nendsolid q\n");
        s
    }

    #[test]
    fn test_single_triangle() {
        let parsed = Parser::parse(TRIANGLE).unwrap();
        let solids = &parsed.document.solids;
        assert_eq!(solids.len(), 1);
        assert_eq!(solids[0].name.as_deref(), Some("s"));
        assert_eq!(solids[0].facets.len(), 1);

        let facet = &solids[0].facets[0];
        assert_eq!(facet.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(
            facet.vertices,
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_solid_and_facet_counts() {
        let input = format!("{CUBE_SIDE}{TRIANGLE}\n{CUBE_SIDE}solid empty\nendsolid empty\n");
        let parsed = Parser::parse(&input).unwrap();
        let counts: Vec<usize> = parsed
            .document
            .solids
            .iter()
            .map(Solid::facet_count)
            .collect();
        assert_eq!(counts, vec![2, 1, 2, 0]);
        assert_eq!(
            parsed.events.last(),
            Some(&ParseEvent::DocumentRead { solids: 4 })
        );

        let reported: Vec<usize> = parsed
            .events
            .iter()
            .filter_map(|e| match e {
                ParseEvent::SolidRead { facets, .. } => Some(*facets),
                _ => None,
            })
            .collect();
        assert_eq!(reported, counts);
    }

    #[test]
    fn test_event_text() {
        let parsed = Parser::parse(CUBE_SIDE).unwrap();
        let lines: Vec<String> = parsed.events.iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["Read Solid with 2 facets", "Read 1 Solid"]);
        assert_eq!(
            ParseEvent::DocumentRead { solids: 0 }.to_string(),
            "Read 0 Solids"
        );
    }

    #[test]
    fn test_whitespace_only() {
        for input in ["", "   ", "\n\r\n\t  \n"] {
            let parsed = Parser::parse(input).unwrap();
            assert!(parsed.document.solids.is_empty());
            assert_eq!(parsed.events, vec![ParseEvent::DocumentRead { solids: 0 }]);
        }
    }

    #[test]
    fn test_missing_endsolid() {
        let input = "solid s\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\n";
        let err = Parser::parse(input).unwrap_err();
        match err {
            StlError::TokenMismatch {
                expected,
                found,
                line,
            } => {
                assert_eq!(expected, "endsolid");
                assert_eq!(found, "");
                assert_eq!(line, 9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_loop_accepted_until_endloop() {
        let parsed = Parser::parse(&facet_with(0)).unwrap();
        let facet = &parsed.document.solids[0].facets[0];
        assert!(facet.vertices.is_empty());
        assert!(!facet.is_triangle());
    }

    #[test]
    fn test_empty_loop_rejected_for_triangles() {
        let err = Parser::parse_with(&facet_with(0), triangle_policy()).unwrap_err();
        match err {
            StlError::TokenMismatch {
                expected,
                found,
                line,
            } => {
                assert_eq!(expected, "vertex");
                assert_eq!(found, "endloop");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_polygon_loops() {
        let parsed = Parser::parse(&facet_with(4)).unwrap();
        assert_eq!(parsed.document.solids[0].facets[0].vertices.len(), 4);

        let err = Parser::parse_with(&facet_with(4), triangle_policy()).unwrap_err();
        assert!(matches!(
            err,
            StlError::TokenMismatch { ref expected, ref found, .. }
                if expected == "endloop" && found == "vertex"
        ));
    }

    #[test]
    fn test_triangle_policy_accepts_triangles() {
        let parsed = Parser::parse_with(CUBE_SIDE, triangle_policy()).unwrap();
        assert!(parsed.document.solids[0].facets.iter().all(Facet::is_triangle));
    }

    #[test]
    fn test_scientific_notation() {
        let input = "solid n\nfacet normal -1.0e+00 2.5E-1 0\nouter loop\nvertex 1.5e3 -0.001 +7\nendloop\nendfacet\nendsolid\n";
        let parsed = Parser::parse(input).unwrap();
        let facet = &parsed.document.solids[0].facets[0];
        assert_relative_eq!(facet.normal.x, -1.0);
        assert_relative_eq!(facet.normal.y, 0.25);
        assert_relative_eq!(facet.vertices[0].x, 1500.0);
        assert_relative_eq!(facet.vertices[0].y, -0.001);
        assert_relative_eq!(facet.vertices[0].z, 7.0);
    }

    #[test]
    fn test_numeric_mismatch() {
        let input = "solid s\nfacet normal 0 zero 1\n";
        let err = Parser::parse(input).unwrap_err();
        match err {
            StlError::NumericMismatch { token, line } => {
                assert_eq!(token, "zero");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_vector() {
        let err = Parser::parse("solid s facet normal 0 0").unwrap_err();
        assert!(matches!(
            err,
            StlError::UnexpectedEof {
                expected: "number",
                line: 1
            }
        ));
    }

    #[test]
    fn test_optional_expect_rewinds() {
        let mut parser = Parser::new("  endsolid", ParseOptions::default());
        let start = parser.cursor();
        assert!(!parser.expect("facet", false).unwrap());
        assert_eq!(parser.cursor(), start);
        assert!(parser.expect("endsolid", false).unwrap());
        assert_eq!(parser.cursor().offset, 10);
    }

    #[test]
    fn test_required_expect_reports_and_rewinds() {
        let mut parser = Parser::new("\n\nfoo", ParseOptions::default());
        let start = parser.cursor();
        let err = parser.expect("facet", true).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.to_string(),
            "failed to match token (facet), line 3 (got 'foo')"
        );
        assert_eq!(parser.cursor(), start);
    }

    #[test]
    fn test_compound_all_or_nothing() {
        let mut parser = Parser::new("outer lop", ParseOptions::default());
        let start = parser.cursor();
        assert!(!parser.expect_compound("outer loop", false).unwrap());
        assert_eq!(parser.cursor(), start);

        let err = parser.expect_compound("outer loop", true).unwrap_err();
        assert!(matches!(
            err,
            StlError::TokenMismatch { ref expected, ref found, .. }
                if expected == "loop" && found == "lop"
        ));
        assert_eq!(parser.cursor(), start);

        let mut parser = Parser::new("outer\n  loop vertex", ParseOptions::default());
        assert!(parser.expect_compound("outer loop", true).unwrap());
        assert_eq!(parser.cursor().line, 2);
    }

    #[test]
    fn test_read_float_end_of_content() {
        let mut parser = Parser::new("3.25  ", ParseOptions::default());
        assert_eq!(parser.read_float().unwrap(), Some(3.25));
        assert_eq!(parser.read_float().unwrap(), None);
    }

    #[test]
    fn test_resume_reads_next_solid() {
        let input = format!("{TRIANGLE}\n{CUBE_SIDE}");
        let whole = Parser::parse(&input).unwrap().document;

        let mut first = Parser::new(&input, ParseOptions::default());
        let a = first.read_solid().unwrap().unwrap();
        let mut second = Parser::resume(&input, first.cursor(), ParseOptions::default());
        let b = second.read_solid().unwrap().unwrap();
        assert!(second.read_solid().unwrap().is_none());

        assert_eq!(vec![a, b], whole.solids);
    }

    #[test]
    fn test_solid_names() {
        let input = "solid my part v2\nendsolid my part v2\nsolid\nendsolid\nsolid a endsolid a solid b endsolid b";
        let parsed = Parser::parse(input).unwrap();
        let names: Vec<Option<&str>> = parsed
            .document
            .solids
            .iter()
            .map(|s| s.name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("my part v2"), None, Some("a"), Some("b")]);
    }

    #[test]
    fn test_misspelled_facet_in_one_line_solid() {
        let input = "solid s facte normal 0 0 1 outer loop vertex 0 0 0 vertex 1 0 0 vertex 0 1 0 endloop endfacet endsolid";
        let err = Parser::parse(input).unwrap_err();
        match err {
            StlError::TokenMismatch {
                expected,
                found,
                line,
            } => {
                assert_eq!(expected, "endsolid");
                assert_eq!(found, "normal");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_misspelled_solid_after_endsolid() {
        let err = Parser::parse("solid a endsolid a sold b endsolid b").unwrap_err();
        match err {
            StlError::TokenMismatch {
                expected,
                found,
                line,
            } => {
                assert_eq!(expected, "solid");
                assert_eq!(found, "sold");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_end_name_runs_to_end_of_line() {
        let input = "solid part\nendsolid other name\nsolid\nendsolid x\n";
        let parsed = Parser::parse(input).unwrap();
        assert_eq!(parsed.document.solids.len(), 2);
        assert_eq!(parsed.document.solids[0].name.as_deref(), Some("part"));
    }

    #[test]
    fn test_trailing_garbage() {
        let input = format!("{CUBE_SIDE}garbage\n");
        let err = Parser::parse(&input).unwrap_err();
        match err {
            StlError::TokenMismatch {
                expected,
                found,
                line,
            } => {
                assert_eq!(expected, "solid");
                assert_eq!(found, "garbage");
                assert_eq!(line, 17);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_crlf_line_numbers() {
        let input = "solid s\r\nfacet normal 0 0 1\r\nouter loop\r\nvertex 0 0 0\r\nendloop\r\nendface\r\n";
        let err = Parser::parse(input).unwrap_err();
        assert_eq!(err.line(), Some(6));
    }
}
