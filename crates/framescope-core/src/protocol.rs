//! Scene protocol parser.
//!
//! The protocol is free-form text printed by the program being debugged:
//!
//! ```text
//! framestart(
//! drawtriangle "Name" [x,y,z] [x,y,z] [x,y,z] [r,g,b,a]
//! drawline     "Name" [x,y,z] [x,y,z] [r,g,b,a]
//! drawpoint    "Name" [x,y,z] [r,g,b,a]
//! frameend(
//! ```
//!
//! Names and colors are optional. Anything the scanner does not recognize is
//! skipped one byte at a time, and malformed fragments degrade to defaults:
//! the parser never fails.

use glam::Vec3;
use log::{debug, trace};

use crate::options::{ParserOptions, UnterminatedFramePolicy};
use crate::primitive::{ColorBuilder, Frame, Primitive, PrimitiveBuilder, PrimitiveKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    FrameStart,
    FrameEnd,
    Draw(PrimitiveKind),
}

/// Literal prefixes tested at each scan position, longest first.
const TOKENS: [(&[u8], Token); 5] = [
    (b"drawtriangle", Token::Draw(PrimitiveKind::Triangle)),
    (b"framestart(", Token::FrameStart),
    (b"drawpoint", Token::Draw(PrimitiveKind::Point)),
    (b"frameend(", Token::FrameEnd),
    (b"drawline", Token::Draw(PrimitiveKind::Line)),
];

/// Counters gathered during one parse, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Frames emitted.
    pub frames: usize,
    /// Primitives emitted across all frames.
    pub primitives: usize,
    /// Primitives emitted with fewer vertices than their kind needs.
    pub incomplete_primitives: usize,
    /// Primitives lost because a new `framestart(` began before `frameend(`,
    /// or because they sat between frames.
    pub discarded_primitives: usize,
    /// Numbers that could not be parsed and kept their default.
    pub malformed_numbers: usize,
}

/// Parser for the scene protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneParser {
    options: ParserOptions,
}

impl SceneParser {
    /// Creates a parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parses `text` into frames.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Frame> {
        self.parse_with_stats(text).0
    }

    /// Parses `text` into frames and reports what was dropped or defaulted.
    #[must_use]
    pub fn parse_with_stats(&self, text: &str) -> (Vec<Frame>, ParseStats) {
        let mut scanner = Scanner::new(text);
        let mut frames = Vec::new();
        // The buffer always exists; `in_frame` records whether a
        // `framestart(` opened it.
        let mut buffer = Frame::new();
        let mut in_frame = false;

        while !scanner.at_end() {
            scanner.skip_whitespace();
            match scanner.match_token() {
                Some(Token::FrameStart) => {
                    if !buffer.is_empty() {
                        debug!(
                            "framestart( discards {} buffered primitives",
                            buffer.len()
                        );
                        scanner.stats.discarded_primitives += buffer.len();
                    }
                    buffer = Frame::new();
                    in_frame = true;
                }
                Some(Token::FrameEnd) => {
                    if in_frame {
                        frames.push(std::mem::take(&mut buffer));
                        in_frame = false;
                    }
                }
                Some(Token::Draw(kind)) => {
                    let primitive = scanner.read_primitive(kind, buffer.len());
                    buffer.primitives.push(primitive);
                }
                None => scanner.advance(),
            }
        }

        if in_frame || !buffer.is_empty() {
            match self.options.unterminated_frame {
                UnterminatedFramePolicy::Append => {
                    debug!(
                        "end of input with an open frame of {} primitives, appending",
                        buffer.len()
                    );
                    frames.push(buffer);
                }
                UnterminatedFramePolicy::Drop => {
                    debug!(
                        "end of input with an open frame of {} primitives, dropping",
                        buffer.len()
                    );
                    scanner.stats.discarded_primitives += buffer.len();
                }
            }
        }

        let mut stats = scanner.stats;
        stats.frames = frames.len();
        stats.primitives = frames.iter().map(Frame::len).sum();
        stats.incomplete_primitives = frames
            .iter()
            .flat_map(|f| &f.primitives)
            .filter(|p| !p.is_complete())
            .count();
        debug!(
            "parsed {} frames with {} primitives ({} incomplete, {} discarded)",
            stats.frames, stats.primitives, stats.incomplete_primitives, stats.discarded_primitives
        );
        (frames, stats)
    }
}

/// Parses `text` with default options.
#[must_use]
pub fn parse_scene(text: &str) -> Vec<Frame> {
    SceneParser::default().parse(text)
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    stats: ParseStats,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            stats: ParseStats::default(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.bytes.len());
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn match_token(&mut self) -> Option<Token> {
        let rest = &self.bytes[self.pos..];
        let (literal, token) = TOKENS.iter().find(|(lit, _)| rest.starts_with(lit))?;
        self.pos += literal.len();
        Some(*token)
    }

    fn read_primitive(&mut self, kind: PrimitiveKind, index: usize) -> Primitive {
        let mut builder = PrimitiveBuilder::new(kind);

        self.skip_whitespace();
        if let Some(name) = self.read_name() {
            builder = builder.name(name);
        }

        for _ in 0..kind.vertex_count().unwrap_or(0) {
            if !self.seek_bracket() {
                trace!(
                    "{kind} at index {index} truncated to {} vertices",
                    builder.vertex_count()
                );
                return builder.build(index);
            }
            let mut coords = [0.0f32; 3];
            self.read_bracket_values(|slot, value| {
                if let Some(c) = coords.get_mut(slot) {
                    *c = value;
                }
            });
            builder.push_position(Vec3::from_array(coords));
        }

        self.skip_whitespace();
        if self.peek() == Some(b'[') {
            self.pos += 1;
            let mut color = ColorBuilder::default();
            self.read_bracket_values(|slot, value| color.set(slot, value));
            builder = builder.color(color.build());
        }

        builder.build(index)
    }

    /// Reads a double-quoted name at the current position.
    ///
    /// An unterminated quote consumes the rest of the input and yields `None`.
    fn read_name(&mut self) -> Option<String> {
        if self.peek() != Some(b'"') {
            return None;
        }
        let start = self.pos + 1;
        match self.bytes[start..].iter().position(|&b| b == b'"') {
            Some(len) => {
                self.pos = start + len + 1;
                Some(self.text[start..start + len].to_string())
            }
            None => {
                trace!("unterminated name quote at byte {}", self.pos);
                self.pos = self.bytes.len();
                None
            }
        }
    }

    /// Moves just past the next `[`. Returns false if there is none.
    fn seek_bracket(&mut self) -> bool {
        match self.bytes[self.pos..].iter().position(|&b| b == b'[') {
            Some(offset) => {
                self.pos += offset + 1;
                true
            }
            None => {
                self.pos = self.bytes.len();
                false
            }
        }
    }

    /// Reads comma-separated numbers up to and including `]`, handing each
    /// `(slot, value)` to `store`.
    ///
    /// Only digits, `.` and `-` are collected; a comma after an empty buffer
    /// does not advance the slot.
    fn read_bracket_values(&mut self, mut store: impl FnMut(usize, f32)) {
        let mut number = String::new();
        let mut slot = 0;

        while let Some(b) = self.peek() {
            if b == b']' {
                break;
            }
            match b {
                b'0'..=b'9' | b'.' | b'-' => number.push(char::from(b)),
                b',' if !number.is_empty() => {
                    if let Some(value) = self.flush_number(&mut number) {
                        store(slot, value);
                    }
                    slot += 1;
                }
                _ => {}
            }
            self.pos += 1;
        }

        if !number.is_empty() {
            if let Some(value) = self.flush_number(&mut number) {
                store(slot, value);
            }
        }
        self.advance();
    }

    fn flush_number(&mut self, number: &mut String) -> Option<f32> {
        // Digit runs beyond f32 range parse to infinity; those are malformed too.
        let parsed = number.parse::<f32>().ok().filter(|value| value.is_finite());
        if parsed.is_none() {
            trace!("malformed number '{number}' left at default");
            self.stats.malformed_numbers += 1;
        }
        number.clear();
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color_for;
    use crate::primitive::POINT_NORMAL;
    use glam::Vec4;

    fn positions(prim: &Primitive) -> Vec<Vec3> {
        prim.positions().collect()
    }

    #[test]
    fn test_single_triangle_with_color() {
        let frames = parse_scene(
            r#"framestart( drawtriangle "T" [0,0,0][1,0,0][0,1,0][1,0,0,1] frameend("#,
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 1);
        let tri = &frames[0].primitives[0];
        assert_eq!(tri.kind, PrimitiveKind::Triangle);
        assert_eq!(tri.name, "T");
        assert_eq!(positions(tri), vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(tri.color, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(tri.is_complete());
    }

    #[test]
    fn test_all_kinds_and_default_names() {
        let text = "framestart(\n\
                    drawtriangle [0,0,0] [1,0,0] [0,1,0]\n\
                    drawline [0,0,0] [0,0,1]\n\
                    drawpoint [2,2,2]\n\
                    frameend(";
        let frames = parse_scene(text);
        let prims = &frames[0].primitives;
        assert_eq!(prims.len(), 3);
        assert_eq!(prims[0].name, "Unnamed Triangle");
        assert_eq!(prims[1].name, "Unnamed Line");
        assert_eq!(prims[1].kind, PrimitiveKind::Line);
        assert_eq!(positions(&prims[1]), vec![Vec3::ZERO, Vec3::Z]);
        assert_eq!(prims[2].name, "Unnamed Point");
        assert_eq!(prims[2].vertices[0].normal, POINT_NORMAL);
        assert_eq!(prims[0].vertices[0].normal, Vec3::ZERO);
    }

    #[test]
    fn test_generated_color_keyed_by_frame_position() {
        let text = "framestart( drawpoint [0,0,0] drawpoint [1,1,1] frameend( \
                    framestart( drawpoint [5,5,5] frameend(";
        let frames = parse_scene(text);
        assert_eq!(frames[0].primitives[0].color, color_for(0));
        assert_eq!(frames[0].primitives[1].color, color_for(1));
        assert_eq!(frames[1].primitives[0].color, color_for(0));
    }

    #[test]
    fn test_reparse_gives_identical_colors() {
        let text = "framestart( drawtriangle [0,0,0][1,0,0][0,1,0] \
                    drawtriangle [0,0,1][1,0,1][0,1,1] frameend(";
        assert_eq!(parse_scene(text), parse_scene(text));
    }

    #[test]
    fn test_unterminated_name_uses_default() {
        let frames = parse_scene(r#"framestart( drawline "oops [0,0,0] [1,1,1]"#);
        let line = &frames[0].primitives[0];
        assert_eq!(line.name, "Unnamed Line");
        assert!(line.vertices.is_empty());
    }

    #[test]
    fn test_truncated_triangle_is_kept_incomplete() {
        let (frames, stats) = SceneParser::default().parse_with_stats("drawtriangle [1,2,3][4,5,6]");
        assert_eq!(frames.len(), 1);
        let tri = &frames[0].primitives[0];
        assert_eq!(
            positions(tri),
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]
        );
        assert!(!tri.is_complete());
        assert_eq!(stats.incomplete_primitives, 1);
    }

    #[test]
    fn test_unterminated_frame_policy() {
        let text = "framestart( drawpoint [1,1,1]";
        let append = SceneParser::default().parse(text);
        assert_eq!(append.len(), 1);
        assert_eq!(append[0].len(), 1);

        let drop = SceneParser::new(ParserOptions {
            unterminated_frame: UnterminatedFramePolicy::Drop,
        })
        .parse(text);
        assert!(drop.is_empty());
    }

    #[test]
    fn test_framestart_discards_open_buffer() {
        let text = "framestart( drawpoint [1,1,1] framestart( drawpoint [2,2,2] frameend(";
        let (frames, stats) = SceneParser::default().parse_with_stats(text);
        assert_eq!(frames.len(), 1);
        assert_eq!(positions(&frames[0].primitives[0]), vec![Vec3::splat(2.0)]);
        assert_eq!(stats.discarded_primitives, 1);
    }

    #[test]
    fn test_empty_frames_and_stray_frameend() {
        let frames = parse_scene("frameend( framestart( frameend( framestart() frameend()");
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(Frame::is_empty));
    }

    #[test]
    fn test_garbage_between_tokens_is_skipped() {
        let text = "log: step 1 ✓ framestart( [ignored] drawpoint \"p\" [1.5,-2,.25] \
                    some text drawlin frameend( trailing";
        let frames = parse_scene(text);
        assert_eq!(frames.len(), 1);
        let point = &frames[0].primitives[0];
        assert_eq!(point.name, "p");
        assert_eq!(positions(point), vec![Vec3::new(1.5, -2.0, 0.25)]);
    }

    #[test]
    fn test_whitespace_and_extra_commas() {
        let text = "framestart( drawline [ 1 , 2 , 3 , 4 , 5 ] [,,7,8,9] frameend(";
        let frames = parse_scene(text);
        let line = &frames[0].primitives[0];
        assert_eq!(
            positions(line),
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(7.0, 8.0, 9.0)]
        );
    }

    #[test]
    fn test_missing_trailing_coordinates_default_to_zero() {
        let frames = parse_scene("framestart( drawpoint [4,5] frameend(");
        assert_eq!(
            positions(&frames[0].primitives[0]),
            vec![Vec3::new(4.0, 5.0, 0.0)]
        );
    }

    #[test]
    fn test_truncated_color_defaults_to_one() {
        let frames = parse_scene("framestart( drawpoint [0,0,0] [0.5,0.25] frameend(");
        assert_eq!(
            frames[0].primitives[0].color,
            Vec4::new(0.5, 0.25, 1.0, 1.0)
        );
    }

    #[test]
    fn test_malformed_number_keeps_default() {
        let (frames, stats) =
            SceneParser::default().parse_with_stats("framestart( drawpoint [1-2,--,3] frameend(");
        assert_eq!(
            positions(&frames[0].primitives[0]),
            vec![Vec3::new(0.0, 0.0, 3.0)]
        );
        assert_eq!(stats.malformed_numbers, 2);
    }

    #[test]
    fn test_out_of_range_number_keeps_default() {
        let huge = "9".repeat(50);
        let text = format!("framestart( drawpoint [{huge},0,0] drawpoint [0,0,0] frameend(");
        let (frames, stats) = SceneParser::default().parse_with_stats(&text);
        assert_eq!(stats.malformed_numbers, 1);
        assert_eq!(positions(&frames[0].primitives[0]), vec![Vec3::ZERO]);

        let mut scene = crate::scene::SceneModel::new();
        scene.replace_frames(frames);
        assert_eq!(scene.frames().len(), 1);
        let fit = crate::fit::fit_view(&scene, &crate::options::FitOptions::default()).unwrap();
        assert!(fit.target.is_finite());
        assert!(fit.distance.is_finite());
        assert!(fit.far_plane.is_finite());
    }

    #[test]
    fn test_unicode_name() {
        let frames = parse_scene("framestart( drawpoint \"größe ✓\" [0,0,0] frameend(");
        assert_eq!(frames[0].primitives[0].name, "größe ✓");
    }

    #[test]
    fn test_case_sensitive_tokens() {
        let frames = parse_scene("FrameStart( DrawPoint [1,1,1] FrameEnd(");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let (frames, stats) = SceneParser::default().parse_with_stats("");
        assert!(frames.is_empty());
        assert_eq!(stats, ParseStats::default());
    }
}
