use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::mapmaker::*;

/// The attribute that names the riding of a map element.
const RIDING_ATTRIBUTE: &str = "data-riding";

/// The start tag of a riding element in the source document.
#[derive(Debug, Clone)]
struct RidingTag {
    name: String,
    /// Byte range of the whole tag, from `<` to `>`.
    span: Range<usize>,
    fill: Option<Rgb>,
}

/// An SVG map whose riding elements carry a `data-riding` attribute.
///
/// The source bytes are kept as they are. Writing the map copies them and
/// only rewrites the `fill` attribute of the riding tags that were coloured,
/// so prefixed attributes, comments and formatting survive untouched.
/// Every commit rewrites the whole document to the output path.
pub struct SvgMap {
    source: Vec<u8>,
    ridings: Vec<RidingTag>,
    output: PathBuf,
    writes: usize,
}

fn riding_attribute(e: &BytesStart) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == RIDING_ATTRIBUTE.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// The range of the value of an attribute inside a raw start tag, quotes
/// excluded. The tag must already be well formed.
fn attribute_value_span(tag: &[u8], name: &[u8]) -> Option<Range<usize>> {
    let len = tag.len();
    let mut i = 1;
    while i < len && !tag[i].is_ascii_whitespace() && tag[i] != b'>' && tag[i] != b'/' {
        i += 1;
    }
    loop {
        while i < len && tag[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len || tag[i] == b'>' || tag[i] == b'/' {
            return None;
        }
        let key_start = i;
        while i < len && !tag[i].is_ascii_whitespace() && tag[i] != b'=' {
            i += 1;
        }
        let key = &tag[key_start..i];
        while i < len && tag[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len || tag[i] != b'=' {
            return None;
        }
        i += 1;
        while i < len && tag[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len || (tag[i] != b'"' && tag[i] != b'\'') {
            return None;
        }
        let quote = tag[i];
        i += 1;
        let value_start = i;
        while i < len && tag[i] != quote {
            i += 1;
        }
        if i >= len {
            return None;
        }
        if key == name {
            return Some(value_start..i);
        }
        i += 1;
    }
}

/// The raw start tag with its `fill` replaced, or appended after the last
/// attribute when the tag has none.
fn with_fill(tag: &[u8], fill: Rgb) -> Vec<u8> {
    let value = fill.to_string();
    match attribute_value_span(tag, b"fill") {
        Some(r) => [&tag[..r.start], value.as_bytes(), &tag[r.end..]].concat(),
        None => {
            let close = if tag.ends_with(b"/>") {
                tag.len() - 2
            } else {
                tag.len().saturating_sub(1)
            };
            let insert_at = tag[..close]
                .iter()
                .rposition(|b| !b.is_ascii_whitespace())
                .map(|i| i + 1)
                .unwrap_or(close);
            let attr = format!(" fill=\"{}\"", value);
            [&tag[..insert_at], attr.as_bytes(), &tag[insert_at..]].concat()
        }
    }
}

impl SvgMap {
    pub fn read(path: &str, output: &Path) -> BMapResult<SvgMap> {
        let bytes = fs::read(path).context(OpeningSvgSnafu { path })?;
        let map = SvgMap::parse(&bytes, output).context(ParsingSvgSnafu { path })?;
        debug!("SvgMap::read: {}: {} ridings", path, map.ridings.len());
        Ok(map)
    }

    /// Finds the riding tags below the root element, in document order.
    pub fn parse(bytes: &[u8], output: &Path) -> Result<SvgMap, quick_xml::Error> {
        let mut reader = Reader::from_reader(bytes);
        let mut ridings: Vec<RidingTag> = Vec::new();
        let mut seen_root = false;
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    if !seen_root {
                        seen_root = true;
                        continue;
                    }
                    if let Some(name) = riding_attribute(&e)? {
                        // Attribute values cannot hold a raw `<`: the last one
                        // opens this tag.
                        let end = reader.buffer_position() as usize;
                        let start = bytes[..end]
                            .iter()
                            .rposition(|b| *b == b'<')
                            .unwrap_or(0);
                        ridings.push(RidingTag {
                            name,
                            span: start..end,
                            fill: None,
                        });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(SvgMap {
            source: bytes.to_vec(),
            ridings,
            output: output.to_path_buf(),
            writes: 0,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut res: Vec<u8> = Vec::with_capacity(self.source.len() + 16 * self.ridings.len());
        let mut pos = 0;
        for tag in self.ridings.iter() {
            res.extend_from_slice(&self.source[pos..tag.span.start]);
            let raw = &self.source[tag.span.clone()];
            match tag.fill {
                Some(fill) => res.extend_from_slice(&with_fill(raw, fill)),
                None => res.extend_from_slice(raw),
            }
            pos = tag.span.end;
        }
        res.extend_from_slice(&self.source[pos..]);
        res
    }

    /// Number of times the document was written.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RidingMap for SvgMap {
    type Error = Box<MapError>;

    fn riding_names(&self) -> Vec<String> {
        self.ridings.iter().map(|t| t.name.clone()).collect()
    }

    fn set_fill(&mut self, position: usize, fill: Rgb) {
        match self.ridings.get_mut(position) {
            Some(tag) => tag.fill = Some(fill),
            None => warn!("set_fill: no riding element at position {}", position),
        }
    }

    fn commit(&mut self) -> BMapResult<()> {
        let path = self.output.display().to_string();
        fs::write(&self.output, self.to_bytes()).context(CreatingOutputSnafu { path })?;
        self.writes += 1;
        Ok(())
    }
}
