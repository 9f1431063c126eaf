//! Rendering a packed font as C source for the embedded runtime.
//!
//! The generated files declare a `lumina_font_t` named `<name>_font` which
//! points at three arrays: the packed bitmap, the per-glyph metadata and the
//! lookup table.

use std::{
    fmt::{self, Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use crate::{Bpp, Error, IndexTable, IndexingMode, Options, PackedFont};

const INDENT: &str = "    ";
const RULE_WIDTH: usize = 120;
const COMMAND_WIDTH: usize = 110;
const COMMAND_INDENT: &str = "//          ";

/// Details about the run that are repeated at the top of each file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    pub name: String,
    pub height: u32,
    pub bpp: Bpp,
    /// File name of the converted font, without its directory.
    pub font_file: String,
    /// The command line that produced the output.
    pub command: String,
}

impl SourceInfo {
    pub fn new(options: &Options, command: impl Into<String>) -> Self {
        let font_file = options
            .font
            .file_name()
            .unwrap_or(options.font.as_os_str())
            .to_string_lossy()
            .into_owned();
        Self {
            name: options.name.clone(),
            height: options.height,
            bpp: options.bpp,
            font_file,
            command: command.into(),
        }
    }
}

/// The generated `<name>.h`.
pub struct CHeader<'a> {
    pub info: &'a SourceInfo,
    pub font: &'a PackedFont,
}

/// The generated `<name>.c`.
pub struct CSource<'a> {
    pub info: &'a SourceInfo,
    pub font: &'a PackedFont,
}

impl Display for CHeader<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "#pragma once\n")?;
        write_info(f, self.info)?;
        if self.font.mode() == IndexingMode::Sparse {
            let prefix = self.info.name.to_ascii_uppercase();
            for (position, meta) in self.font.metadata.iter().enumerate() {
                writeln!(f, "#define {prefix}_GLYPH_{:X} {position}", meta.code)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "extern const lumina_font_t {}_font;", self.info.name)
    }
}

impl Display for CSource<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.info.name;
        writeln!(f, "#include \"lumina_font.h\"")?;
        writeln!(f, "#include \"{name}.h\"\n")?;
        write_info(f, self.info)?;
        write_bitmap(f, name, self.font)?;
        write_metadata(f, name, self.font)?;
        write_lookup_table(f, name, self.font)?;
        write_font(f, name, self.font)
    }
}

/// Writes `<name>.h` and `<name>.c` into `dir`, creating it if needed.
///
/// Returns the paths of the header and the source.
pub fn write_output(
    dir: &Path,
    info: &SourceInfo,
    font: &PackedFont,
) -> Result<(PathBuf, PathBuf), Error> {
    let header = CHeader { info, font }.to_string();
    let source = CSource { info, font }.to_string();
    fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_owned(),
        source,
    })?;
    let header_path = dir.join(format!("{}.h", info.name));
    let source_path = dir.join(format!("{}.c", info.name));
    for (path, contents) in [(&header_path, header), (&source_path, source)] {
        fs::write(path, contents).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("wrote {}", path.display());
    }
    Ok((header_path, source_path))
}

fn write_info(f: &mut Formatter<'_>, info: &SourceInfo) -> fmt::Result {
    let rule = "-".repeat(RULE_WIDTH);
    writeln!(f, "// {rule}")?;
    writeln!(f, "// Font name: {}", info.name)?;
    writeln!(f, "// Font height: {}px", info.height)?;
    writeln!(f, "// Font bpp: {}", info.bpp)?;
    writeln!(f, "// Font file: {}", info.font_file)?;
    writeln!(f, "//")?;
    writeln!(f, "// Generated with pakka v{}", env!("CARGO_PKG_VERSION"))?;
    for (i, line) in wrap(&info.command, COMMAND_WIDTH).iter().enumerate() {
        if i == 0 {
            writeln!(f, "// Command: {line}")?;
        } else {
            writeln!(f, "{COMMAND_INDENT}{line}")?;
        }
    }
    writeln!(f, "// {rule}\n")
}

fn write_bitmap(f: &mut Formatter<'_>, name: &str, font: &PackedFont) -> fmt::Result {
    writeln!(f, "static const uint8_t {name}_glyph_bitmap[] = {{")?;
    for (i, meta) in font.metadata.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        writeln!(
            f,
            "{INDENT}// Code: {}, Width: {}, Height: {}",
            CodeLabel(meta.code),
            meta.width,
            meta.height
        )?;
        let stride = font.bpp.bytes_per_row(meta.width);
        if stride == 0 {
            continue;
        }
        let len = stride * meta.height as usize;
        let bytes = &font.bitmap[meta.bitmap_index..meta.bitmap_index + len];
        for row in bytes.chunks(stride) {
            write!(f, "{INDENT}")?;
            for (x, byte) in row.iter().enumerate() {
                let sep = if x == 0 { "" } else { " " };
                write!(f, "{sep}0x{byte:02x},")?;
            }
            writeln!(f)?;
        }
    }
    writeln!(f, "}};\n")
}

fn write_metadata(f: &mut Formatter<'_>, name: &str, font: &PackedFont) -> fmt::Result {
    fn widest<T: ToString>(values: impl Iterator<Item = T>) -> usize {
        values.map(|value| value.to_string().len()).max().unwrap_or(1)
    }
    let metadata = &font.metadata;
    let w = widest(metadata.iter().map(|m| m.width));
    let h = widest(metadata.iter().map(|m| m.height));
    let a = widest(metadata.iter().map(|m| m.advance));
    let y = widest(metadata.iter().map(|m| m.baseline_offset));
    let b = widest(metadata.iter().map(|m| m.bitmap_index));

    writeln!(
        f,
        "static const lumina_font_glyph_metadata_t {name}_glyph_metadata[] = {{"
    )?;
    for meta in metadata {
        writeln!(
            f,
            "{INDENT}{{ .width = {:w$}, .height = {:h$}, .advance = {:a$}, \
             .y_offset = {:y$}, .bitmap_index = {:b$} }}, // Code: {}",
            meta.width,
            meta.height,
            meta.advance,
            meta.baseline_offset,
            meta.bitmap_index,
            CodeLabel(meta.code),
        )?;
    }
    writeln!(f, "}};\n")
}

fn write_lookup_table(f: &mut Formatter<'_>, name: &str, font: &PackedFont) -> fmt::Result {
    let index = &font.index;
    let pad = index
        .entries()
        .iter()
        .map(|entry| entry.to_string().len())
        .max()
        .unwrap_or(1);
    writeln!(
        f,
        "static const {} {name}_glyph_lut[] = {{",
        lut_element_type(index)
    )?;
    for (slot, entry) in index.entries().iter().enumerate() {
        let code = match index.mode() {
            IndexingMode::Ascii => index.first_valid_index() + slot as u32,
            IndexingMode::Sparse => font.metadata[*entry as usize - 1].code,
        };
        let unused = if *entry == IndexTable::UNUSED {
            " (unused)"
        } else {
            ""
        };
        writeln!(
            f,
            "{INDENT}{:pad$}, // Code: {}{unused}",
            entry,
            CodeLabel(code)
        )?;
    }
    writeln!(f, "}};\n")
}

fn write_font(f: &mut Formatter<'_>, name: &str, font: &PackedFont) -> fmt::Result {
    writeln!(f, "const lumina_font_t {name}_font = {{")?;
    writeln!(f, "{INDENT}.bpp = {},", font.bpp)?;
    writeln!(f, "{INDENT}.first_valid_index = {},", font.first_valid_index())?;
    writeln!(f, "{INDENT}.last_valid_index = {},", font.last_valid_index())?;
    writeln!(f, "{INDENT}.glyph_lut = {name}_glyph_lut,")?;
    writeln!(f, "{INDENT}.glyph_bitmap = {name}_glyph_bitmap,")?;
    writeln!(f, "{INDENT}.glyph_metadata = {name}_glyph_metadata,")?;
    writeln!(
        f,
        "{INDENT}.indexing_mode = LUMINA_FONT_INDEXING_MODE_{},",
        font.mode()
    )?;
    writeln!(f, "}};")
}

/// The narrowest C integer type that holds every entry of the table.
fn lut_element_type(index: &IndexTable) -> &'static str {
    match index.entries().iter().max().copied().unwrap_or_default() {
        0..=0xFF => "uint8_t",
        0x100..=0xFFFF => "uint16_t",
        _ => "uint32_t",
    }
}

/// Prints a code in decimal when it is ASCII and in hex otherwise.
struct CodeLabel(u32);

impl Display for CodeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0 < 128 {
            write!(f, "{}", self.0)
        } else {
            write!(f, "0x{:X}", self.0)
        }
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bpp, GlyphBuffer, GlyphSet};

    fn info() -> SourceInfo {
        SourceInfo {
            name: "tiny".into(),
            height: 8,
            bpp: Bpp::One,
            font_file: "Tiny.ttf".into(),
            command: "pakka --bpp 1".into(),
        }
    }

    fn font(codes: &[u32]) -> PackedFont {
        let glyphs = codes
            .iter()
            .enumerate()
            .map(|(i, code)| {
                let mut data = vec![0; 8 * 2];
                data[i % 8] = 1;
                GlyphBuffer::new(*code, Bpp::One, 8, 2, data).with_metrics(9, i as i32)
            })
            .collect();
        PackedFont::new(&GlyphSet::new(Bpp::One, glyphs).unwrap())
    }

    #[test]
    fn ascii_source() {
        let font = font(&[65, 67]);
        let source = CSource {
            info: &info(),
            font: &font,
        }
        .to_string();
        assert!(source.starts_with("#include \"lumina_font.h\"\n#include \"tiny.h\"\n\n// ---"));
        assert!(source.contains("// Font height: 8px\n"));
        assert!(source.contains("// Command: pakka --bpp 1\n"));
        assert!(source.contains(
            "static const uint8_t tiny_glyph_bitmap[] = {\n    \
             // Code: 65, Width: 8, Height: 2\n    0x80,\n    0x00,\n\n    \
             // Code: 67, Width: 8, Height: 2\n    0x40,\n    0x00,\n};\n"
        ));
        assert!(source.contains(
            "    { .width = 8, .height = 2, .advance = 9, .y_offset = 1, .bitmap_index = 2 }, \
             // Code: 67\n"
        ));
        assert!(source.contains(
            "static const uint8_t tiny_glyph_lut[] = {\n    \
             1, // Code: 65\n    0, // Code: 66 (unused)\n    2, // Code: 67\n};\n"
        ));
        assert!(source.contains("    .first_valid_index = 65,\n    .last_valid_index = 67,\n"));
        assert!(source.ends_with("    .indexing_mode = LUMINA_FONT_INDEXING_MODE_ASCII,\n};\n"));
    }

    #[test]
    fn sparse_header_defines_positions() {
        let font = font(&[0x20AC, 65]);
        let header = CHeader {
            info: &info(),
            font: &font,
        }
        .to_string();
        assert!(header.starts_with("#pragma once\n\n"));
        assert!(header.contains("#define TINY_GLYPH_20AC 0\n#define TINY_GLYPH_41 1\n\n"));
        assert!(header.ends_with("extern const lumina_font_t tiny_font;\n"));

        let source = CSource {
            info: &info(),
            font: &font,
        }
        .to_string();
        assert!(source.contains("// Code: 0x20AC, Width: 8, Height: 2"));
        assert!(source.contains("    1, // Code: 0x20AC\n    2, // Code: 65\n"));
        assert!(source.contains("LUMINA_FONT_INDEXING_MODE_UNICODE"));
    }

    #[test]
    fn ascii_header_has_no_defines() {
        let font = font(&[65]);
        let header = CHeader {
            info: &info(),
            font: &font,
        }
        .to_string();
        assert!(!header.contains("#define"));
    }

    #[test]
    fn wide_tables_use_wider_entries() {
        let codes: Vec<u32> = (0x100..0x100 + 300).collect();
        let wide = font(&codes);
        assert_eq!(lut_element_type(&wide.index), "uint16_t");
        assert_eq!(lut_element_type(&font(&[65]).index), "uint8_t");
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap("a bb ccc dd", 6), ["a bb", "ccc dd"]);
        assert_eq!(wrap("abcdefgh ij", 4), ["abcdefgh", "ij"]);
        assert_eq!(wrap("", 4), [""]);
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated");
        let (header, source) = write_output(&out, &info(), &font(&[65])).unwrap();
        assert_eq!(header, out.join("tiny.h"));
        assert_eq!(source, out.join("tiny.c"));
        assert!(fs::read_to_string(header).unwrap().contains("tiny_font"));
        assert!(fs::read_to_string(source).unwrap().contains("tiny_glyph_lut"));
    }
}
