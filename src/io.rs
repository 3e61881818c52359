use crate::table::ExportTable;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Marqueur d'ordre des octets UTF-8 (Excel ouvre alors le CSV en UTF-8).
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Largeur maximale d'une colonne de tableur (en caractères).
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Export CSV : BOM UTF-8, séparateur virgule, ligne d'en-tête puis une ligne par événement.
pub fn write_csv<W: Write>(mut out: W, table: &ExportTable) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut w = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    w.write_record(table.headers())?;
    for row in table.rows() {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Relit un CSV produit par [`write_csv`] : (en-têtes, lignes), BOM retiré.
pub fn read_csv<R: Read>(mut input: R) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(raw.as_slice());

    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(body);
    let headers = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        rows.push(rec.iter().map(str::to_owned).collect());
    }
    Ok((headers, rows))
}

/// Export CSV vers un fichier, de manière atomique.
pub fn export_csv<P: AsRef<Path>>(path: P, table: &ExportTable) -> Result<()> {
    write_atomic(path.as_ref(), |tmp| write_csv(tmp, table))
}

/// Écrit dans un fichier temporaire voisin puis renomme.
fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    fill(&mut tmp)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Largeur de chaque colonne : plus longue ligne (en-tête compris) + marge, plafonnée.
pub fn column_widths(table: &ExportTable) -> Vec<usize> {
    table
        .headers()
        .into_iter()
        .enumerate()
        .map(|(col, header)| {
            let content = table
                .rows()
                .iter()
                .map(|row| longest_line(&row[col]))
                .chain(std::iter::once(longest_line(header)))
                .max()
                .unwrap_or(0);
            (content + 2).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn longest_line(cell: &str) -> usize {
    cell.lines().map(|l| l.chars().count()).max().unwrap_or(0)
}

#[cfg(feature = "xlsx")]
pub use self::xlsx::{export_xlsx, render_xlsx};

#[cfg(feature = "xlsx")]
mod xlsx {
    use super::{column_widths, write_atomic};
    use crate::table::ExportTable;
    use anyhow::{Context, Result};
    use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
    use std::io::Write;
    use std::path::Path;

    pub const SHEET_NAME: &str = "Anwesenheiten";

    /// Classeur d'une feuille : en-tête en gras et figé, cellules à retour à la ligne.
    pub fn render_xlsx(table: &ExportTable) -> Result<Vec<u8>> {
        let header = Format::new()
            .set_bold()
            .set_background_color(0xD9E1F2)
            .set_border(FormatBorder::Thin);
        let cell = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, title) in table.headers().into_iter().enumerate() {
            let col = u16::try_from(col).context("too many columns")?;
            sheet.write_string_with_format(0, col, title, &header)?;
        }
        for (idx, row) in table.rows().iter().enumerate() {
            let line = u32::try_from(idx + 1).context("too many rows")?;
            for (col, value) in row.iter().enumerate() {
                let col = u16::try_from(col).context("too many columns")?;
                sheet.write_string_with_format(line, col, value, &cell)?;
            }
        }
        for (col, width) in column_widths(table).into_iter().enumerate() {
            let col = u16::try_from(col).context("too many columns")?;
            sheet.set_column_width(col, width as f64)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        let buffer = workbook
            .save_to_buffer()
            .context("rendering spreadsheet")?;
        Ok(buffer)
    }

    pub fn export_xlsx<P: AsRef<Path>>(path: P, table: &ExportTable) -> Result<()> {
        let bytes = render_xlsx(table)?;
        write_atomic(path.as_ref(), |tmp| {
            tmp.write_all(&bytes)?;
            Ok(())
        })
    }
}
