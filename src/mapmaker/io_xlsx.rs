use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::mapmaker::*;

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> BMapResult<Range<DataType>> {
    debug!(
        "read_results_xlsx: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet_name_o {
        Some(worksheet_name) => workbook
            .worksheet_range(worksheet_name)
            .context(EmptyExcelSnafu {
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?,
        // Without a name, the first worksheet holds the results.
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { name: "#0" })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

/// The text of a cell, as it would appear in the results table.
///
/// Numbers are already percentages: 45.5 stands for 45.5%.
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Empty => "".to_string(),
        x => format!("{:?}", x),
    }
}

/// The fields of a row, without the empty cells at the end of the row.
fn row_fields(row: &[DataType]) -> Vec<String> {
    let mut fields: Vec<String> = row.iter().map(cell_text).collect();
    while fields.last().map(|f| f.is_empty()).unwrap_or(false) {
        fields.pop();
    }
    fields
}

/// Reads the results table from an Excel workbook, one riding per row.
pub fn read_results_xlsx(
    path: &str,
    worksheet_name_o: Option<&str>,
    builder: &mut ResultStoreBuilder,
) -> BMapResult<usize> {
    let wrange = get_range(path, worksheet_name_o)?;
    let mut added = 0;
    for (idx, row) in wrange.rows().enumerate() {
        let fields = row_fields(row);
        if fields.is_empty() {
            continue;
        }
        let parts: Vec<&str> = fields.iter().map(|s| s.as_str()).collect();
        match builder.add_fields(&parts) {
            Ok(riding) => {
                debug!("read_results_xlsx: row {}: {}", idx, riding);
                added += 1;
            }
            Err(skip) => debug!("read_results_xlsx: row {}: {}", idx, skip),
        }
    }
    Ok(added)
}
