#![allow(dead_code)]

use digiwork_core::NewPerson;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Raw cell written into a fixture workbook.
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Writes a one-sheet workbook with `header` on row 1 and `rows` below it.
pub fn write_workbook(path: &Path, header: &[&str], rows: &[Vec<Cell<'_>>]) -> PathBuf {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name).unwrap();
    }
    for (row_index, row) in rows.iter().enumerate() {
        let row_number = row_index as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string(row_number, col as u16, *value).unwrap();
                }
                Cell::Number(value) => {
                    worksheet.write_number(row_number, col as u16, *value).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path).unwrap();
    path.to_path_buf()
}

/// Writes a workbook with one column per name and `rows` numbered rows.
///
/// Cell `(r, c)` holds `"<tag>-r<r>c<c>"`.
pub fn write_numbered_workbook(path: &Path, tag: &str, header: &[&str], rows: usize) -> PathBuf {
    let values = (0..rows)
        .map(|row| {
            (0..header.len())
                .map(|col| format!("{tag}-r{row}c{col}"))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let cells = values
        .iter()
        .map(|row| row.iter().map(|value| Cell::Text(value)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    write_workbook(path, header, &cells)
}

pub fn person(first_name: &str, national_id: &str) -> NewPerson {
    NewPerson {
        first_name: first_name.to_string(),
        last_name: "Pérez".to_string(),
        phone: "0414-5550000".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        age: 30,
        national_id: national_id.to_string(),
    }
}
