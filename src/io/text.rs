/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Plain-text dumps of real-space fields
//!
//! A header is followed by the field values, x fastest, then y, then z,
//! five values per line.

use crate::grid::Mesh;
use ndarray::Array3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const VALUES_PER_LINE: usize = 5;

/// Header line pair `# <title>` / `# nr1= .. nr2= .. nr3= ..`
pub fn field_header(title: &str, mesh: Mesh) -> String {
    let [nr1, nr2, nr3] = mesh.dims();
    format!("# {}\n# nr1= {} nr2= {} nr3= {}\n", title, nr1, nr2, nr3)
}

/// Scientific notation with nine decimals and a signed two-digit exponent
///
/// `1.0` becomes `1.000000000E+00`, `-0.00123` becomes `-1.230000000E-03`.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value).to_uppercase();
    }

    let formatted = format!("{:.9E}", value);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}E{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

/// Write `header` and then every value of `field`
pub fn write_field<W: Write>(writer: &mut W, field: &Array3<f64>, header: &str) -> io::Result<()> {
    writer.write_all(header.as_bytes())?;

    let (nx, ny, nz) = field.dim();
    let mut count = 0;
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                write!(writer, "  {}", format_value(field[[x, y, z]]))?;
                count += 1;
                if count % VALUES_PER_LINE == 0 {
                    writeln!(writer)?;
                }
            }
        }
    }
    if count % VALUES_PER_LINE != 0 {
        writeln!(writer)?;
    }
    Ok(())
}

/// Create or truncate `path` and write the field into it
pub fn write_field_file(path: &Path, field: &Array3<f64>, header: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_field(&mut writer, field, header)?;
    writer.flush()
}
