//! Reading and writing XYZ point files.
//!
//! The format is a header line followed by one `x y z` record per line.
//! Fields may be separated by tabs or spaces; columns after the third are
//! ignored on input. Output always uses a `x\ty\tz` header and tab-separated
//! records in cloud order, with floats printed in their shortest round-trip
//! form.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::cloud::PointCloud;
use crate::error::XyzError;
use crate::types::Point;

/// Header written at the top of every file.
pub const XYZ_HEADER: &str = "x\ty\tz";

/// Parse XYZ records from `reader`. The first line is treated as a header.
///
/// Blank lines are skipped. The returned cloud is unnamed.
pub fn parse_xyz<R: BufRead>(reader: R) -> Result<PointCloud, XyzError> {
    let mut cloud = PointCloud::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_no = idx + 1;
        let mut fields = line.split_whitespace();

        let Some(first) = fields.next() else {
            continue;
        };
        let mut coords = [0.0f64; 3];
        for (axis, slot) in coords.iter_mut().enumerate() {
            let token = if axis == 0 { Some(first) } else { fields.next() };
            let token = token.ok_or_else(|| XyzError::Parse {
                line: line_no,
                message: format!("expected 3 coordinates, found {axis}"),
            })?;
            *slot = token.parse().map_err(|e| XyzError::Parse {
                line: line_no,
                message: format!("invalid coordinate `{token}`: {e}"),
            })?;
        }

        cloud.add(Point::new(coords[0], coords[1], coords[2]))?;
    }

    Ok(cloud)
}

/// Load an XYZ file.
///
/// The cloud is named after `path` with a trailing `.xyz` extension removed,
/// e.g. `scans/PointCloud1.xyz` becomes `scans/PointCloud1`.
pub fn read_xyz<P: AsRef<Path>>(path: P) -> Result<PointCloud, XyzError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut cloud = parse_xyz(BufReader::new(file))?;
    cloud.set_name(cloud_name_for(path));
    log::debug!("read {} points from {}", cloud.len(), path.display());
    Ok(cloud)
}

/// Write `cloud` as XYZ records to `writer`.
pub fn write_xyz_to<W: Write>(cloud: &PointCloud, mut writer: W) -> Result<(), XyzError> {
    writeln!(writer, "{XYZ_HEADER}")?;
    for p in cloud {
        writeln!(writer, "{}\t{}\t{}", p.x, p.y, p.z)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `cloud` to the file at `path`, replacing any existing file.
pub fn write_xyz<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<(), XyzError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_xyz_to(cloud, BufWriter::new(file))?;
    log::debug!("wrote {} points to {}", cloud.len(), path.display());
    Ok(())
}

fn cloud_name_for(path: &Path) -> String {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("xyz") => {
            path.with_extension("").to_string_lossy().into_owned()
        }
        _ => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_tab_and_space_separated_records() {
        let text = "x\ty\tz\n1.5\t-2\t3e-1\n\n4 5 6 0.9\n";
        let cloud = parse_xyz(Cursor::new(text)).unwrap();
        assert_eq!(
            cloud.as_slice(),
            &[Point::new(1.5, -2.0, 0.3), Point::new(4.0, 5.0, 6.0)]
        );
        assert_eq!(cloud.name(), None);
    }

    #[test]
    fn header_only_and_empty_inputs_give_empty_clouds() {
        assert!(parse_xyz(Cursor::new("x\ty\tz\n")).unwrap().is_empty());
        assert!(parse_xyz(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn short_record_reports_line_number() {
        let err = parse_xyz(Cursor::new("x y z\n1 2 3\n4 5\n")).unwrap_err();
        match err {
            XyzError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_number_is_a_parse_error() {
        let err = parse_xyz(Cursor::new("x y z\n1 two 3\n")).unwrap_err();
        assert!(matches!(err, XyzError::Parse { line: 2, .. }));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let err = parse_xyz(Cursor::new("x y z\n1 NaN 3\n")).unwrap_err();
        assert!(matches!(err, XyzError::Cloud(_)));
    }

    #[test]
    fn writes_header_and_tab_separated_records() {
        let cloud =
            PointCloud::from_points([Point::new(0.1, -2.0, 3.25), Point::new(1e-7, 0.0, 5.0)])
                .unwrap();
        let mut out = Vec::new();
        write_xyz_to(&cloud, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "x\ty\tz\n0.1\t-2\t3.25\n0.0000001\t0\t5\n");
    }

    #[test]
    fn cloud_name_strips_xyz_extension() {
        assert_eq!(cloud_name_for(Path::new("PointCloud1.xyz")), "PointCloud1");
        assert_eq!(cloud_name_for(Path::new("dir/scan.XYZ")), "dir/scan");
        assert_eq!(cloud_name_for(Path::new("scan.txt")), "scan.txt");
    }
}
