use super::traits::SnapshotFile;
use crate::core::models::particle::Particle;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

const COLUMN_SEPARATOR: &str = "    ";

/// A set of particle positions with the two-line XYZ header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzSnapshot {
    pub comment: String,
    pub positions: Vec<Point3<f64>>,
}

impl XyzSnapshot {
    pub fn new(comment: impl Into<String>, positions: Vec<Point3<f64>>) -> Self {
        Self {
            comment: comment.into(),
            positions,
        }
    }

    pub fn from_particles(comment: impl Into<String>, particles: &[Particle]) -> Self {
        Self::new(comment, particles.iter().map(|p| p.position).collect())
    }
}

/// Builds the comment line written for run snapshots, e.g.
/// `Initial : initial values-- clusters 75:23 -- relative velocity (1,0,0)`.
pub fn run_comment(name: &str, cluster_sizes: [usize; 2], relative_velocity: &Vector3<f64>) -> String {
    format!(
        "{} : initial values-- clusters {}:{} -- relative velocity ({},{},{})",
        name,
        cluster_sizes[0],
        cluster_sizes[1],
        relative_velocity.x,
        relative_velocity.y,
        relative_velocity.z
    )
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing header line: {0}")]
    MissingHeader(&'static str),
    #[error("Invalid particle count '{0}'")]
    InvalidCount(String),
    #[error("Parse error on line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },
    #[error("Header declares {declared} particle(s) but {found} position line(s) were found")]
    CountMismatch { declared: usize, found: usize },
}

pub struct XyzFile;

impl SnapshotFile for XyzFile {
    type Snapshot = XyzSnapshot;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Snapshot, Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().ok_or(XyzError::MissingHeader("particle count"))??;
        let declared: usize = count_line
            .trim()
            .parse()
            .map_err(|_| XyzError::InvalidCount(count_line.trim().to_string()))?;
        let comment = lines.next().ok_or(XyzError::MissingHeader("comment"))??;

        let mut positions = Vec::new();
        for (idx, line_res) in lines.enumerate() {
            let line = line_res?;
            if line.trim().is_empty() {
                continue;
            }
            let line_num = idx + 3;
            let malformed = || XyzError::MalformedLine {
                line: line_num,
                content: line.clone(),
            };

            // Element-prefixed lines ("Ar x y z") carry the coordinates in the last three columns.
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let coords = match tokens.len() {
                3 => &tokens[..],
                4 => &tokens[1..],
                _ => return Err(malformed()),
            };
            let mut xyz = [0.0; 3];
            for (slot, token) in xyz.iter_mut().zip(coords) {
                *slot = token.parse().map_err(|_| malformed())?;
            }
            positions.push(Point3::from(xyz));
        }

        if positions.len() != declared {
            return Err(XyzError::CountMismatch {
                declared,
                found: positions.len(),
            });
        }
        Ok(XyzSnapshot { comment, positions })
    }

    fn write_to(snapshot: &Self::Snapshot, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", snapshot.positions.len())?;
        writeln!(writer, "{}", snapshot.comment)?;
        for p in &snapshot.positions {
            writeln!(
                writer,
                "{}{sep}{}{sep}{}",
                p.x,
                p.y,
                p.z,
                sep = COLUMN_SEPARATOR
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const TOLERANCE: f64 = 1e-12;

    fn sample_snapshot() -> XyzSnapshot {
        XyzSnapshot::new(
            "Initial : test",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.25, -3.5, 1e-7),
                Point3::new(0.1, 0.2, 0.30000000000000004),
            ],
        )
    }

    #[test]
    fn write_to_produces_count_comment_and_position_lines() {
        let mut buffer = Vec::new();
        XyzFile::write_to(&sample_snapshot(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "3");
        assert_eq!(lines[1], "Initial : test");
        assert_eq!(lines[2], "0    0    0");
        assert_eq!(lines[3], "1.25    -3.5    0.0000001");
    }

    #[test]
    fn snapshot_survives_a_round_trip_through_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Final.xyz");
        let snapshot = sample_snapshot();

        XyzFile::write_to_path(&snapshot, &path).unwrap();
        let read_back = XyzFile::read_from_path(&path).unwrap();

        assert_eq!(read_back.comment, snapshot.comment);
        assert_eq!(read_back.positions.len(), snapshot.positions.len());
        for (a, b) in read_back.positions.iter().zip(&snapshot.positions) {
            assert!((a - b).norm() < TOLERANCE);
        }
    }

    #[test]
    fn read_from_accepts_element_prefixed_lines() {
        let mut cursor = Cursor::new("2\ncomment\nAr 1 2 3\nAr 4 5 6\n");
        let snapshot = XyzFile::read_from(&mut cursor).unwrap();
        assert_eq!(snapshot.positions[1], Point3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn read_from_rejects_count_mismatch() {
        let mut cursor = Cursor::new("3\ncomment\n0 0 0\n1 1 1\n");
        assert!(matches!(
            XyzFile::read_from(&mut cursor),
            Err(XyzError::CountMismatch {
                declared: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn read_from_rejects_huge_declared_count_without_allocating() {
        let mut cursor = Cursor::new(format!("{}\ncomment\n0 0 0\n", usize::MAX));
        assert!(matches!(
            XyzFile::read_from(&mut cursor),
            Err(XyzError::CountMismatch {
                declared: usize::MAX,
                found: 1
            })
        ));
    }

    #[test]
    fn read_from_reports_malformed_line_number() {
        let mut cursor = Cursor::new("2\ncomment\n0 0 0\n1 x 1\n");
        assert!(matches!(
            XyzFile::read_from(&mut cursor),
            Err(XyzError::MalformedLine { line: 4, .. })
        ));
    }

    #[test]
    fn read_from_requires_both_header_lines() {
        assert!(matches!(
            XyzFile::read_from(&mut Cursor::new("")),
            Err(XyzError::MissingHeader("particle count"))
        ));
        assert!(matches!(
            XyzFile::read_from(&mut Cursor::new("0\n")),
            Err(XyzError::MissingHeader("comment"))
        ));
        assert!(matches!(
            XyzFile::read_from(&mut Cursor::new("many\nc\n")),
            Err(XyzError::InvalidCount(_))
        ));
    }

    #[test]
    fn run_comment_formats_sizes_and_relative_velocity() {
        let comment = run_comment("Initial", [75, 23], &Vector3::new(-1.0, 0.5, 0.0));
        assert_eq!(
            comment,
            "Initial : initial values-- clusters 75:23 -- relative velocity (-1,0.5,0)"
        );
    }

    #[test]
    fn from_particles_copies_positions_in_order() {
        let particles = vec![
            Particle::new(Point3::new(1.0, 0.0, 0.0), Vector3::zeros()),
            Particle::new(Point3::new(2.0, 0.0, 0.0), Vector3::zeros()),
        ];
        let snapshot = XyzSnapshot::from_particles("c", &particles);
        assert_eq!(snapshot.positions, vec![Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]);
    }
}
