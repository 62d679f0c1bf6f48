//! Reader and writer for single-output PLA tables.
//!
//! Covers the plain Berkeley subset: `.i`/`.o`/`.p` headers, `#`
//! comments, one cube per line with an output column (`1` on-set, `-`
//! don't-care, `0` off-set, which is implicit and skipped) and a
//! terminating `.e`. Unknown dot directives are ignored.

use std::fmt::Write as _;

use crate::cube::Cube;
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct Pla {
    pub inputs: usize,
    pub on_set: Vec<Cube>,
    pub dc_set: Vec<Cube>,
}

impl Pla {
    /// Parses a PLA table from text.
    pub fn parse(text: &str) -> Result<Pla, Error> {
        let mut pla = Pla::default();
        let mut saw_inputs = false;
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('.') {
                let mut words = rest.split_whitespace();
                match words.next() {
                    Some("e") | Some("end") => break,
                    Some("i") => {
                        pla.inputs = words
                            .next()
                            .and_then(|w| w.parse().ok())
                            .ok_or_else(|| Error::MalformedPla(line.to_string()))?;
                        saw_inputs = true;
                    }
                    // .o, .p, label directives and the like carry no
                    // information for a single-output table.
                    _ => {}
                }
                continue;
            }

            let mut words = line.split_whitespace();
            let pattern = words
                .next()
                .ok_or_else(|| Error::MalformedPla(line.to_string()))?;
            if saw_inputs && pattern.chars().count() != pla.inputs {
                return Err(Error::MalformedPla(line.to_string()));
            }
            if !saw_inputs {
                pla.inputs = pla.inputs.max(pattern.chars().count());
            }
            let cube: Cube = pattern.parse()?;
            match words.next() {
                None | Some("1") => pla.on_set.push(cube),
                Some("-") | Some("~") | Some("2") => pla.dc_set.push(cube),
                Some("0") => {}
                Some(_) => return Err(Error::MalformedPla(line.to_string())),
            }
        }
        Ok(pla)
    }

    /// Renders a cover as a PLA table.
    pub fn write(inputs: usize, cubes: &[Cube]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, ".i {inputs}");
        let _ = writeln!(out, ".o 1");
        let _ = writeln!(out, ".p {}", cubes.len());
        for cube in cubes {
            let mut row = cube.to_string();
            while row.chars().count() < inputs {
                row.push('-');
            }
            let _ = writeln!(out, "{row} 1");
        }
        out.push_str(".e\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_table() {
        let text = "\
# two-input example
.i 2
.o 1
.p 3
11 1
10 1
0- -
.e
";
        let pla = Pla::parse(text).unwrap();
        assert_eq!(pla.inputs, 2);
        assert_eq!(pla.on_set.len(), 2);
        assert_eq!(pla.dc_set.len(), 1);
        assert_eq!(pla.on_set[0], "11".parse().unwrap());
        assert_eq!(pla.dc_set[0], "0-".parse().unwrap());
    }

    #[test]
    fn test_parse_infers_width() {
        let pla = Pla::parse("1-0 1\n-11 1\n").unwrap();
        assert_eq!(pla.inputs, 3);
        assert_eq!(pla.on_set.len(), 2);
    }

    #[test]
    fn test_parse_skips_off_rows() {
        let pla = Pla::parse(".i 1\n1 1\n0 0\n.e\n").unwrap();
        assert_eq!(pla.on_set.len(), 1);
        assert!(pla.dc_set.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        assert!(Pla::parse(".i 2\n111 1\n").is_err());
        assert!(Pla::parse(".i 2\n1x 1\n").is_err());
        assert!(Pla::parse(".i 2\n11 3\n").is_err());
        assert!(Pla::parse(".i\n").is_err());
    }

    #[test]
    fn test_write_round_trip() {
        let cubes: Vec<Cube> = vec!["1-".parse().unwrap(), "01".parse().unwrap()];
        let text = Pla::write(2, &cubes);
        let back = Pla::parse(&text).unwrap();
        assert_eq!(back.inputs, 2);
        assert_eq!(back.on_set, cubes);
    }
}
