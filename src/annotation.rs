use crate::bbox::BBox;
use crate::error::{Error, Result};
use crate::label::Label;

use serde_derive::{Deserialize, Serialize};
use std::io::BufRead;
use std::str::FromStr;

/// One line of an annotation file:
///
/// `track_id xmin ymin xmax ymax frame lost occluded generated "label" [...]`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub track_id: u32,
    pub bbox: BBox,
    pub frame: u32,
    /// Object is outside of the camera view.
    pub lost: bool,
    pub occluded: bool,
    /// Box was interpolated rather than observed.
    pub generated: bool,
    pub label: Label,
}

fn field<'a, I: Iterator<Item = &'a str>>(fields: &mut I, name: &str) -> Result<&'a str> {
    fields
        .next()
        .ok_or_else(|| Error::malformed(format!("missing field `{}`", name)))
}

fn number<'a, T: FromStr, I: Iterator<Item = &'a str>>(fields: &mut I, name: &str) -> Result<T> {
    let raw = field(fields, name)?;

    raw.parse()
        .map_err(|_| Error::malformed(format!("field `{}` is not a number: {:?}", name, raw)))
}

fn flag<'a, I: Iterator<Item = &'a str>>(fields: &mut I, name: &str) -> Result<bool> {
    match field(fields, name)? {
        "0" => Ok(false),
        "1" => Ok(true),
        raw => Err(Error::malformed(format!(
            "flag `{}` must be 0 or 1, got {:?}",
            name, raw
        ))),
    }
}

impl FromStr for Annotation {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut fields = line.split_ascii_whitespace();

        let track_id = number(&mut fields, "track_id")?;
        let xmin = number(&mut fields, "xmin")?;
        let ymin = number(&mut fields, "ymin")?;
        let xmax = number(&mut fields, "xmax")?;
        let ymax = number(&mut fields, "ymax")?;
        let frame = number(&mut fields, "frame")?;
        let lost = flag(&mut fields, "lost")?;
        let occluded = flag(&mut fields, "occluded")?;
        let generated = flag(&mut fields, "generated")?;
        let label = field(&mut fields, "label")?.parse()?;

        let bbox = BBox::ltrb(xmin, ymin, xmax, ymax);
        bbox.validate()?;

        Ok(Annotation {
            track_id,
            bbox,
            frame,
            lost,
            occluded,
            generated,
            label,
        })
    }
}

/// Streaming reader over an annotation file. Blank lines are skipped,
/// parse failures carry their 1-based line number.
pub struct Annotations<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> Annotations<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for Annotations<R> {
    type Item = Result<Annotation>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let line_no = self.line_no;
            return Some(line.parse().map_err(|err: Error| err.at_line(line_no)));
        }
    }
}

pub fn read_annotations<R: BufRead>(reader: R) -> Result<Vec<Annotation>> {
    Annotations::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let ann: Annotation = "7 10 20 30 60 112 0 1 0 \"Pedestrian\""
            .parse()
            .unwrap();

        assert_eq!(ann.track_id, 7);
        assert_eq!(ann.bbox, BBox::ltrb(10, 20, 30, 60));
        assert_eq!(ann.frame, 112);
        assert!(!ann.lost);
        assert!(ann.occluded);
        assert!(!ann.generated);
        assert_eq!(ann.label, Label::Pedestrian);
    }

    #[test]
    fn test_trailing_fields_ignored() {
        let ann: Annotation = "0 1 2 3 4 5 1 0 1 \"Car\" \"extra\" 42".parse().unwrap();

        assert_eq!(ann.label, Label::Car);
        assert!(ann.lost);
        assert!(ann.generated);
    }

    #[test]
    fn test_missing_field() {
        let err = "0 1 2 3 4 5 1 0".parse::<Annotation>().unwrap_err();

        assert!(matches!(err, Error::MalformedRecord { line: None, .. }));
        assert!(!err.to_string().contains("line"));
    }

    #[test]
    fn test_non_numeric_field() {
        let err = "0 1 x 3 4 5 0 0 0 Car".parse::<Annotation>().unwrap_err();

        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_bad_flag() {
        let err = "0 1 2 3 4 5 2 0 0 Car".parse::<Annotation>().unwrap_err();

        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_unknown_label() {
        let err = "0 1 2 3 4 5 0 0 0 \"Dog\"".parse::<Annotation>().unwrap_err();

        assert!(matches!(err, Error::UnknownLabel(ref name) if name == "Dog"));
    }

    #[test]
    fn test_extreme_span_line() {
        let ann: Annotation = "0 -2000000000 0 2000000000 10 0 0 0 0 Car".parse().unwrap();

        assert_eq!(ann.bbox.dimensions(), (4_000_000_000, 10));
    }

    #[test]
    fn test_unordered_box_rejected() {
        let err = "0 10 2 3 4 5 0 0 0 Car".parse::<Annotation>().unwrap_err();

        assert!(matches!(err, Error::GeometryViolation { .. }));
    }

    #[test]
    fn test_reader_line_numbers() {
        let text = "0 1 2 3 4 5 0 0 0 Car\n\n0 1 2 3 4 6 0 0 0\n";
        let mut reader = Annotations::new(text.as_bytes());

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(Error::MalformedRecord { line, .. }) => assert_eq!(line, Some(3)),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_read_annotations() {
        let text = "1 0 0 4 4 0 0 0 0 Biker\n1 1 0 5 4 1 0 0 1 Biker\n";
        let anns = read_annotations(text.as_bytes()).unwrap();

        assert_eq!(anns.len(), 2);
        assert_eq!(anns[1].frame, 1);
    }
}
