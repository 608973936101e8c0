use crate::error::Error;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Object class of an annotation. The integer codes are the node types
/// written to the feature file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Pedestrian,
    Biker,
    Car,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Pedestrian, Label::Biker, Label::Car];

    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Label::Pedestrian => 1,
            Label::Biker => 2,
            Label::Car => 3,
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Label::Pedestrian => "Pedestrian",
            Label::Biker => "Biker",
            Label::Car => "Car",
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_matches('"');

        Label::ALL
            .iter()
            .copied()
            .find(|label| label.name() == name)
            .ok_or_else(|| Error::UnknownLabel(name.to_string()))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a label name to its node type code.
pub fn label_int(label: &str) -> Result<u8, Error> {
    label.parse::<Label>().map(Label::code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_codes() {
        assert_eq!(label_int("Pedestrian").unwrap(), 1);
        assert_eq!(label_int("Biker").unwrap(), 2);
        assert_eq!(label_int("Car").unwrap(), 3);
    }

    #[test]
    fn test_unknown_label() {
        match label_int("Dog") {
            Err(Error::UnknownLabel(name)) => assert_eq!(name, "Dog"),
            other => panic!("expected UnknownLabel, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_label() {
        assert_eq!("\"Biker\"".parse::<Label>().unwrap(), Label::Biker);
    }
}
