//! KiCad legacy symbol library (`.lib`) pin geometry.
//!
//! A symbol definition starts with a `DEF <name> ...` line and ends with a
//! line reading exactly `ENDDEF`. Pins inside the definition look like:
//!
//! ```text
//! X PA0 34 -1200 500 200 R 50 50 1 1 B
//! ```
//!
//! Field 2 is the pin name, fields 4 and 5 the offset from the symbol origin
//! and field 7 the direction token (`L`, `R`, `U`, `D`).

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::PinLabelError;
use crate::parser::scan::{BlockScanner, LogicalLine};

const DEF_MARKER: &str = "DEF";
const END_MARKER: &str = "ENDDEF";
const PIN_MARKER: &str = "X";

/// Which way a pin leaves the symbol body, as far as label placement cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PinSide {
    Left,
    Right,
    /// Any other direction token, kept verbatim for error reporting.
    Other(String),
}

impl PinSide {
    pub fn from_token(token: &str) -> Self {
        match token {
            "L" => PinSide::Left,
            "R" => PinSide::Right,
            other => PinSide::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinGeometry {
    pub pin_name: String,
    pub offset_x: i64,
    pub offset_y: i64,
    pub side: PinSide,
}

/// Pin geometry of one symbol definition, keyed by pin name.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    pins: HashMap<String, PinGeometry>,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, pin_name: &str) -> Option<&PinGeometry> {
        self.pins.get(pin_name)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinGeometry> {
        self.pins.values()
    }
}

/// Parser for the pin section of legacy symbol libraries
pub struct LibraryParser;

impl LibraryParser {
    /// Read `path` and extract the pins of the first definition whose header
    /// contains `component`.
    pub fn load(path: &Path, component: &str) -> Result<Symbol, PinLabelError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_symbol(&content, &path.display().to_string(), component)
    }

    /// Extract the pins of the first definition whose `DEF` line contains
    /// `component` as a substring.
    ///
    /// Fails with [`PinLabelError::ComponentNotFound`] when no definition
    /// matches or the matching one has no pins.
    pub fn parse_symbol(
        content: &str,
        source_name: &str,
        component: &str,
    ) -> Result<Symbol, PinLabelError> {
        let scanner = BlockScanner::new(content, |line| {
            let line = line.trim();
            line.starts_with(DEF_MARKER) && line.contains(component)
        });

        let mut pins: HashMap<String, PinGeometry> = HashMap::new();
        for line in scanner {
            let text = line.text.trim();
            if text == END_MARKER {
                break;
            }
            if !text.starts_with(PIN_MARKER) {
                continue;
            }

            let pin = Self::parse_pin_line(line, source_name)?;
            if pins.contains_key(&pin.pin_name) {
                tracing::warn!(
                    "Duplicate pin {} in {} at line {}; keeping the last definition",
                    pin.pin_name,
                    source_name,
                    line.number
                );
            }
            pins.insert(pin.pin_name.clone(), pin);
        }

        if pins.is_empty() {
            return Err(PinLabelError::component_not_found(component, source_name));
        }

        tracing::debug!(
            "Loaded {} pins for {} from {}",
            pins.len(),
            component,
            source_name
        );

        Ok(Symbol {
            name: component.to_string(),
            pins,
        })
    }

    fn parse_pin_line(line: LogicalLine<'_>, source_name: &str) -> Result<PinGeometry, PinLabelError> {
        let parts: Vec<&str> = line.text.split_whitespace().collect();
        if parts.len() < 7 {
            return Err(PinLabelError::malformed(
                source_name,
                line.number,
                format!("pin line has {} fields, expected at least 7", parts.len()),
            ));
        }

        let coord = |field: &str| {
            field.parse::<i64>().map_err(|_| {
                PinLabelError::malformed(
                    source_name,
                    line.number,
                    format!("invalid pin coordinate '{}'", field),
                )
            })
        };

        Ok(PinGeometry {
            pin_name: parts[1].to_string(),
            offset_x: coord(parts[3])?,
            offset_y: coord(parts[4])?,
            side: PinSide::from_token(parts[6]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"EESchema-LIBRARY Version 2.4
#encoding utf-8
#
# Device_R
#
DEF Device_R R 0 0 N Y 1 F N
F0 "R" 80 0 50 V V C CNN
DRAW
X ~ 1 0 150 50 D 50 50 1 1 P
X ~ 2 0 -150 50 U 50 50 1 1 P
ENDDRAW
ENDDEF
#
# MCU_ST_STM32F4_STM32F401CCUx
#
DEF MCU_ST_STM32F4_STM32F401CCUx U 0 20 Y Y 1 F N
F0 "U" -600 1350 50 H V L CNN
DRAW
S -600 -1300 600 1300 0 1 10 f
X VBAT 1 -200 1400 100 D 50 50 1 1 W
  X PA0 10 -700 500 100 R 50 50 1 1 B
X PA1 11 700 400 100 L 50 50 1 1 B
ENDDRAW
ENDDEF
#
#End Library
"#;

    #[test]
    fn test_parse_symbol_pins() {
        let symbol =
            LibraryParser::parse_symbol(LIBRARY, "test.lib", "STM32F401CCUx").unwrap();

        assert_eq!(symbol.name(), "STM32F401CCUx");
        assert_eq!(symbol.len(), 3);

        let pa0 = symbol.get("PA0").unwrap();
        assert_eq!(pa0.offset_x, -700);
        assert_eq!(pa0.offset_y, 500);
        assert_eq!(pa0.side, PinSide::Right);

        let pa1 = symbol.get("PA1").unwrap();
        assert_eq!(pa1.side, PinSide::Left);

        let vbat = symbol.get("VBAT").unwrap();
        assert_eq!(vbat.side, PinSide::Other("D".to_string()));
    }

    #[test]
    fn test_pins_from_other_definitions_are_ignored() {
        let symbol =
            LibraryParser::parse_symbol(LIBRARY, "test.lib", "STM32F401CCUx").unwrap();
        assert!(symbol.get("~").is_none());
    }

    #[test]
    fn test_first_substring_match_wins() {
        // "R" appears in both DEF lines, the resistor comes first
        let symbol = LibraryParser::parse_symbol(LIBRARY, "test.lib", "R").unwrap();
        assert_eq!(symbol.len(), 1);
        assert_eq!(symbol.get("~").unwrap().offset_y, -150);
    }

    #[test]
    fn test_missing_component() {
        let err = LibraryParser::parse_symbol(LIBRARY, "test.lib", "ATmega328P").unwrap_err();
        match err {
            PinLabelError::ComponentNotFound {
                component,
                source_name,
            } => {
                assert_eq!(component, "ATmega328P");
                assert_eq!(source_name, "test.lib");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_definition_without_pins_is_not_found() {
        let content = "DEF Empty U 0 20 Y Y 1 F N\nDRAW\nENDDRAW\nENDDEF\n";
        let result = LibraryParser::parse_symbol(content, "empty.lib", "Empty");
        assert!(matches!(
            result,
            Err(PinLabelError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_pin_keeps_last() {
        let content = "DEF Dup U 0 20 Y Y 1 F N\nX PB0 1 10 20 100 L 50 50 1 1 B\nX PB0 2 30 40 100 R 50 50 1 1 B\nENDDEF\n";
        let symbol = LibraryParser::parse_symbol(content, "dup.lib", "Dup").unwrap();
        assert_eq!(symbol.len(), 1);
        let pb0 = symbol.get("PB0").unwrap();
        assert_eq!((pb0.offset_x, pb0.offset_y), (30, 40));
        assert_eq!(pb0.side, PinSide::Right);
    }

    #[test]
    fn test_malformed_pin_line() {
        let content = "DEF Bad U 0 20 Y Y 1 F N\nX PB0 1 ten 20 100 L 50 50 1 1 B\nENDDEF\n";
        let err = LibraryParser::parse_symbol(content, "bad.lib", "Bad").unwrap_err();
        assert!(matches!(
            err,
            PinLabelError::MalformedLine { line: 2, .. }
        ));

        let content = "DEF Short U 0 20 Y Y 1 F N\nX PB0 1 10\nENDDEF\n";
        let err = LibraryParser::parse_symbol(content, "short.lib", "Short").unwrap_err();
        assert!(matches!(err, PinLabelError::MalformedLine { .. }));
    }

    #[test]
    fn test_pin_side_tokens() {
        assert_eq!(PinSide::from_token("L"), PinSide::Left);
        assert_eq!(PinSide::from_token("R"), PinSide::Right);
        assert_eq!(PinSide::from_token("U"), PinSide::Other("U".to_string()));
        assert_eq!(PinSide::from_token("l"), PinSide::Other("l".to_string()));
    }
}
