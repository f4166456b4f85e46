//! Component placement lookup in KiCad legacy schematics (`.sch`).
//!
//! Inside a `$Comp` block the library reference line (`L <lib:part> <ref>`)
//! is followed by the unit line and then the position line `P <x> <y>`:
//!
//! ```text
//! $Comp
//! L MCU_ST_STM32F4:STM32F401CCUx U1
//! U 1 1 5F3A21C0
//! P 5600 3900
//! ```

use std::path::Path;

use serde::Serialize;

use crate::error::PinLabelError;
use crate::parser::scan::BlockScanner;

const PLACEMENT_MARKER: char = 'L';
const POSITION_MARKER: char = 'P';

/// Absolute anchor of one component instance, in schematic units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub anchor_x: i64,
    pub anchor_y: i64,
}

/// Locator for a single component instance in a legacy schematic
pub struct SchematicLocator;

impl SchematicLocator {
    pub fn load(path: &Path, instance: &str) -> Result<Placement, PinLabelError> {
        let content = std::fs::read_to_string(path)?;
        Self::locate(&content, &path.display().to_string(), instance)
    }

    /// Find the first placement line containing `instance` and return the
    /// coordinates of the first position line after it.
    ///
    /// The position line does not have to follow the header directly; any
    /// lines in between are skipped.
    pub fn locate(
        content: &str,
        source_name: &str,
        instance: &str,
    ) -> Result<Placement, PinLabelError> {
        let mut scanner = BlockScanner::new(content, |line| {
            line.starts_with(PLACEMENT_MARKER) && line.contains(instance)
        });

        if let Some(header) = scanner.seek_header() {
            tracing::debug!(
                "Matched placement header at {}:{}: {}",
                source_name,
                header.number,
                header.text
            );
        }

        let position = scanner
            .find(|line| line.text.starts_with(POSITION_MARKER))
            .ok_or_else(|| PinLabelError::component_not_found(instance, source_name))?;

        let parts: Vec<&str> = position.text.split_whitespace().collect();
        let [_, x, y] = parts[..] else {
            return Err(PinLabelError::malformed(
                source_name,
                position.number,
                format!(
                    "position line has {} fields, expected 3",
                    parts.len()
                ),
            ));
        };

        let coord = |field: &str| {
            field.parse::<i64>().map_err(|_| {
                PinLabelError::malformed(
                    source_name,
                    position.number,
                    format!("invalid position coordinate '{}'", field),
                )
            })
        };

        Ok(Placement {
            anchor_x: coord(x)?,
            anchor_y: coord(y)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMATIC: &str = r#"EESchema Schematic File Version 4
EELAYER 30 0
EELAYER END
$Descr A4 11693 8268
encoding utf-8
Sheet 1 1
Title ""
$EndDescr
$Comp
L Device:R R1
U 1 1 5F3A1E2D
P 1200 900
F 0 "R1" H 1270 946 50  0000 L CNN
$EndComp
$Comp
L MCU_ST_STM32F4:STM32F401CCUx U1
U 1 1 5F3A21C0
P 5600 3900
F 0 "U1" H 5600 2211 50  0000 C CNN
$EndComp
$EndSCHEMATC
"#;

    #[test]
    fn test_locate_component() {
        let placement =
            SchematicLocator::locate(SCHEMATIC, "test.sch", "STM32F401CCUx").unwrap();
        assert_eq!(
            placement,
            Placement {
                anchor_x: 5600,
                anchor_y: 3900
            }
        );
    }

    #[test]
    fn test_first_match_wins() {
        // Both library references contain "R"
        let placement = SchematicLocator::locate(SCHEMATIC, "test.sch", "R1").unwrap();
        assert_eq!((placement.anchor_x, placement.anchor_y), (1200, 900));
    }

    #[test]
    fn test_missing_instance() {
        let err = SchematicLocator::locate(SCHEMATIC, "test.sch", "ATmega328P").unwrap_err();
        assert!(matches!(err, PinLabelError::ComponentNotFound { .. }));
    }

    #[test]
    fn test_header_without_position_line() {
        let content = "$Comp\nL MCU:Chip U7\nU 1 1 00000000\n$EndComp\n";
        let err = SchematicLocator::locate(content, "test.sch", "Chip").unwrap_err();
        assert!(matches!(err, PinLabelError::ComponentNotFound { .. }));
    }

    #[test]
    fn test_position_line_after_intervening_lines() {
        let content = "L MCU:Chip U7\nU 1 1 00000000\nF 0 \"U7\" H 0 0 50\n$EndComp\nP -100 250\n";
        let placement = SchematicLocator::locate(content, "test.sch", "Chip").unwrap();
        assert_eq!((placement.anchor_x, placement.anchor_y), (-100, 250));
    }

    #[test]
    fn test_malformed_position_line() {
        let content = "L MCU:Chip U7\nP 100 200 300\n";
        let err = SchematicLocator::locate(content, "test.sch", "Chip").unwrap_err();
        assert!(matches!(err, PinLabelError::MalformedLine { line: 2, .. }));

        let content = "L MCU:Chip U7\nP 100 abc\n";
        let err = SchematicLocator::locate(content, "test.sch", "Chip").unwrap_err();
        assert!(matches!(err, PinLabelError::MalformedLine { .. }));
    }
}
