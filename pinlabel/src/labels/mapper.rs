//! Join pinout rows to symbol pins and place a label beside each pin.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::core::LabelOptions;
use crate::error::PinLabelError;
use crate::parser::library::{PinGeometry, PinSide, Symbol};
use crate::parser::pinout::PinoutRecord;
use crate::parser::schematic::Placement;

/// Text size written into every label directive.
const LABEL_TEXT_SIZE: u32 = 50;

/// Label orientation. Legacy schematics store it as a small integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRotation {
    /// Reads left to right (code 0).
    Normal,
    /// Rotated by 180 degrees (code 2).
    Flipped,
}

impl LabelRotation {
    pub fn code(self) -> u8 {
        match self {
            LabelRotation::Normal => 0,
            LabelRotation::Flipped => 2,
        }
    }
}

impl Serialize for LabelRotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// A net label ready to be appended to a schematic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRecord {
    pub x: i64,
    pub y: i64,
    pub rotation: LabelRotation,
    pub text: String,
}

/// Two-line legacy encoding, including the trailing newline.
impl fmt::Display for LabelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Text Label {} {} {}    {}   ~ 0",
            self.x,
            self.y,
            self.rotation.code(),
            LABEL_TEXT_SIZE
        )?;
        writeln!(f, "{}", self.text)
    }
}

/// Places labels for one symbol instance.
pub struct LabelMapper<'a> {
    symbol: &'a Symbol,
    placement: Placement,
    offset: i64,
    separator: char,
}

impl<'a> LabelMapper<'a> {
    pub fn new(symbol: &'a Symbol, placement: Placement, options: &LabelOptions) -> Self {
        Self {
            symbol,
            placement,
            offset: options.offset,
            separator: options.separator,
        }
    }

    /// Look up the pin a row refers to, ignoring any alternate-function suffix.
    pub fn resolve(&self, record: &PinoutRecord) -> Result<&'a PinGeometry, PinLabelError> {
        self.symbol
            .get(record.plain_name(self.separator))
            .ok_or_else(|| PinLabelError::PinNotFound {
                pin: record.pin_name.clone(),
            })
    }

    /// Label for a row with a signal.
    pub fn place(&self, record: &PinoutRecord) -> Result<LabelRecord, PinLabelError> {
        let pin = self.resolve(record)?;
        let (x, y, rotation) = self.position(pin)?;
        Ok(LabelRecord {
            x,
            y,
            rotation,
            text: record.signal_name.clone(),
        })
    }

    /// Absolute label position for a pin.
    ///
    /// The label sits `offset` units outward from the pin end. The library's
    /// Y axis points up while the schematic's points down.
    pub fn position(&self, pin: &PinGeometry) -> Result<(i64, i64, LabelRotation), PinLabelError> {
        let overflow = || PinLabelError::CoordinateOverflow {
            pin: pin.pin_name.clone(),
        };

        let x = self
            .placement
            .anchor_x
            .checked_add(pin.offset_x)
            .ok_or_else(overflow)?;
        let (x, rotation) = match &pin.side {
            PinSide::Left => (x.checked_add(self.offset), LabelRotation::Normal),
            PinSide::Right => (x.checked_sub(self.offset), LabelRotation::Flipped),
            PinSide::Other(side) => {
                return Err(PinLabelError::InvalidLegPosition {
                    pin: pin.pin_name.clone(),
                    side: side.clone(),
                })
            }
        };
        let x = x.ok_or_else(overflow)?;
        let y = self
            .placement
            .anchor_y
            .checked_sub(pin.offset_y)
            .ok_or_else(overflow)?;
        Ok((x, y, rotation))
    }
}
