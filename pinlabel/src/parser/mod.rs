pub mod library;
pub mod pinout;
pub mod scan;
pub mod schematic;

// Re-export for convenience
pub use library::{LibraryParser, PinGeometry, PinSide, Symbol};
pub use pinout::{PinoutReader, PinoutRecord, ALT_FUNCTION_SEPARATOR};
pub use scan::{BlockScanner, LogicalLine};
pub use schematic::{Placement, SchematicLocator};
