pub mod designer;
pub mod input;
pub mod interaction;
pub mod session;
pub mod shortcuts;
pub mod sync;
pub mod tools;

pub use designer::Designer;
pub use input::{InputEvent, Modifiers};
pub use interaction::{Cursor, InteractionEngine, InteractionState};
pub use session::{CanvasSession, SessionEvent, Signal};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use sync::{ReconcileReport, SkippedElement, reconcile};
pub use tools::{PlaceTool, ToolKind};
