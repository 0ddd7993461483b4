//! Quick-capture notes and their promotion to tasks.

pub mod note;

pub use note::{NewNote, Note, NoteFilter, NoteKind, TASK_TITLE_MAX_CHARS};
