pub mod formatter;
pub mod lesson;
pub mod markup;
pub mod navigator;

pub use formatter::{datetime_label, Formatter, DATETIME_TOKEN};
pub use lesson::{topic_pool, Lesson, LessonError, LessonVariant, Section};
pub use markup::{Block, BlockKind, Fragment, MarkupParser};
pub use navigator::Navigator;
