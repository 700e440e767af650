pub mod chars;
pub mod exam;
pub mod loaders;

pub use chars::{CharRecord, ExamDocument};
pub use exam::{ExamData, ExtractStats, Passage, Question, QuestionTag};
pub use loaders::{load_all_json_files, load_json_to_document};
