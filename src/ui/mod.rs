pub mod output;
pub mod spinner;
pub mod table;

pub use output::{
    empty_notice, error, header, info, question_line, success, theme, Icons, Theme,
};
pub use spinner::Spinner;
pub use table::questions_table;
