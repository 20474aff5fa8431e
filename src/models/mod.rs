pub mod keyword;
pub mod letter;
pub mod report;
pub mod site;
pub mod tristate;

pub use keyword::{JobKeywordFlags, Keyword, KeywordMatcher};
pub use letter::DirectoryLetter;
pub use report::{CompanyResult, JobPosting, ReportRow, ResultTable};
pub use site::SiteProfile;
pub use tristate::Tristate;
