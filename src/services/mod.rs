pub mod company_checker;
pub mod link_extractor;
pub mod report_writer;

pub use company_checker::CompanyChecker;
pub use link_extractor::LinkExtractor;
pub use report_writer::ReportWriter;
